//! Search configuration loaded from the environment
//!
//! Values are read from:
//! 1. `.env` file in the current directory or parent directories (if present)
//! 2. System environment variables
//!
//! ## Keys
//! - `YOUTUBE_API_KEY`: YouTube Data API key (required for live search)
//! - `YOUTUBE_API_BASE`: override of the API base URL (proxies, tests)

use std::env;

/// Default YouTube Data API endpoint
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Phrase appended to every user query before searching
pub const DEFAULT_QUERY_SUFFIX: &str = "karaoke version";

/// Number of search results requested per query
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Configuration of the video search collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_results: u32,
    pub query_suffix: String,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_API_BASE.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            query_suffix: DEFAULT_QUERY_SUFFIX.to_string(),
        }
    }
}

impl FinderConfig {
    /// Load configuration from `.env` and the process environment
    pub fn from_env() -> Self {
        // Missing .env is fine
        let _ = dotenv::dotenv();

        let api_key = env::var("YOUTUBE_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        let base_url = env::var("YOUTUBE_API_BASE")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Self {
            api_key,
            base_url,
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results.max(1);
        self
    }

    pub fn with_query_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.query_suffix = suffix.into();
        self
    }

    /// Query actually sent to the search endpoint
    pub fn search_query(&self, query: &str) -> String {
        let suffix = self.query_suffix.trim();
        if suffix.is_empty() {
            query.trim().to_string()
        } else {
            format!("{} {}", query.trim(), suffix)
        }
    }
}
