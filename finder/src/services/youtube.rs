//! YouTube Data API search implementation
//!
//! Two requests per query: `search` for embeddable videos, then `videos` for
//! the view counts of the returned ids.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::FinderConfig;
use crate::error::{FinderError, FinderResult};
use crate::traits::VideoSearch;
use shared::{component_debug, Candidate, ComponentId};

/// Real video search against the YouTube Data API v3
pub struct YoutubeSearch {
    client: reqwest::Client,
    config: FinderConfig,
    api_key: String,
}

impl YoutubeSearch {
    /// Create a search client; the config must carry an API key
    pub fn new(config: FinderConfig) -> FinderResult<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| FinderError::ConfigError {
            message: "Missing YOUTUBE_API_KEY (set it in the environment or .env)".to_string(),
        })?;

        Ok(Self {
            client: reqwest::Client::new(),
            config,
            api_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> FinderResult<Value> {
        let response = self
            .client
            .get(self.endpoint(path))
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FinderError::Transient {
                message: format!("YouTube {} failed ({})", path, response.status()),
            });
        }

        let body = response.json::<Value>().await.map_err(|e| FinderError::Transient {
            message: format!("Failed to parse YouTube {} response: {}", path, e),
        })?;
        Ok(body)
    }

    /// Candidates from the search endpoint; items missing id, title or channel are dropped
    async fn search_videos(&self, query: &str) -> FinderResult<Vec<Candidate>> {
        let params = [
            ("part", "snippet".to_string()),
            ("type", "video".to_string()),
            ("maxResults", self.config.max_results.to_string()),
            ("q", self.config.search_query(query)),
            ("videoEmbeddable", "true".to_string()),
            ("safeSearch", "none".to_string()),
        ];
        let body = self.get_json("search", &params).await?;

        let candidates = items(&body)
            .filter_map(|item| {
                let video_id = item.get("id").and_then(|id| id.get("videoId")).and_then(Value::as_str)?;
                let snippet = item.get("snippet")?;
                let title = snippet.get("title").and_then(Value::as_str)?;
                let channel = snippet.get("channelTitle").and_then(Value::as_str)?;
                Some(Candidate::new(video_id, title, channel, None))
            })
            .collect();

        Ok(candidates)
    }

    /// View counts keyed by video id; YouTube reports them as strings
    async fn fetch_view_counts(&self, ids: &[&str]) -> FinderResult<HashMap<String, u64>> {
        let params = [("part", "statistics,snippet".to_string()), ("id", ids.join(","))];
        let body = self.get_json("videos", &params).await?;

        let counts = items(&body)
            .filter_map(|item| {
                let id = item.get("id").and_then(Value::as_str)?;
                let views = item
                    .get("statistics")
                    .and_then(|stats| stats.get("viewCount"))
                    .and_then(|count| match count {
                        Value::String(s) => s.parse::<u64>().ok(),
                        other => other.as_u64(),
                    })?;
                Some((id.to_string(), views))
            })
            .collect();

        Ok(counts)
    }
}

fn items(body: &Value) -> impl Iterator<Item = &Value> {
    body.get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

#[async_trait]
impl VideoSearch for YoutubeSearch {
    async fn search(&self, query: &str) -> FinderResult<Vec<Candidate>> {
        let mut candidates = self.search_videos(query).await?;
        if candidates.is_empty() {
            component_debug!(ComponentId::Finder, "🔍 No search results for '{}'", query);
            return Ok(candidates);
        }

        let ids: Vec<&str> = candidates.iter().map(|c| c.external_id.as_str()).collect();
        let views = self.fetch_view_counts(&ids).await?;
        for candidate in &mut candidates {
            candidate.view_count = views.get(&candidate.external_id).copied();
        }

        component_debug!(
            ComponentId::Finder,
            "🔍 {} candidates for '{}'",
            candidates.len(),
            query
        );
        Ok(candidates)
    }
}
