//! Finder error types

use thiserror::Error;

/// Result type for finder operations
pub type FinderResult<T> = Result<T, FinderError>;

/// Finder error types
#[derive(Error, Debug)]
pub enum FinderError {
    #[error("No karaoke track found for '{query}'")]
    NotFound { query: String },

    #[error("Video search failed: {message}")]
    Transient { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },
}

impl FinderError {
    /// Whether the caller may reasonably retry the same request later
    pub fn is_transient(&self) -> bool {
        matches!(self, FinderError::Transient { .. })
    }
}

impl From<reqwest::Error> for FinderError {
    fn from(error: reqwest::Error) -> Self {
        FinderError::Transient {
            message: error.to_string(),
        }
    }
}
