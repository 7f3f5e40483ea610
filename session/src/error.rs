//! Session-specific error types

use finder::FinderError;
use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid request: {message}")]
    ValidationError { message: String },

    #[error("Not found: {what}")]
    NotFound { what: String },

    #[error("Song search failed: {0}")]
    SearchError(#[from] FinderError),

    #[error("Snapshot store operation failed: {operation} on {path}")]
    PersistenceError { operation: String, path: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SessionError {
    pub fn validation(message: impl Into<String>) -> Self {
        SessionError::ValidationError {
            message: message.into(),
        }
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        SessionError::NotFound { what: what.into() }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
