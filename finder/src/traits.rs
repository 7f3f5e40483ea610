//! Finder trait definitions for dependency injection

use async_trait::async_trait;

use crate::error::FinderResult;
use shared::Candidate;

/// External video search collaborator
#[mockall::automock]
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Raw, unscored candidates for a song query
    ///
    /// Fails with `FinderError::Transient` on network errors and returns an
    /// empty list when nothing matched.
    async fn search(&self, query: &str) -> FinderResult<Vec<Candidate>>;
}
