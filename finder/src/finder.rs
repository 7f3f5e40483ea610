//! Search-and-rank pipeline for song requests

use crate::core::CandidateRanker;
use crate::error::FinderResult;
use crate::traits::VideoSearch;
use shared::{component_debug, component_info, Candidate, ComponentId};

/// Finds the best karaoke track for a query using an injected search collaborator
///
/// Errors from the search are surfaced as-is; retries are the caller's decision.
pub struct KaraokeFinder<V>
where
    V: VideoSearch,
{
    search: V,
    ranker: CandidateRanker,
}

impl<V> KaraokeFinder<V>
where
    V: VideoSearch,
{
    pub fn new(search: V) -> Self {
        Self {
            search,
            ranker: CandidateRanker::default(),
        }
    }

    pub fn with_ranker(mut self, ranker: CandidateRanker) -> Self {
        self.ranker = ranker;
        self
    }

    /// Search for `query` and return the top-ranked candidate
    pub async fn find_best(&self, query: &str) -> FinderResult<Candidate> {
        let candidates = self.search.search(query).await?;
        component_debug!(
            ComponentId::Finder,
            "Ranking {} candidates for '{}'",
            candidates.len(),
            query
        );

        let best = self.ranker.rank(&candidates, query)?;
        component_info!(
            ComponentId::Finder,
            "🎤 Picked '{}' from {} (score {:.1})",
            best.title,
            best.channel_name,
            best.score
        );
        Ok(best)
    }
}
