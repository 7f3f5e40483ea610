//! Search backends selectable at startup

use async_trait::async_trait;

use crate::config::FinderConfig;
use crate::error::{FinderError, FinderResult};
use crate::services::youtube::YoutubeSearch;
use crate::traits::VideoSearch;
use shared::Candidate;

/// Search used when running without network access or an API key
///
/// Every search fails as transient, so queue operations keep working while
/// adds are reported as unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineSearch;

#[async_trait]
impl VideoSearch for OfflineSearch {
    async fn search(&self, query: &str) -> FinderResult<Vec<Candidate>> {
        Err(FinderError::Transient {
            message: format!("offline mode, cannot search for '{query}'"),
        })
    }
}

/// Live or offline search, chosen from the command line
pub enum SearchBackend {
    Youtube(YoutubeSearch),
    Offline(OfflineSearch),
}

impl SearchBackend {
    pub fn from_config(config: FinderConfig, offline: bool) -> FinderResult<Self> {
        if offline {
            return Ok(SearchBackend::Offline(OfflineSearch));
        }
        Ok(SearchBackend::Youtube(YoutubeSearch::new(config)?))
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, SearchBackend::Offline(_))
    }
}

#[async_trait]
impl VideoSearch for SearchBackend {
    async fn search(&self, query: &str) -> FinderResult<Vec<Candidate>> {
        match self {
            SearchBackend::Youtube(search) => search.search(query).await,
            SearchBackend::Offline(search) => search.search(query).await,
        }
    }
}
