//! Finder library for karaoke track lookup
//!
//! Searches an external video catalogue for a requested song and ranks the
//! results to pick the track most likely to be a clean karaoke version.

pub mod config;
pub mod core;
pub mod error;
pub mod finder;
pub mod services;
pub mod traits;

// Re-export main types
pub use config::FinderConfig;
pub use core::{rank, CandidateRanker, ChannelLists};
pub use error::{FinderError, FinderResult};
pub use finder::KaraokeFinder;
pub use services::{OfflineSearch, SearchBackend, YoutubeSearch};
pub use traits::*;
