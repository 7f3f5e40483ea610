//! Core ranking logic
//!
//! Pure scoring functions with no I/O dependencies.

pub mod channels;
pub mod ranker;

pub use channels::{ChannelLists, ChannelVerdict};
pub use ranker::{rank, CandidateRanker};
