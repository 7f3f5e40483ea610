//! Karaoke session library
//!
//! Rotates singing turns fairly among performers sharing a song queue and
//! drives the playback lifecycle (`Idle`, `Playing`, `AwaitingNext`) with a
//! manual forced-next override. Song lookup is delegated to the `finder`
//! crate and persistence to an injected snapshot store.

pub mod command;
pub mod controller;
pub mod core;
pub mod error;
pub mod host;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use command::Command;
pub use controller::{NowPlaying, PlaybackController, SessionEvent, SongRequest, MIN_QUERY_CHARS};
pub use core::{PlaybackState, SessionState};
pub use error::{SessionError, SessionResult};
pub use host::{Reply, SearchOutcome, SessionHost, DEFAULT_STATE_KEY};
pub use services::FileSnapshotStore;
pub use traits::*;
