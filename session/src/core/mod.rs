//! Core session logic
//!
//! Pure scheduling, selection and state with no I/O. Randomness is always
//! passed in, so every function here is deterministic under a seeded generator.

pub mod rotation;
pub mod selector;
pub mod state;

pub use rotation::{remaining_counts, select_performer, weight};
pub use selector::select_entry;
pub use state::{PlaybackState, SessionState};
