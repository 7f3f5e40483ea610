//! Service implementations
//!
//! Real implementations of the session's injected traits.

pub mod snapshot_store;

#[cfg(test)]
pub mod tests;

pub use snapshot_store::{FileSnapshotStore, DEFAULT_STATE_DIR};
