//! Trait definitions with mockall annotations for testing
//!
//! The snapshot store is injected into the session host so persistence can be
//! swapped for a mock in tests.

use shared::Snapshot;

use crate::error::SessionResult;

/// Key/value storage for full session snapshots
///
/// Writes are full overwrites. Callers treat every failure as best-effort.
#[mockall::automock]
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Load the snapshot stored under `key`, `None` when nothing was saved yet
    async fn load(&self, key: &str) -> SessionResult<Option<Snapshot>>;

    /// Replace whatever is stored under `key`
    async fn save(&self, key: &str, snapshot: &Snapshot) -> SessionResult<()>;

    /// Remove the snapshot stored under `key`; missing keys are not an error
    async fn clear(&self, key: &str) -> SessionResult<()>;
}
