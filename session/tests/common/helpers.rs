//! Test helpers and builder patterns for session tests

#![allow(dead_code)]

use finder::{KaraokeFinder, MockVideoSearch};
use session::*;
use shared::Snapshot;

use super::fixtures::TestFixtures;

/// Host wired to mocks for search and persistence
pub type TestHost = SessionHost<MockVideoSearch, MockSnapshotStore>;

/// Builder for hosts with mocked collaborators
///
/// Collaborators left unconfigured accept any call: searches return the
/// "dancing queen" results and the store loads nothing and saves fine.
pub struct HostBuilder {
    search: Option<MockVideoSearch>,
    store: Option<MockSnapshotStore>,
    seed: u64,
    with_roster: bool,
}

impl HostBuilder {
    pub fn new() -> Self {
        Self {
            search: None,
            store: None,
            seed: TestFixtures::SEED,
            with_roster: true,
        }
    }

    /// Configure the search mock; unconfigured calls will panic
    pub fn with_search<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockVideoSearch),
    {
        let mut search = MockVideoSearch::new();
        setup(&mut search);
        self.search = Some(search);
        self
    }

    /// Configure the store mock; unconfigured calls will panic
    pub fn with_store<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockSnapshotStore),
    {
        let mut store = MockSnapshotStore::new();
        setup(&mut store);
        self.store = Some(store);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Start without Ana, Bo and Cy registered
    pub fn without_roster(mut self) -> Self {
        self.with_roster = false;
        self
    }

    pub fn build(self) -> TestHost {
        let search = self.search.unwrap_or_else(TestHelpers::permissive_search);
        let store = self.store.unwrap_or_else(TestHelpers::permissive_store);

        let mut controller = PlaybackController::seeded(self.seed);
        if self.with_roster {
            for performer in TestFixtures::performers() {
                controller.add_performer(performer).unwrap();
            }
        }

        SessionHost::new(controller, KaraokeFinder::new(search), store).with_state_key(TestFixtures::STATE_KEY)
    }
}

impl Default for HostBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper functions for common test operations
pub struct TestHelpers;

impl TestHelpers {
    pub fn permissive_search() -> MockVideoSearch {
        let mut search = MockVideoSearch::new();
        search
            .expect_search()
            .returning(|_| Ok(TestFixtures::dancing_queen_results()))
            .times(0..);
        search
    }

    pub fn permissive_store() -> MockSnapshotStore {
        let mut store = MockSnapshotStore::new();
        store.expect_load().returning(|_| Ok(None)).times(0..);
        store.expect_save().returning(|_, _| Ok(())).times(0..);
        store.expect_clear().returning(|_| Ok(())).times(0..);
        store
    }

    /// Seeded controller with Ana, Bo and Cy registered
    pub fn controller() -> PlaybackController {
        let mut controller = PlaybackController::seeded(TestFixtures::SEED);
        for performer in TestFixtures::performers() {
            controller.add_performer(performer).unwrap();
        }
        controller
    }

    /// Seeded controller restored from a snapshot
    pub fn restored_controller(snapshot: Snapshot) -> PlaybackController {
        let mut controller = PlaybackController::seeded(TestFixtures::SEED);
        controller.restore(snapshot);
        controller
    }

    /// Lead performer of the current entry
    pub fn current_singer(controller: &PlaybackController) -> Option<shared::PerformerId> {
        controller
            .state()
            .current_entry()
            .and_then(|entry| entry.lead_performer().cloned())
    }

    /// Query of the current entry
    pub fn current_query(controller: &PlaybackController) -> Option<String> {
        controller.state().current_entry().map(|entry| entry.query.clone())
    }

    pub fn assert_invariants(controller: &PlaybackController) {
        if let Err(e) = controller.state().check_invariants() {
            panic!("session invariant broken: {e}");
        }
    }
}
