//! Tests for service implementations

pub mod snapshot_store;
