//! Common test utilities and infrastructure
//!
//! Shared fixtures and builders used across the session test suites.

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
#[allow(unused_imports)]
pub use fixtures::TestFixtures;
#[allow(unused_imports)]
pub use helpers::{HostBuilder, TestHelpers, TestHost};
