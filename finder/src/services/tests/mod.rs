//! Tests for finder service implementations
//!
//! External HTTP endpoints are replaced with local wiremock servers.

pub mod youtube;
