//! Finder services implementations

pub mod offline;
pub mod youtube;

#[cfg(test)]
pub mod tests;

pub use offline::{OfflineSearch, SearchBackend};
pub use youtube::*;
