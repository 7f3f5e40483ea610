//! Shared types for the karaoke rotation system
//!
//! Contains the domain types exchanged between the session controller and the
//! song finder, the persisted snapshot schema, and the common logging setup.

pub mod errors;
pub mod logging;
pub mod snapshot;
pub mod types;

pub use errors::*;
pub use logging::ComponentId;
pub use snapshot::Snapshot;
pub use types::*;
