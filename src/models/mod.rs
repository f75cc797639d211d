//! Core data models for the save backup manager
//!
//! Tracked games and the snapshots taken of them.

pub mod game;
pub mod snapshot;

pub use game::{validate_name, GameValidationError, TrackedGame};
pub use snapshot::Snapshot;
