//! Service layer for the save backup manager
//!
//! The service layer sits between the command handlers and the backup engine
//! and registry, handling validation, persistence and the history log.

pub mod backup;
pub mod game;

pub use backup::{BackupRun, BackupService, LATEST};
pub use game::{AddGameResult, GameService};
