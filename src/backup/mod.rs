//! Backup system for tracked save folders
//!
//! Provides rolling, timestamped snapshots with a per-game retention limit and
//! restore functionality.
//!
//! # Architecture
//!
//! - `timestamp`: formats and parses the `YYYY-MM-DD HHhMMmSSs` snapshot label
//! - `snapshots`: lists a game's snapshots, orders them, selects evictions
//! - `copier`: recursive tree copy with all-or-nothing rollback
//! - `BackupManager`: evicts old snapshots and writes a new one
//! - `RestoreManager`: copies a snapshot back after saving the current state
//!
//! # Layout
//!
//! ```text
//! Backups/<game>/Backup - 2024-03-09 07h05m03s/<save folder>/...
//! <live parent>/CurrentSaveBackup/<save folder>/...
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use save_backup_manager::backup::{BackupManager, RestoreManager};
//!
//! let manager = BackupManager::new(paths.backups_dir(), settings.retention_limit);
//! let outcome = manager.backup_one(&game);
//! println!("{}", outcome.summary());
//!
//! if let Some(latest) = manager.list_snapshots(&game.name)?.pop() {
//!     let restored = RestoreManager::new().restore_one(&game, &latest, false);
//! }
//! ```

pub mod copier;
mod manager;
mod restore;
pub mod snapshots;
pub mod timestamp;

pub use copier::{CopyError, CopyOps, CopyReport, Rollback, StdCopyOps, TreeCopier};
pub use manager::{BackupManager, BackupOutcome};
pub use restore::{RestoreManager, RestoreOutcome, SafetyCopy, SAFETY_DIR_NAME};
pub use snapshots::Eviction;
