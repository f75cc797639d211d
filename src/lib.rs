//! Save Backup Manager - rolling, timestamped backups of game save folders
//!
//! This library tracks a set of named save folders and copies them into
//! timestamped snapshot directories, keeping a bounded number of snapshots
//! per game. A restore copies a chosen snapshot back over the live save after
//! first copying the current state into a `CurrentSaveBackup` folder.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `backup`: Snapshot naming, retention, tree copy, backup and restore
//! - `config`: Base directory, derived paths and settings
//! - `error`: Custom error types
//! - `models`: Tracked games and snapshots
//! - `storage`: Atomic file writes and the tracked game registry
//! - `services`: Business logic layer
//! - `history`: Append-only history log
//! - `display`: Plain-text formatting
//! - `cli`: Command handlers and the interactive menu
//! - `shutdown`: Saving the registry on exit
//!
//! # Example
//!
//! ```rust,ignore
//! use save_backup_manager::cli::AppContext;
//! use save_backup_manager::config::AppPaths;
//!
//! let ctx = AppContext::load(AppPaths::new()?)?;
//! let run = ctx.backup_service().backup_all(&ctx.games());
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod history;
pub mod models;
pub mod services;
pub mod shutdown;
pub mod storage;

pub use error::SaveBackupError;
