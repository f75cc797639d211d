//! CLI command handlers
//!
//! This module contains the implementation of CLI commands and the
//! interactive menu, bridging the clap argument parsing with the service
//! layer.

pub mod backup;
pub mod game;
pub mod menu;
pub mod prompt;

pub use backup::{
    handle_backup, handle_history, handle_prune, handle_restore, handle_snapshots, BackupArgs,
    HistoryArgs, PruneArgs, RestoreArgs, SnapshotsArgs,
};
pub use game::{handle_add, handle_config, handle_list, handle_remove, AddArgs, ConfigArgs, RemoveArgs};
pub use menu::run_menu;
pub use prompt::{FolderPicker, PromptFolderPicker};

use std::sync::{Arc, Mutex};

use crate::config::{AppPaths, Settings};
use crate::error::SaveBackupResult;
use crate::history::HistoryLogger;
use crate::models::TrackedGame;
use crate::services::BackupService;
use crate::shutdown::{self, SharedRegistry};
use crate::storage::GameRegistry;

/// Everything a command needs, loaded once at startup
pub struct AppContext {
    pub paths: AppPaths,
    pub settings: Settings,
    pub registry: SharedRegistry,
    pub history: HistoryLogger,
}

impl AppContext {
    /// Create the directories, then load settings and tracked games
    pub fn load(paths: AppPaths) -> SaveBackupResult<Self> {
        paths.ensure_directories()?;
        let settings = Settings::load_or_create(&paths)?;

        let mut registry = GameRegistry::new(paths.games_file());
        let count = registry.load()?;
        tracing::info!(count, path = %registry.path().display(), "loaded tracked games");

        Ok(Self {
            history: HistoryLogger::new(paths.history_log()),
            registry: Arc::new(Mutex::new(registry)),
            settings,
            paths,
        })
    }

    /// Snapshot of the tracked games, sorted by name
    pub fn games(&self) -> Vec<TrackedGame> {
        shutdown::lock(&self.registry).games()
    }

    /// Backup service over the current settings
    pub fn backup_service(&self) -> BackupService<'_> {
        BackupService::new(&self.paths, &self.settings, &self.history)
    }
}
