//! Path management for the save backup manager
//!
//! All state lives under a single base directory, so the tool can be kept next
//! to its backups on any drive.
//!
//! ## Path Resolution Order
//!
//! 1. `SAVE_BACKUP_MANAGER_DIR` environment variable (if set)
//! 2. The current working directory

use std::path::PathBuf;

use crate::error::SaveBackupError;

/// Environment variable overriding the base directory
pub const BASE_DIR_ENV: &str = "SAVE_BACKUP_MANAGER_DIR";

/// Manages all paths used by the save backup manager
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Base directory for all state and backups
    base_dir: PathBuf,
}

impl AppPaths {
    /// Create a new AppPaths instance
    ///
    /// Path resolution:
    /// 1. `SAVE_BACKUP_MANAGER_DIR` env var (explicit override)
    /// 2. Current working directory
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn new() -> Result<Self, SaveBackupError> {
        let base_dir = match std::env::var_os(BASE_DIR_ENV) {
            Some(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => std::env::current_dir().map_err(|e| {
                SaveBackupError::Config(format!("Could not determine current directory: {}", e))
            })?,
        };

        Ok(Self { base_dir })
    }

    /// Create AppPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the backups directory (`<base>/Backups/`)
    pub fn backups_dir(&self) -> PathBuf {
        self.base_dir.join("Backups")
    }

    /// Get the snapshot directory of one game (`<base>/Backups/<game>/`)
    pub fn game_backup_dir(&self, game_name: &str) -> PathBuf {
        self.backups_dir().join(game_name)
    }

    /// Get the path to the tracked games mapping file
    pub fn games_file(&self) -> PathBuf {
        self.base_dir.join("savefolders.ini")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the history log
    pub fn history_log(&self) -> PathBuf {
        self.base_dir.join("history.log")
    }

    /// Ensure the base and backups directories exist
    pub fn ensure_directories(&self) -> Result<(), SaveBackupError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| SaveBackupError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.backups_dir()).map_err(|e| {
            SaveBackupError::Io(format!("Failed to create backups directory: {}", e))
        })?;

        Ok(())
    }
}
