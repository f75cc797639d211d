//! User settings for the save backup manager
//!
//! Currently holds the per-game snapshot retention limit.

use serde::{Deserialize, Serialize};

use super::paths::AppPaths;
use crate::error::SaveBackupError;
use crate::storage::file_io::{read_json, write_json_atomic};

/// Default number of snapshots kept per game
pub const DEFAULT_RETENTION_LIMIT: usize = 5;

/// User settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Maximum snapshots kept per game after a backup
    #[serde(default = "default_retention_limit")]
    pub retention_limit: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_retention_limit() -> usize {
    DEFAULT_RETENTION_LIMIT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            retention_limit: default_retention_limit(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_create(paths: &AppPaths) -> Result<Self, SaveBackupError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let settings: Settings = read_json(&settings_path).map_err(|e| {
            SaveBackupError::Config(format!("Failed to load settings file: {}", e))
        })?;
        settings.validate()?;

        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &AppPaths) -> Result<(), SaveBackupError> {
        self.validate()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Check the settings for values the engine cannot work with
    pub fn validate(&self) -> Result<(), SaveBackupError> {
        if self.retention_limit == 0 {
            return Err(SaveBackupError::Config(
                "retention_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
