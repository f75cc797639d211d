//! Snapshot model
//!
//! One timestamped copy of a tracked game's save folder.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use crate::backup::timestamp::{parse_label, SNAPSHOT_PREFIX};

/// A snapshot directory under `Backups/<game>/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Name of the tracked game this snapshot belongs to
    pub game_name: String,

    /// Timestamp label (the directory name without the `Backup - ` prefix)
    pub label: String,

    /// Full path of the snapshot directory
    pub path: PathBuf,

    /// Instant parsed from the label, `None` if the label is malformed
    pub created_at: Option<NaiveDateTime>,
}

impl Snapshot {
    /// Build a snapshot from an existing directory
    ///
    /// Returns `None` only when the path has no final component.
    pub fn from_dir(game_name: impl Into<String>, path: &Path) -> Option<Self> {
        let dir_name = path.file_name()?.to_string_lossy().to_string();
        let label = dir_name
            .strip_prefix(SNAPSHOT_PREFIX)
            .unwrap_or(&dir_name)
            .to_string();

        let created_at = match parse_label(&dir_name) {
            Ok(instant) => Some(instant),
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "unparseable snapshot name");
                None
            }
        };

        Some(Self {
            game_name: game_name.into(),
            label,
            path: path.to_path_buf(),
            created_at,
        })
    }

    /// Directory name of the snapshot
    pub fn dir_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Whether the label could be parsed
    pub fn has_timestamp(&self) -> bool {
        self.created_at.is_some()
    }

    /// Chronological order: unparseable labels first, then by instant, ties by
    /// directory name
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.created_at
            .cmp(&other.created_at)
            .then_with(|| self.dir_name().cmp(&other.dir_name()))
    }
}
