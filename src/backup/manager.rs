//! Backup manager
//!
//! Creates timestamped snapshots of a tracked game's save folder under
//! `Backups/<game>/` and keeps at most `retention_limit` of them.

use std::path::{Path, PathBuf};

use crate::error::{SaveBackupError, SaveBackupResult};
use crate::models::{validate_name, Snapshot, TrackedGame};

use super::copier::{CopyOps, CopyReport, StdCopyOps, TreeCopier};
use super::snapshots;
use super::timestamp::{now_label, snapshot_dir_name};

/// Result of backing up one game
#[derive(Debug)]
pub enum BackupOutcome {
    /// A new snapshot was written
    BackedUp {
        snapshot: Snapshot,
        /// Snapshot directories deleted to make room
        evicted: Vec<PathBuf>,
        report: CopyReport,
    },
    /// The live save folder does not exist; nothing was created
    SourceMissing { path: PathBuf },
    /// The backup failed; any partially written snapshot was removed
    Failed(SaveBackupError),
}

impl BackupOutcome {
    /// Whether a snapshot was created
    pub fn is_backed_up(&self) -> bool {
        matches!(self, Self::BackedUp { .. })
    }

    /// One-line description of the outcome
    pub fn summary(&self) -> String {
        match self {
            Self::BackedUp {
                snapshot,
                evicted,
                report,
            } => {
                let mut text = format!(
                    "backed up {} file(s) to '{}'",
                    report.files,
                    snapshot.dir_name()
                );
                if !evicted.is_empty() {
                    text.push_str(&format!(", removed {} old snapshot(s)", evicted.len()));
                }
                if !report.skipped.is_empty() {
                    text.push_str(&format!(", skipped {} special file(s)", report.skipped.len()));
                }
                text
            }
            Self::SourceMissing { path } => {
                format!("save folder not found: {}", path.display())
            }
            Self::Failed(err) => format!("backup failed: {}", err),
        }
    }
}

/// Manages snapshot creation and retention for tracked games
pub struct BackupManager<O: CopyOps = StdCopyOps> {
    /// Base directory holding one folder per game
    backups_dir: PathBuf,
    /// Maximum snapshots per game after a backup
    retention_limit: usize,
    ops: O,
}

impl BackupManager<StdCopyOps> {
    /// Create a new BackupManager
    pub fn new(backups_dir: PathBuf, retention_limit: usize) -> Self {
        Self::with_ops(backups_dir, retention_limit, StdCopyOps)
    }
}

impl<O: CopyOps> BackupManager<O> {
    /// Create a BackupManager over custom filesystem operations
    pub fn with_ops(backups_dir: PathBuf, retention_limit: usize, ops: O) -> Self {
        Self {
            backups_dir,
            retention_limit,
            ops,
        }
    }

    /// Get the backups base directory
    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Get the retention limit
    pub fn retention_limit(&self) -> usize {
        self.retention_limit
    }

    /// Directory holding the snapshots of one game
    pub fn game_backup_dir(&self, game_name: &str) -> PathBuf {
        self.backups_dir.join(game_name)
    }

    /// List the snapshots of a game, oldest first
    ///
    /// Fails for names that are not a single plain folder name.
    pub fn list_snapshots(&self, game_name: &str) -> SaveBackupResult<Vec<Snapshot>> {
        validate_name(game_name).map_err(|e| {
            SaveBackupError::Validation(format!("Invalid game name \"{}\": {}", game_name, e))
        })?;
        snapshots::list(&self.game_backup_dir(game_name), game_name)
    }

    /// Back up one game, stamping the snapshot with the current local time
    pub fn backup_one(&self, game: &TrackedGame) -> BackupOutcome {
        self.backup_with_label(game, &now_label())
    }

    /// Back up one game using an explicit timestamp label
    pub(crate) fn backup_with_label(&self, game: &TrackedGame, label: &str) -> BackupOutcome {
        // The name becomes a path component under the backups directory.
        if let Err(e) = game.validate() {
            tracing::error!(game = %game.name, error = %e, "refusing to back up game with invalid name");
            return BackupOutcome::Failed(SaveBackupError::Validation(format!(
                "Invalid game name \"{}\": {}",
                game.name, e
            )));
        }

        if !game.source_exists() {
            tracing::warn!(
                game = %game.name,
                path = %game.live_path.display(),
                "save folder missing, skipping backup"
            );
            return BackupOutcome::SourceMissing {
                path: game.live_path.clone(),
            };
        }

        match self.try_backup(game, label) {
            Ok((snapshot, evicted, report)) => {
                tracing::info!(
                    game = %game.name,
                    snapshot = %snapshot.path.display(),
                    files = report.files,
                    evicted = evicted.len(),
                    "backup complete"
                );
                BackupOutcome::BackedUp {
                    snapshot,
                    evicted,
                    report,
                }
            }
            Err(err) => {
                tracing::error!(game = %game.name, error = %err, "backup failed");
                BackupOutcome::Failed(err)
            }
        }
    }

    fn try_backup(
        &self,
        game: &TrackedGame,
        label: &str,
    ) -> SaveBackupResult<(Snapshot, Vec<PathBuf>, CopyReport)> {
        if !game.live_path.is_dir() {
            return Err(SaveBackupError::Validation(format!(
                "Save path is not a directory: {}",
                game.live_path.display()
            )));
        }

        let folder_name = game.save_folder_name().ok_or_else(|| {
            SaveBackupError::Validation(format!(
                "Save path has no folder name: {}",
                game.live_path.display()
            ))
        })?;

        let game_dir = self.game_backup_dir(&game.name);
        self.ops.create_dir_all(&game_dir).map_err(|e| {
            SaveBackupError::Io(format!(
                "Failed to create backup directory {}: {}",
                game_dir.display(),
                e
            ))
        })?;

        let snapshot_dir = game_dir.join(snapshot_dir_name(label));
        if snapshot_dir.exists() {
            return Err(SaveBackupError::Validation(format!(
                "A snapshot labelled '{}' already exists for {}",
                label, game.name
            )));
        }

        let evicted = self.evict_for_new_snapshot(&game.name)?;

        self.ops.create_dir_all(&snapshot_dir).map_err(|e| {
            SaveBackupError::Io(format!(
                "Failed to create snapshot directory {}: {}",
                snapshot_dir.display(),
                e
            ))
        })?;

        let copier = TreeCopier::with_ops(&self.ops);
        let report = match copier.copy(&game.live_path, &snapshot_dir.join(folder_name)) {
            Ok(report) => report,
            Err(err) => {
                if let Err(e) = self.ops.remove_dir_all(&snapshot_dir) {
                    tracing::error!(
                        path = %snapshot_dir.display(),
                        error = %e,
                        "failed to remove incomplete snapshot"
                    );
                }
                return Err(err.into());
            }
        };

        let snapshot = Snapshot::from_dir(&game.name, &snapshot_dir).ok_or_else(|| {
            SaveBackupError::Storage(format!(
                "Invalid snapshot path: {}",
                snapshot_dir.display()
            ))
        })?;

        Ok((snapshot, evicted, report))
    }

    /// Delete the oldest snapshots so one more fits under the limit
    fn evict_for_new_snapshot(&self, game_name: &str) -> SaveBackupResult<Vec<PathBuf>> {
        let existing = self.list_snapshots(game_name)?;
        let eviction = snapshots::evict(existing, self.retention_limit);
        self.delete_snapshots(eviction.to_delete)
    }

    /// Delete snapshots beyond the limit without creating a new one
    ///
    /// Keeps the newest `retention_limit` snapshots.
    pub fn prune(&self, game_name: &str) -> SaveBackupResult<Vec<PathBuf>> {
        let existing = self.list_snapshots(game_name)?;
        let eviction = snapshots::evict(existing, self.retention_limit.saturating_add(1));
        self.delete_snapshots(eviction.to_delete)
    }

    fn delete_snapshots(&self, to_delete: Vec<Snapshot>) -> SaveBackupResult<Vec<PathBuf>> {
        let mut deleted = Vec::with_capacity(to_delete.len());

        for snapshot in to_delete {
            self.ops.remove_dir_all(&snapshot.path).map_err(|e| {
                SaveBackupError::Io(format!(
                    "Failed to delete old snapshot {}: {}",
                    snapshot.path.display(),
                    e
                ))
            })?;
            tracing::debug!(path = %snapshot.path.display(), "evicted snapshot");
            deleted.push(snapshot.path);
        }

        Ok(deleted)
    }
}
