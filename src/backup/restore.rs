//! Snapshot restoration
//!
//! Copies a snapshot back over a game's live save folder. Before anything is
//! overwritten the current live save is copied into a `CurrentSaveBackup`
//! folder next to it, so a restore can always be undone by hand.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{SaveBackupError, SaveBackupResult};
use crate::models::{Snapshot, TrackedGame};

use super::copier::{CopyOps, CopyReport, StdCopyOps, TreeCopier};

/// Name of the safety folder created next to the live save folder
pub const SAFETY_DIR_NAME: &str = "CurrentSaveBackup";

/// What happened to the pre-restore safety copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafetyCopy {
    /// No safety copy existed; one was taken
    Created(PathBuf),
    /// An older safety copy was replaced with the current live save
    Overwritten(PathBuf),
    /// An older safety copy exists and was left as is
    Kept(PathBuf),
    /// There was no live save to copy
    NoLiveSave,
}

impl SafetyCopy {
    /// Location of the safety copy, if there is one
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Created(p) | Self::Overwritten(p) | Self::Kept(p) => Some(p),
            Self::NoLiveSave => None,
        }
    }
}

/// Result of restoring one game
#[derive(Debug)]
pub enum RestoreOutcome {
    /// The snapshot was copied over the live save folder
    Restored { safety: SafetyCopy, report: CopyReport },
    /// The restore failed
    Failed(SaveBackupError),
}

impl RestoreOutcome {
    /// Whether the restore succeeded
    pub fn is_restored(&self) -> bool {
        matches!(self, Self::Restored { .. })
    }

    /// One-line description of the outcome
    pub fn summary(&self) -> String {
        match self {
            Self::Restored { safety, report } => {
                let safety = match safety {
                    SafetyCopy::Created(p) => format!("current save copied to {}", p.display()),
                    SafetyCopy::Overwritten(p) => {
                        format!("current save copy refreshed at {}", p.display())
                    }
                    SafetyCopy::Kept(p) => {
                        format!("previous current-save copy kept at {}", p.display())
                    }
                    SafetyCopy::NoLiveSave => "no current save to copy".to_string(),
                };
                format!("restored {} file(s); {}", report.files, safety)
            }
            Self::Failed(err) => format!("restore failed: {}", err),
        }
    }
}

/// Handles restoring snapshots over live save folders
pub struct RestoreManager<O: CopyOps = StdCopyOps> {
    ops: O,
}

impl RestoreManager<StdCopyOps> {
    /// Create a new RestoreManager
    pub fn new() -> Self {
        Self::with_ops(StdCopyOps)
    }
}

impl Default for RestoreManager<StdCopyOps> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: CopyOps> RestoreManager<O> {
    /// Create a RestoreManager over custom filesystem operations
    pub fn with_ops(ops: O) -> Self {
        Self { ops }
    }

    /// Where the safety copy of a game's live save lives
    ///
    /// `<live parent>/CurrentSaveBackup/<save folder name>`
    pub fn safety_copy_path(&self, game: &TrackedGame) -> Option<PathBuf> {
        let parent = game.live_parent()?;
        let folder = game.save_folder_name()?;
        Some(parent.join(SAFETY_DIR_NAME).join(folder))
    }

    /// Whether a safety copy from an earlier restore exists
    pub fn safety_copy_exists(&self, game: &TrackedGame) -> bool {
        self.safety_copy_path(game).is_some_and(|p| p.exists())
    }

    /// Restore a snapshot over the game's live save folder
    ///
    /// An existing safety copy is only replaced when `overwrite_safety` is set;
    /// the restore itself proceeds either way. Files present in the live
    /// folder but not in the snapshot are left alone.
    pub fn restore_one(
        &self,
        game: &TrackedGame,
        snapshot: &Snapshot,
        overwrite_safety: bool,
    ) -> RestoreOutcome {
        match self.try_restore(game, snapshot, overwrite_safety) {
            Ok((safety, report)) => {
                tracing::info!(
                    game = %game.name,
                    snapshot = %snapshot.dir_name(),
                    files = report.files,
                    "restore complete"
                );
                RestoreOutcome::Restored { safety, report }
            }
            Err(err) => {
                tracing::error!(game = %game.name, error = %err, "restore failed");
                RestoreOutcome::Failed(err)
            }
        }
    }

    fn try_restore(
        &self,
        game: &TrackedGame,
        snapshot: &Snapshot,
        overwrite_safety: bool,
    ) -> SaveBackupResult<(SafetyCopy, CopyReport)> {
        let parent = game.live_parent().ok_or_else(|| {
            SaveBackupError::Validation(format!(
                "Save path has no parent directory: {}",
                game.live_path.display()
            ))
        })?;
        let folder_name = game.save_folder_name().ok_or_else(|| {
            SaveBackupError::Validation(format!(
                "Save path has no folder name: {}",
                game.live_path.display()
            ))
        })?;

        if !snapshot.path.is_dir() {
            return Err(SaveBackupError::snapshot_not_found(snapshot.dir_name()));
        }

        let snapshot_folder = snapshot.path.join(folder_name);
        if !snapshot_folder.is_dir() {
            return Err(SaveBackupError::Validation(format!(
                "Snapshot '{}' does not contain the save folder '{}'",
                snapshot.dir_name(),
                folder_name.to_string_lossy()
            )));
        }

        let safety = self.take_safety_copy(game, parent, folder_name, overwrite_safety)?;

        self.ops.create_dir_all(parent).map_err(|e| {
            SaveBackupError::Io(format!(
                "Failed to create {}: {}",
                parent.display(),
                e
            ))
        })?;

        // Rollback only ever removes a live folder this restore created.
        let report = TreeCopier::with_ops(&self.ops).copy(&snapshot_folder, &game.live_path)?;

        Ok((safety, report))
    }

    fn take_safety_copy(
        &self,
        game: &TrackedGame,
        parent: &Path,
        folder_name: &std::ffi::OsStr,
        overwrite: bool,
    ) -> SaveBackupResult<SafetyCopy> {
        if !game.live_path.is_dir() {
            tracing::debug!(game = %game.name, "no live save, skipping safety copy");
            return Ok(SafetyCopy::NoLiveSave);
        }

        let safety_root = parent.join(SAFETY_DIR_NAME);
        let target = safety_root.join(folder_name);
        let existed = target.exists();

        if existed && !overwrite {
            tracing::debug!(path = %target.display(), "keeping existing safety copy");
            return Ok(SafetyCopy::Kept(target));
        }

        // Copy next to the old safety copy first so a failure never loses it.
        let mut staging_name = folder_name.to_os_string();
        staging_name.push(".partial");
        let staging = safety_root.join(staging_name);
        if staging.exists() {
            self.ops.remove_dir_all(&staging)?;
        }

        TreeCopier::with_ops(&self.ops).copy(&game.live_path, &staging)?;

        // The old copy is moved aside, not deleted, until the new one is in place.
        let mut previous = None;
        if existed {
            let mut old_name = folder_name.to_os_string();
            old_name.push(".old");
            let old = safety_root.join(old_name);
            if old.exists() {
                self.ops.remove_dir_all(&old)?;
            }
            self.ops
                .rename(&target, &old)
                .map_err(|e| move_failed(&target, &old, e))?;
            previous = Some(old);
        }

        if let Err(e) = self.ops.rename(&staging, &target) {
            if let Some(old) = &previous {
                if let Err(undo) = self.ops.rename(old, &target) {
                    tracing::error!(path = %old.display(), error = %undo, "failed to put previous safety copy back");
                }
            }
            if let Err(cleanup) = self.ops.remove_dir_all(&staging) {
                tracing::warn!(path = %staging.display(), error = %cleanup, "failed to remove staged safety copy");
            }
            return Err(move_failed(&staging, &target, e));
        }

        if let Some(old) = previous {
            if let Err(e) = self.ops.remove_dir_all(&old) {
                tracing::warn!(path = %old.display(), error = %e, "failed to remove previous safety copy");
            }
        }

        tracing::info!(path = %target.display(), "saved current save before restore");

        Ok(if existed {
            SafetyCopy::Overwritten(target)
        } else {
            SafetyCopy::Created(target)
        })
    }
}

fn move_failed(from: &Path, to: &Path, e: io::Error) -> SaveBackupError {
    SaveBackupError::Io(format!(
        "Failed to move {} to {}: {}",
        from.display(),
        to.display(),
        e
    ))
}
