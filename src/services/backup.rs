//! Backup service
//!
//! Runs backups and restores for tracked games, resolves snapshot selectors
//! and records every run in the history log.

use std::path::PathBuf;

use crate::backup::{snapshots, BackupManager, BackupOutcome, RestoreManager, RestoreOutcome};
use crate::config::{AppPaths, Settings};
use crate::error::{SaveBackupError, SaveBackupResult};
use crate::history::{Action, HistoryEntry, HistoryLogger};
use crate::models::{Snapshot, TrackedGame};

/// Selector that picks the newest snapshot of a game
pub const LATEST: &str = "latest";

/// Outcomes of backing up a set of games, in processing order
#[derive(Debug, Default)]
pub struct BackupRun {
    pub results: Vec<(TrackedGame, BackupOutcome)>,
}

impl BackupRun {
    /// Games that got a new snapshot
    pub fn backed_up(&self) -> Vec<&TrackedGame> {
        self.results
            .iter()
            .filter(|(_, outcome)| outcome.is_backed_up())
            .map(|(game, _)| game)
            .collect()
    }

    /// Games whose live save folder no longer exists
    pub fn missing(&self) -> Vec<&TrackedGame> {
        self.results
            .iter()
            .filter(|(_, outcome)| matches!(outcome, BackupOutcome::SourceMissing { .. }))
            .map(|(game, _)| game)
            .collect()
    }

    /// Number of games whose backup failed
    pub fn failed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, outcome)| matches!(outcome, BackupOutcome::Failed(_)))
            .count()
    }

    /// Whether every game was either backed up or skipped as missing
    pub fn all_ok(&self) -> bool {
        self.failed_count() == 0
    }
}

/// Service for backup and restore runs
pub struct BackupService<'a> {
    manager: BackupManager,
    restorer: RestoreManager,
    history: &'a HistoryLogger,
}

impl<'a> BackupService<'a> {
    /// Create a new backup service
    pub fn new(paths: &AppPaths, settings: &Settings, history: &'a HistoryLogger) -> Self {
        Self {
            manager: BackupManager::new(paths.backups_dir(), settings.retention_limit),
            restorer: RestoreManager::new(),
            history,
        }
    }

    /// Back up every game, one after another
    ///
    /// A failure in one game does not stop the others.
    pub fn backup_all(&self, games: &[TrackedGame]) -> BackupRun {
        let results = games
            .iter()
            .map(|game| (game.clone(), self.backup_game(game)))
            .collect();
        BackupRun { results }
    }

    /// Back up a single game
    pub fn backup_game(&self, game: &TrackedGame) -> BackupOutcome {
        let outcome = self.manager.backup_one(game);

        let entry = match &outcome {
            BackupOutcome::BackedUp { snapshot, .. } => {
                HistoryEntry::succeeded(Action::Backup, &game.name, snapshot.dir_name())
            }
            _ => HistoryEntry::failed(Action::Backup, &game.name, outcome.summary()),
        };
        self.history.record(entry);

        outcome
    }

    /// Snapshots of a game, oldest first
    pub fn list_snapshots(&self, game_name: &str) -> SaveBackupResult<Vec<Snapshot>> {
        self.manager.list_snapshots(game_name)
    }

    /// Find a snapshot by directory name, label or `latest`
    pub fn resolve_snapshot(&self, game_name: &str, selector: &str) -> SaveBackupResult<Snapshot> {
        let snapshots = self.list_snapshots(game_name)?;
        let selector = selector.trim();

        let found = if selector.eq_ignore_ascii_case(LATEST) {
            snapshots::latest(&snapshots).cloned()
        } else {
            snapshots
                .into_iter()
                .find(|s| s.dir_name() == selector || s.label == selector)
        };

        found.ok_or_else(|| {
            SaveBackupError::snapshot_not_found(format!("{} ({})", selector, game_name))
        })
    }

    /// Whether restoring this game would have to replace an earlier safety copy
    pub fn safety_copy_exists(&self, game: &TrackedGame) -> bool {
        self.restorer.safety_copy_exists(game)
    }

    /// Restore a snapshot over a game's live save folder
    pub fn restore(
        &self,
        game: &TrackedGame,
        snapshot: &Snapshot,
        overwrite_safety: bool,
    ) -> RestoreOutcome {
        let outcome = self.restorer.restore_one(game, snapshot, overwrite_safety);

        let entry = if outcome.is_restored() {
            HistoryEntry::succeeded(Action::Restore, &game.name, snapshot.dir_name())
        } else {
            HistoryEntry::failed(Action::Restore, &game.name, outcome.summary())
        };
        self.history.record(entry);

        outcome
    }

    /// Delete snapshots beyond the retention limit
    pub fn prune(&self, game_name: &str) -> SaveBackupResult<Vec<PathBuf>> {
        self.manager.prune(game_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct TestEnv {
        temp: TempDir,
        paths: AppPaths,
        history: HistoryLogger,
    }

    fn create_test_env() -> TestEnv {
        let temp = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp.path().to_path_buf());
        let history = HistoryLogger::new(paths.history_log());
        TestEnv {
            temp,
            paths,
            history,
        }
    }

    fn live_game(env: &TestEnv, name: &str, contents: &[u8]) -> TrackedGame {
        let live = env.temp.path().join("live").join(name).join("Saves");
        fs::create_dir_all(&live).unwrap();
        fs::write(live.join("slot.sav"), contents).unwrap();
        TrackedGame::new(name, live)
    }

    fn seed_snapshot(env: &TestEnv, game: &str, label: &str, contents: &[u8]) {
        let dir = env
            .paths
            .game_backup_dir(game)
            .join(format!("Backup - {}", label))
            .join("Saves");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("slot.sav"), contents).unwrap();
    }

    #[test]
    fn test_backup_all_isolates_missing_games() {
        let env = create_test_env();
        let settings = Settings::default();
        let service = BackupService::new(&env.paths, &settings, &env.history);

        let celeste = live_game(&env, "Celeste", b"c");
        let gone = TrackedGame::new("Gone", env.temp.path().join("nowhere"));
        let hk = live_game(&env, "Hollow Knight", b"h");

        let run = service.backup_all(&[celeste, gone, hk]);

        assert_eq!(run.backed_up().len(), 2);
        let missing = run.missing();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, "Gone");
        assert!(run.all_ok());
        assert!(!env.paths.game_backup_dir("Gone").exists());

        let entries = env.history.read_all().unwrap();
        assert_eq!(entries.len(), 3);
        assert!(!entries[1].success);
    }

    #[test]
    fn test_resolve_snapshot() {
        let env = create_test_env();
        let settings = Settings::default();
        let service = BackupService::new(&env.paths, &settings, &env.history);

        seed_snapshot(&env, "Celeste", "2024-01-01 10h00m00s", b"old");
        seed_snapshot(&env, "Celeste", "2024-02-01 10h00m00s", b"new");

        let latest = service.resolve_snapshot("Celeste", "latest").unwrap();
        assert_eq!(latest.label, "2024-02-01 10h00m00s");

        let by_label = service
            .resolve_snapshot("Celeste", "2024-01-01 10h00m00s")
            .unwrap();
        let by_dir = service
            .resolve_snapshot("Celeste", "Backup - 2024-01-01 10h00m00s")
            .unwrap();
        assert_eq!(by_label, by_dir);

        assert!(service
            .resolve_snapshot("Celeste", "2023-01-01 10h00m00s")
            .unwrap_err()
            .is_not_found());
        assert!(service
            .resolve_snapshot("Nobody", "latest")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_restore_records_history() {
        let env = create_test_env();
        let settings = Settings::default();
        let service = BackupService::new(&env.paths, &settings, &env.history);

        let game = live_game(&env, "Celeste", b"current");
        seed_snapshot(&env, "Celeste", "2024-01-01 10h00m00s", b"older");

        let snapshot = service.resolve_snapshot("Celeste", "latest").unwrap();
        assert!(!service.safety_copy_exists(&game));

        let outcome = service.restore(&game, &snapshot, false);
        assert!(outcome.is_restored());
        assert!(service.safety_copy_exists(&game));
        assert_eq!(fs::read(game.live_path.join("slot.sav")).unwrap(), b"older");

        let entries = env.history.read_all().unwrap();
        assert_eq!(entries.last().unwrap().action, Action::Restore);
        assert!(entries.last().unwrap().success);
    }

    #[test]
    fn test_prune_uses_retention_limit() {
        let env = create_test_env();
        let settings = Settings {
            retention_limit: 2,
            ..Settings::default()
        };
        let service = BackupService::new(&env.paths, &settings, &env.history);

        for day in 1..=4 {
            seed_snapshot(&env, "Celeste", &format!("2024-01-0{} 10h00m00s", day), b"x");
        }

        let deleted = service.prune("Celeste").unwrap();
        assert_eq!(deleted.len(), 2);

        let remaining = service.list_snapshots("Celeste").unwrap();
        let labels: Vec<_> = remaining.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["2024-01-03 10h00m00s", "2024-01-04 10h00m00s"]);
    }
}
