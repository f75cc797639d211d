//! Game service
//!
//! Business logic for tracking save folders: adding with duplicate checks,
//! removing, listing and lookup. Every change is persisted immediately and
//! recorded in the history log.

use std::fs;
use std::path::Path;

use crate::error::{SaveBackupError, SaveBackupResult};
use crate::history::{Action, HistoryEntry, HistoryLogger};
use crate::models::TrackedGame;
use crate::storage::GameRegistry;

/// Result of asking to track a save folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddGameResult {
    /// The folder is now tracked
    Added(TrackedGame),
    /// The folder was already tracked under this name; nothing changed
    AlreadyTracked { name: String },
}

/// Service for tracked game management
pub struct GameService<'a> {
    registry: &'a mut GameRegistry,
    history: &'a HistoryLogger,
}

impl<'a> GameService<'a> {
    /// Create a new game service
    pub fn new(registry: &'a mut GameRegistry, history: &'a HistoryLogger) -> Self {
        Self { registry, history }
    }

    /// Start tracking a save folder under a name
    ///
    /// The folder must exist. Its canonical path is stored, so the same folder
    /// reached through a different spelling is recognised as already tracked.
    pub fn add(&mut self, name: &str, path: &Path) -> SaveBackupResult<AddGameResult> {
        let name = name.trim();

        if !path.is_dir() {
            return Err(SaveBackupError::Validation(format!(
                "Save folder does not exist or is not a directory: {}",
                path.display()
            )));
        }

        let live_path = fs::canonicalize(path).map_err(|e| {
            SaveBackupError::Io(format!("Failed to resolve {}: {}", path.display(), e))
        })?;

        let game = TrackedGame::new(name, live_path);
        match self.registry.insert(game.clone()) {
            Ok(()) => {}
            Err(SaveBackupError::DuplicatePath { existing, .. }) => {
                tracing::info!(game = %existing, "save folder already tracked");
                return Ok(AddGameResult::AlreadyTracked { name: existing });
            }
            Err(e) => return Err(e),
        }

        self.registry.save()?;
        self.history.record(HistoryEntry::succeeded(
            Action::Add,
            &game.name,
            game.live_path.display().to_string(),
        ));
        tracing::info!(game = %game.name, path = %game.live_path.display(), "tracking save folder");

        Ok(AddGameResult::Added(game))
    }

    /// Stop tracking a game
    ///
    /// Snapshots already taken are left on disk.
    pub fn remove(&mut self, name: &str) -> SaveBackupResult<TrackedGame> {
        let game = self
            .registry
            .remove(name)
            .ok_or_else(|| SaveBackupError::game_not_found(name))?;

        self.registry.save()?;
        self.history.record(HistoryEntry::succeeded(
            Action::Remove,
            &game.name,
            game.live_path.display().to_string(),
        ));

        Ok(game)
    }

    /// All tracked games, sorted by name
    pub fn list(&self) -> Vec<TrackedGame> {
        self.registry.games()
    }

    /// Find a tracked game by name
    pub fn find(&self, name: &str) -> Option<TrackedGame> {
        self.registry.get(name.trim())
    }

    /// Find a tracked game by name, failing if it is not tracked
    pub fn get(&self, name: &str) -> SaveBackupResult<TrackedGame> {
        self.find(name)
            .ok_or_else(|| SaveBackupError::game_not_found(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, GameRegistry, HistoryLogger) {
        let temp_dir = TempDir::new().unwrap();
        let registry = GameRegistry::new(temp_dir.path().join("savefolders.ini"));
        let history = HistoryLogger::new(temp_dir.path().join("history.log"));
        (temp_dir, registry, history)
    }

    fn save_folder(temp_dir: &TempDir, name: &str) -> std::path::PathBuf {
        let path = temp_dir.path().join("live").join(name);
        fs::create_dir_all(&path).unwrap();
        path
    }

    #[test]
    fn test_add_game() {
        let (temp_dir, mut registry, history) = setup();
        let folder = save_folder(&temp_dir, "Celeste");

        let mut service = GameService::new(&mut registry, &history);
        let result = service.add("  Celeste ", &folder).unwrap();

        let AddGameResult::Added(game) = result else {
            panic!("expected Added");
        };
        assert_eq!(game.name, "Celeste");
        assert_eq!(game.live_path, fs::canonicalize(&folder).unwrap());
        assert_eq!(service.list().len(), 1);

        // persisted and logged
        let mut reloaded = GameRegistry::new(temp_dir.path().join("savefolders.ini"));
        assert_eq!(reloaded.load().unwrap(), 1);
        let entries = history.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, Action::Add);
    }

    #[test]
    fn test_add_missing_folder_rejected() {
        let (temp_dir, mut registry, history) = setup();
        let mut service = GameService::new(&mut registry, &history);

        let err = service
            .add("Celeste", &temp_dir.path().join("nope"))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(service.list().is_empty());
    }

    #[test]
    fn test_add_duplicate_path_is_already_tracked() {
        let (temp_dir, mut registry, history) = setup();
        let folder = save_folder(&temp_dir, "Celeste");

        let mut service = GameService::new(&mut registry, &history);
        service.add("Celeste", &folder).unwrap();

        let result = service.add("Celeste 2", &folder.join(".")).unwrap();
        assert_eq!(
            result,
            AddGameResult::AlreadyTracked {
                name: "Celeste".into()
            }
        );
        assert_eq!(service.list().len(), 1);
    }

    #[test]
    fn test_add_recognises_differently_spelled_entry() {
        let (temp_dir, mut registry, history) = setup();
        let folder = save_folder(&temp_dir, "Celeste");
        let spelled = temp_dir.path().join("live").join("..").join("live").join("Celeste");
        fs::write(
            registry.path(),
            format!("Celeste = {}\n", spelled.display()),
        )
        .unwrap();
        registry.load().unwrap();

        let mut service = GameService::new(&mut registry, &history);
        let result = service.add("Celeste 2", &folder).unwrap();

        assert_eq!(
            result,
            AddGameResult::AlreadyTracked {
                name: "Celeste".into()
            }
        );
        assert_eq!(service.list().len(), 1);
    }

    #[test]
    fn test_add_duplicate_name_rejected() {
        let (temp_dir, mut registry, history) = setup();
        let first = save_folder(&temp_dir, "a");
        let second = save_folder(&temp_dir, "b");

        let mut service = GameService::new(&mut registry, &history);
        service.add("Celeste", &first).unwrap();

        let err = service.add("Celeste", &second).unwrap_err();
        assert!(matches!(err, SaveBackupError::DuplicateName(_)));
    }

    #[test]
    fn test_remove_game() {
        let (temp_dir, mut registry, history) = setup();
        let folder = save_folder(&temp_dir, "Celeste");

        let mut service = GameService::new(&mut registry, &history);
        service.add("Celeste", &folder).unwrap();

        let removed = service.remove("Celeste").unwrap();
        assert_eq!(removed.name, "Celeste");
        assert!(service.find("Celeste").is_none());
        assert!(service.remove("Celeste").unwrap_err().is_not_found());

        let mut reloaded = GameRegistry::new(temp_dir.path().join("savefolders.ini"));
        assert_eq!(reloaded.load().unwrap(), 0);
    }
}
