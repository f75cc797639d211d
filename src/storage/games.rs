//! Tracked game registry
//!
//! Loads and saves the game name -> save folder mapping kept in
//! `savefolders.ini`, one `name = path` entry per line.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{SaveBackupError, SaveBackupResult};
use crate::models::{validate_name, TrackedGame};

use super::file_io::{read_text_optional, write_atomic};

/// In-memory copy of the tracked games mapping
#[derive(Debug, Clone)]
pub struct GameRegistry {
    path: PathBuf,
    games: BTreeMap<String, PathBuf>,
}

impl GameRegistry {
    /// Create an empty registry backed by the given file
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            games: BTreeMap::new(),
        }
    }

    /// Path of the mapping file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the mapping from disk, replacing the in-memory copy
    ///
    /// A missing file is an empty mapping. Returns the number of entries loaded.
    pub fn load(&mut self) -> SaveBackupResult<usize> {
        self.games = match read_text_optional(&self.path)? {
            Some(contents) => parse_mappings(&contents),
            None => {
                tracing::info!(path = %self.path.display(), "no mapping file, starting empty");
                BTreeMap::new()
            }
        };
        Ok(self.games.len())
    }

    /// Write the mapping to disk
    pub fn save(&self) -> SaveBackupResult<()> {
        write_atomic(&self.path, render_mappings(&self.games).as_bytes())?;
        tracing::debug!(path = %self.path.display(), count = self.games.len(), "saved mappings");
        Ok(())
    }

    /// Add a game
    ///
    /// Fails with `DuplicateName` if the name is taken and with `DuplicatePath`
    /// if the save folder is already tracked under another name. The mapping is
    /// left untouched on failure.
    pub fn insert(&mut self, game: TrackedGame) -> SaveBackupResult<()> {
        game.validate()
            .map_err(|e| SaveBackupError::Validation(e.to_string()))?;

        if self.games.contains_key(&game.name) {
            return Err(SaveBackupError::DuplicateName(game.name));
        }

        if let Some(existing) = self.find_by_path(&game.live_path) {
            return Err(SaveBackupError::DuplicatePath {
                path: game.live_path,
                existing: existing.to_string(),
            });
        }

        self.games.insert(game.name, game.live_path);
        Ok(())
    }

    /// Remove a game by name
    pub fn remove(&mut self, name: &str) -> Option<TrackedGame> {
        self.games
            .remove_entry(name)
            .map(|(name, path)| TrackedGame::new(name, path))
    }

    /// Get a game by name
    pub fn get(&self, name: &str) -> Option<TrackedGame> {
        self.games
            .get(name)
            .map(|path| TrackedGame::new(name, path.clone()))
    }

    /// Name under which a save folder is tracked
    ///
    /// Paths that exist are compared in canonical form, so the same folder
    /// spelled differently in the mapping file still matches.
    pub fn find_by_path(&self, path: &Path) -> Option<&str> {
        let wanted = canonical_or_raw(path);
        self.games
            .iter()
            .find(|(_, tracked)| tracked.as_path() == path || canonical_or_raw(tracked) == wanted)
            .map(|(name, _)| name.as_str())
    }

    /// All tracked games, sorted by name
    pub fn games(&self) -> Vec<TrackedGame> {
        self.games
            .iter()
            .map(|(name, path)| TrackedGame::new(name.clone(), path.clone()))
            .collect()
    }

    /// Number of tracked games
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether no games are tracked
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

fn canonical_or_raw(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Parse `name = path` lines
///
/// Whitespace around both sides is trimmed. Blank lines and lines starting
/// with `#` or `;` are ignored; lines without `=` or with a name that is not a
/// valid folder name are skipped with a warning.
/// When a name repeats, the last entry wins.
pub fn parse_mappings(contents: &str) -> BTreeMap<String, PathBuf> {
    let mut games = BTreeMap::new();

    for (line_num, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        let Some((name, path)) = line.split_once('=') else {
            tracing::warn!(line = line_num + 1, "ignoring mapping line without '='");
            continue;
        };

        let (name, path) = (name.trim(), path.trim());
        if name.is_empty() || path.is_empty() {
            tracing::warn!(line = line_num + 1, "ignoring mapping line with an empty side");
            continue;
        }

        if let Err(e) = validate_name(name) {
            tracing::warn!(line = line_num + 1, game = name, error = %e, "ignoring mapping with invalid game name");
            continue;
        }

        if games.insert(name.to_string(), PathBuf::from(path)).is_some() {
            tracing::warn!(game = name, "duplicate game name in mapping file, keeping the last");
        }
    }

    games
}

/// Render the mapping as `name = path` lines, sorted by name
pub fn render_mappings(games: &BTreeMap<String, PathBuf>) -> String {
    games
        .iter()
        .map(|(name, path)| format!("{} = {}\n", name, path.display()))
        .collect()
}
