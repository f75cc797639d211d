//! Tracked game model
//!
//! A tracked game pairs a user-chosen name with the live save folder that
//! should be backed up. The name doubles as a directory name under `Backups/`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Characters that are not allowed in a game name
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*', '='];

/// Maximum game name length
const MAX_NAME_LEN: usize = 100;

/// A save folder registered for backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedGame {
    /// Unique name, used as the backup folder name
    pub name: String,

    /// Absolute path of the live save folder
    pub live_path: PathBuf,
}

impl TrackedGame {
    /// Create a new tracked game
    pub fn new(name: impl Into<String>, live_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            live_path: live_path.into(),
        }
    }

    /// Whether the live save folder currently exists
    pub fn source_exists(&self) -> bool {
        self.live_path.exists()
    }

    /// Last path segment of the live save folder
    ///
    /// Snapshots keep the save folder under its own name instead of flattening
    /// its contents into the snapshot directory.
    pub fn save_folder_name(&self) -> Option<&std::ffi::OsStr> {
        self.live_path.file_name()
    }

    /// Parent of the live save folder
    pub fn live_parent(&self) -> Option<&Path> {
        self.live_path.parent()
    }

    /// Validate the game name
    pub fn validate(&self) -> Result<(), GameValidationError> {
        validate_name(&self.name)
    }
}

impl fmt::Display for TrackedGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.name, self.live_path.display())
    }
}

/// Check that a name can be stored in the mapping file and used as a folder name
pub fn validate_name(name: &str) -> Result<(), GameValidationError> {
    if name.trim().is_empty() {
        return Err(GameValidationError::EmptyName);
    }

    if name != name.trim() {
        return Err(GameValidationError::SurroundingWhitespace);
    }

    if name.len() > MAX_NAME_LEN {
        return Err(GameValidationError::NameTooLong(name.len()));
    }

    if name == "." || name == ".." {
        return Err(GameValidationError::ReservedName(name.to_string()));
    }

    if let Some(c) = name
        .chars()
        .find(|c| FORBIDDEN_CHARS.contains(c) || c.is_control())
    {
        return Err(GameValidationError::ForbiddenChar(c));
    }

    Ok(())
}

/// Validation errors for tracked game names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameValidationError {
    EmptyName,
    SurroundingWhitespace,
    NameTooLong(usize),
    ReservedName(String),
    ForbiddenChar(char),
}

impl fmt::Display for GameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Game name cannot be empty"),
            Self::SurroundingWhitespace => {
                write!(f, "Game name cannot start or end with whitespace")
            }
            Self::NameTooLong(len) => {
                write!(f, "Game name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
            Self::ReservedName(name) => write!(f, "'{}' cannot be used as a game name", name),
            Self::ForbiddenChar(c) => {
                write!(f, "Game name cannot contain {:?}", c)
            }
        }
    }
}

impl std::error::Error for GameValidationError {}
