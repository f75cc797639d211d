//! Custom error types for the save backup manager
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::backup::copier::CopyError;
use crate::backup::timestamp::TimestampParseError;

/// The main error type for save backup operations
#[derive(Error, Debug)]
pub enum SaveBackupError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A tracked game with this name already exists
    #[error("A tracked game named \"{0}\" already exists")]
    DuplicateName(String),

    /// The save folder is already tracked under another name
    #[error("Save folder {path} is already tracked as \"{existing}\"")]
    DuplicatePath { path: PathBuf, existing: String },

    /// The live save folder of a tracked game is missing
    #[error("Save folder for \"{game}\" does not exist: {path}")]
    SourceMissing { game: String, path: PathBuf },

    /// A tree copy failed on a single entry
    #[error("Failed to copy {path}: {reason}")]
    CopyFailed { path: PathBuf, reason: String },

    /// Snapshot label could not be parsed
    #[error("Timestamp error: {0}")]
    TimestampParse(#[from] TimestampParseError),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl SaveBackupError {
    /// Create a "not found" error for tracked games
    pub fn game_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Game",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for snapshots
    pub fn snapshot_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Snapshot",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for SaveBackupError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SaveBackupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<CopyError> for SaveBackupError {
    fn from(err: CopyError) -> Self {
        Self::CopyFailed {
            reason: err.reason(),
            path: err.path,
        }
    }
}

/// Result type alias for save backup operations
pub type SaveBackupResult<T> = Result<T, SaveBackupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SaveBackupError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = SaveBackupError::game_not_found("Hollow Knight");
        assert_eq!(err.to_string(), "Game not found: Hollow Knight");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_duplicate_path_error() {
        let err = SaveBackupError::DuplicatePath {
            path: PathBuf::from("/saves/hk"),
            existing: "Hollow Knight".into(),
        };
        assert_eq!(
            err.to_string(),
            "Save folder /saves/hk is already tracked as \"Hollow Knight\""
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SaveBackupError = io_err.into();
        assert!(matches!(err, SaveBackupError::Io(_)));
    }

    #[test]
    fn test_from_copy_error() {
        let copy_err = CopyError::new(
            PathBuf::from("/saves/hk/user1.dat"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let err: SaveBackupError = copy_err.into();
        match err {
            SaveBackupError::CopyFailed { path, reason } => {
                assert_eq!(path, PathBuf::from("/saves/hk/user1.dat"));
                assert!(reason.contains("denied"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
