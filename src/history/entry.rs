//! History entry data structures
//!
//! Defines the actions recorded in the history log and the entry format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Actions that are recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// A save folder started being tracked
    Add,
    /// A tracked game was dropped
    Remove,
    /// A snapshot was taken
    Backup,
    /// A snapshot was copied back over the live save
    Restore,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Add => write!(f, "ADD"),
            Action::Remove => write!(f, "REMOVE"),
            Action::Backup => write!(f, "BACKUP"),
            Action::Restore => write!(f, "RESTORE"),
        }
    }
}

/// A single history log entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the action happened (UTC)
    pub timestamp: DateTime<Utc>,

    /// What was done
    pub action: Action,

    /// Name of the tracked game
    pub game: String,

    /// Whether the action succeeded
    pub success: bool,

    /// Free-form detail: snapshot name, path or error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl HistoryEntry {
    /// Entry for a successful action
    pub fn succeeded(action: Action, game: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            action,
            game: game.into(),
            success: true,
            detail: Some(detail.into()),
        }
    }

    /// Entry for a failed action
    pub fn failed(action: Action, game: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            action,
            game: game.into(),
            success: false,
            detail: Some(reason.into()),
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.action,
            self.game
        );

        if !self.success {
            output.push_str(" FAILED");
        }

        if let Some(detail) = &self.detail {
            output.push_str(&format!(": {}", detail));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Backup.to_string(), "BACKUP");
        assert_eq!(Action::Restore.to_string(), "RESTORE");
    }

    #[test]
    fn test_serialization() {
        let entry = HistoryEntry::succeeded(Action::Backup, "Celeste", "Backup - 2024-01-01 00h00m00s");

        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"action\":\"backup\""));

        let deserialized: HistoryEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, entry);
    }

    #[test]
    fn test_human_readable_format() {
        let entry = HistoryEntry::failed(Action::Restore, "Celeste", "disk full");

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("RESTORE Celeste FAILED: disk full"));
    }
}
