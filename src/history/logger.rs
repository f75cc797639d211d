//! History logger for the append-only history log
//!
//! Each entry is written as a single JSON line and flushed immediately.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{SaveBackupError, SaveBackupResult};

use super::entry::HistoryEntry;

/// Handles writing history entries to the log file
pub struct HistoryLogger {
    /// Path to the history log file
    log_path: PathBuf,
}

impl HistoryLogger {
    /// Create a new HistoryLogger that writes to the specified path
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append an entry to the log
    pub fn log(&self, entry: &HistoryEntry) -> SaveBackupResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| SaveBackupError::Io(format!("Failed to open history log: {}", e)))?;

        let json = serde_json::to_string(entry).map_err(|e| {
            SaveBackupError::Json(format!("Failed to serialize history entry: {}", e))
        })?;

        writeln!(file, "{}", json)
            .map_err(|e| SaveBackupError::Io(format!("Failed to write history entry: {}", e)))?;

        file.flush()
            .map_err(|e| SaveBackupError::Io(format!("Failed to flush history log: {}", e)))?;

        Ok(())
    }

    /// Append an entry, logging instead of failing
    ///
    /// History is informational; a backup must not fail because the log
    /// could not be written.
    pub fn record(&self, entry: HistoryEntry) {
        if let Err(e) = self.log(&entry) {
            tracing::warn!(error = %e, "could not write history entry");
        }
    }

    /// Read all entries, oldest first
    ///
    /// Lines that do not parse are skipped with a warning.
    pub fn read_all(&self) -> SaveBackupResult<Vec<HistoryEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| SaveBackupError::Io(format!("Failed to open history log: {}", e)))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                SaveBackupError::Io(format!(
                    "Failed to read history line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(line = line_num + 1, error = %e, "skipping unreadable history line");
                }
            }
        }

        Ok(entries)
    }

    /// Read the most recent N entries, oldest first
    pub fn read_recent(&self, count: usize) -> SaveBackupResult<Vec<HistoryEntry>> {
        let mut all_entries = self.read_all()?;
        let start = all_entries.len().saturating_sub(count);
        Ok(all_entries.split_off(start))
    }

    /// Get the path to the history log file
    pub fn path(&self) -> &PathBuf {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::entry::Action;
    use tempfile::TempDir;

    fn create_test_logger() -> (HistoryLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = HistoryLogger::new(temp_dir.path().join("history.log"));
        (logger, temp_dir)
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();

        logger
            .log(&HistoryEntry::succeeded(Action::Add, "Celeste", "/saves/celeste"))
            .unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, Action::Add);
        assert_eq!(entries[0].game, "Celeste");
    }

    #[test]
    fn test_read_recent() {
        let (logger, _temp) = create_test_logger();

        for i in 0..10 {
            logger.record(HistoryEntry::succeeded(
                Action::Backup,
                format!("game-{}", i),
                "ok",
            ));
        }

        let recent = logger.read_recent(3).unwrap();
        let games: Vec<_> = recent.iter().map(|e| e.game.as_str()).collect();
        assert_eq!(games, vec!["game-7", "game-8", "game-9"]);
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();
        assert!(logger.read_all().unwrap().is_empty());
        assert!(logger.read_recent(5).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_line_skipped() {
        let (logger, temp) = create_test_logger();
        logger.record(HistoryEntry::failed(Action::Backup, "Celeste", "boom"));
        let mut file = OpenOptions::new()
            .append(true)
            .open(temp.path().join("history.log"))
            .unwrap();
        writeln!(file, "{{not json").unwrap();
        logger.record(HistoryEntry::succeeded(Action::Restore, "Celeste", "ok"));

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(!entries[0].success);
        assert_eq!(entries[1].action, Action::Restore);
    }

    #[test]
    fn test_survives_restart() {
        let (logger, temp) = create_test_logger();
        logger.record(HistoryEntry::succeeded(Action::Backup, "Celeste", "ok"));

        let logger2 = HistoryLogger::new(temp.path().join("history.log"));
        assert_eq!(logger2.read_all().unwrap().len(), 1);
    }
}
