//! Snapshot, backup run and history display formatting

use crate::backup::{BackupOutcome, RestoreOutcome};
use crate::history::HistoryEntry;
use crate::models::Snapshot;
use crate::services::BackupRun;

/// Format the snapshots of one game, newest first and numbered
///
/// The numbers match the order used by the interactive restore prompt.
pub fn format_snapshot_list(game_name: &str, snapshots: &[Snapshot]) -> String {
    if snapshots.is_empty() {
        return format!("No snapshots found for {}.", game_name);
    }

    let mut output = format!("Snapshots of {}\n", game_name);
    output.push_str(&format!("{}\n", "=".repeat(13 + game_name.chars().count())));

    for (i, snapshot) in snapshots.iter().rev().enumerate() {
        let marker = if i == 0 { " [latest]" } else { "" };
        let warning = if snapshot.has_timestamp() {
            ""
        } else {
            " (unrecognised name)"
        };
        output.push_str(&format!(
            "  {:>2}. {}{}{}\n",
            i + 1,
            snapshot.dir_name(),
            marker,
            warning
        ));
    }

    output.push_str(&format!("\nTotal: {} snapshot(s)\n", snapshots.len()));
    output
}

/// Format the result of backing up several games
pub fn format_backup_run(run: &BackupRun) -> String {
    let mut output = String::new();

    for (game, outcome) in &run.results {
        let status = match outcome {
            BackupOutcome::BackedUp { .. } => "OK",
            BackupOutcome::SourceMissing { .. } => "MISSING",
            BackupOutcome::Failed(_) => "FAILED",
        };
        output.push_str(&format!("[{:<7}] {}: {}\n", status, game.name, outcome.summary()));
    }

    let backed_up = run.backed_up();
    output.push('\n');
    if backed_up.is_empty() {
        output.push_str("No save data needed backing up.\n");
    } else {
        output.push_str("Backups made for the following games:\n");
        for game in backed_up {
            output.push_str(&format!("  {}\n", game.name));
        }
    }

    output
}

/// Format the result of a restore
pub fn format_restore_outcome(game_name: &str, outcome: &RestoreOutcome) -> String {
    let status = if outcome.is_restored() { "OK" } else { "FAILED" };
    format!("[{}] {}: {}", status, game_name, outcome.summary())
}

/// Format history entries, one per line
pub fn format_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No history recorded yet.".to_string();
    }

    entries
        .iter()
        .map(|e| format!("{}\n", e.format_human_readable()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::CopyReport;
    use crate::error::SaveBackupError;
    use crate::history::Action;
    use crate::models::TrackedGame;
    use std::path::{Path, PathBuf};

    fn snapshot(label: &str) -> Snapshot {
        let path = PathBuf::from("/backups/Celeste").join(format!("Backup - {}", label));
        Snapshot::from_dir("Celeste", &path).unwrap()
    }

    #[test]
    fn test_format_snapshot_list_newest_first() {
        let snapshots = vec![
            snapshot("garbage"),
            snapshot("2024-01-01 10h00m00s"),
            snapshot("2024-02-01 10h00m00s"),
        ];

        let output = format_snapshot_list("Celeste", &snapshots);
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], "Snapshots of Celeste");
        assert_eq!(lines[1].len(), lines[0].len());
        assert!(lines[2].contains("2024-02-01") && lines[2].ends_with("[latest]"));
        assert!(lines[4].contains("garbage") && lines[4].ends_with("(unrecognised name)"));
    }

    #[test]
    fn test_format_empty_snapshot_list() {
        assert_eq!(
            format_snapshot_list("Celeste", &[]),
            "No snapshots found for Celeste."
        );
    }

    #[test]
    fn test_format_backup_run() {
        let run = BackupRun {
            results: vec![
                (
                    TrackedGame::new("Celeste", "/saves/celeste"),
                    BackupOutcome::BackedUp {
                        snapshot: snapshot("2024-02-01 10h00m00s"),
                        evicted: Vec::new(),
                        report: CopyReport::default(),
                    },
                ),
                (
                    TrackedGame::new("Gone", "/saves/gone"),
                    BackupOutcome::SourceMissing {
                        path: Path::new("/saves/gone").to_path_buf(),
                    },
                ),
                (
                    TrackedGame::new("Broken", "/saves/broken"),
                    BackupOutcome::Failed(SaveBackupError::Io("disk full".into())),
                ),
            ],
        };

        let output = format_backup_run(&run);
        assert!(output.contains("[OK     ] Celeste"));
        assert!(output.contains("[MISSING] Gone"));
        assert!(output.contains("[FAILED ] Broken"));
        assert!(output.ends_with("Backups made for the following games:\n  Celeste\n"));
    }

    #[test]
    fn test_format_backup_run_nothing_backed_up() {
        let output = format_backup_run(&BackupRun::default());
        assert!(output.contains("No save data needed backing up."));
    }

    #[test]
    fn test_format_history() {
        let entries = vec![HistoryEntry::failed(Action::Backup, "Celeste", "boom")];
        let output = format_history(&entries);
        assert!(output.contains("BACKUP Celeste FAILED: boom"));
        assert_eq!(format_history(&[]), "No history recorded yet.");
    }
}
