//! Snapshot enumeration and retention
//!
//! Lists the snapshot directories of one game, orders them by the timestamp in
//! their name and selects the oldest ones for eviction.

use std::fs;
use std::path::Path;

use crate::error::{SaveBackupError, SaveBackupResult};
use crate::models::Snapshot;

/// Marker a directory name must contain to count as a snapshot
const SNAPSHOT_MARKER: &str = "Backup";

/// Result of applying the retention limit to a snapshot set
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Eviction {
    /// Oldest snapshots, to be removed before the next backup
    pub to_delete: Vec<Snapshot>,
    /// Snapshots that stay
    pub to_keep: Vec<Snapshot>,
}

impl Eviction {
    /// Whether anything has to be deleted
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty()
    }
}

/// List the snapshots of a game, oldest first
///
/// Only immediate subdirectories whose name contains `Backup` are considered.
/// Directories with an unparseable timestamp are still returned and sort first.
/// A missing backup root is an empty set.
pub fn list(backup_root: &Path, game_name: &str) -> SaveBackupResult<Vec<Snapshot>> {
    if !backup_root.exists() {
        return Ok(Vec::new());
    }

    let mut snapshots = Vec::new();

    for entry in fs::read_dir(backup_root).map_err(|e| {
        SaveBackupError::Io(format!(
            "Failed to read backup directory {}: {}",
            backup_root.display(),
            e
        ))
    })? {
        let entry = entry.map_err(|e| {
            SaveBackupError::Io(format!("Failed to read directory entry: {}", e))
        })?;

        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        if !entry
            .file_name()
            .to_string_lossy()
            .contains(SNAPSHOT_MARKER)
        {
            continue;
        }

        if let Some(snapshot) = Snapshot::from_dir(game_name, &path) {
            if !snapshot.has_timestamp() {
                tracing::warn!(
                    path = %path.display(),
                    "snapshot name has no valid timestamp, treating it as the oldest"
                );
            }
            snapshots.push(snapshot);
        }
    }

    sort_ascending(&mut snapshots);
    Ok(snapshots)
}

/// Sort snapshots oldest first, ties broken by directory name
pub fn sort_ascending(snapshots: &mut [Snapshot]) {
    snapshots.sort_by(|a, b| a.chronological_cmp(b));
}

/// Split a snapshot set into the entries to delete and the entries to keep
///
/// Leaves room for one new snapshot: when `len + 1` would exceed
/// `retention_limit`, the oldest entries are marked until `retention_limit - 1`
/// remain. The input order does not matter.
pub fn evict(mut snapshots: Vec<Snapshot>, retention_limit: usize) -> Eviction {
    sort_ascending(&mut snapshots);

    let keep = retention_limit.saturating_sub(1);
    let delete_count = snapshots.len().saturating_sub(keep);

    let to_keep = snapshots.split_off(delete_count);
    Eviction {
        to_delete: snapshots,
        to_keep,
    }
}

/// Most recent snapshot of a set
pub fn latest(snapshots: &[Snapshot]) -> Option<&Snapshot> {
    snapshots.iter().max_by(|a, b| a.chronological_cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn snapshot(label: &str) -> Snapshot {
        let path = PathBuf::from(format!("/backups/game/Backup - {}", label));
        Snapshot::from_dir("game", &path).unwrap()
    }

    fn labels(snapshots: &[Snapshot]) -> Vec<String> {
        snapshots.iter().map(|s| s.label.clone()).collect()
    }

    #[test]
    fn test_list_missing_root() {
        let temp = TempDir::new().unwrap();
        let snapshots = list(&temp.path().join("nope"), "game").unwrap();
        assert!(snapshots.is_empty());
    }

    #[test]
    fn test_list_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("Backup - 2024-05-01 10h00m00s")).unwrap();
        fs::create_dir(root.join("Backup - 2023-05-01 10h00m00s")).unwrap();
        fs::create_dir(root.join("Backup - garbage")).unwrap();
        fs::create_dir(root.join("unrelated")).unwrap();
        fs::write(root.join("Backup - 2020-01-01 00h00m00s"), b"a file").unwrap();

        let snapshots = list(root, "game").unwrap();
        assert_eq!(
            labels(&snapshots),
            vec!["garbage", "2023-05-01 10h00m00s", "2024-05-01 10h00m00s"]
        );
        assert!(snapshots.iter().all(|s| s.game_name == "game"));
    }

    #[test]
    fn test_evict_below_limit_keeps_everything() {
        let set = vec![
            snapshot("2024-01-03 00h00m00s"),
            snapshot("2024-01-01 00h00m00s"),
            snapshot("2024-01-02 00h00m00s"),
            snapshot("2024-01-04 00h00m00s"),
        ];
        let eviction = evict(set, 5);
        assert!(eviction.is_empty());
        assert_eq!(eviction.to_keep.len(), 4);
    }

    #[test]
    fn test_evict_at_limit_removes_oldest() {
        let set = vec![
            snapshot("2024-01-03 00h00m00s"),
            snapshot("2024-01-05 00h00m00s"),
            snapshot("2024-01-01 00h00m00s"),
            snapshot("2024-01-02 00h00m00s"),
            snapshot("2024-01-04 00h00m00s"),
        ];
        let eviction = evict(set, 5);
        assert_eq!(labels(&eviction.to_delete), vec!["2024-01-01 00h00m00s"]);
        assert_eq!(eviction.to_keep.len(), 4);
    }

    #[test]
    fn test_evict_kept_count_is_min_of_len_and_limit_minus_one() {
        for n in 0..8 {
            for limit in 1..7 {
                let set: Vec<_> = (0..n)
                    .map(|i| snapshot(&format!("2024-01-{:02} 00h00m00s", i + 1)))
                    .collect();
                let eviction = evict(set, limit);
                assert_eq!(eviction.to_keep.len(), n.min(limit - 1));
                assert_eq!(eviction.to_delete.len() + eviction.to_keep.len(), n);

                // every deleted entry is older than every kept entry
                if let (Some(newest_deleted), Some(oldest_kept)) =
                    (eviction.to_delete.last(), eviction.to_keep.first())
                {
                    assert!(newest_deleted.created_at < oldest_kept.created_at);
                }
            }
        }
    }

    #[test]
    fn test_evict_unparseable_goes_first() {
        let set = vec![
            snapshot("2024-01-01 00h00m00s"),
            snapshot("not a date"),
            snapshot("2024-01-02 00h00m00s"),
        ];
        let eviction = evict(set, 3);
        assert_eq!(labels(&eviction.to_delete), vec!["not a date"]);
    }

    #[test]
    fn test_evict_zero_limit_deletes_all() {
        let set = vec![snapshot("2024-01-01 00h00m00s")];
        let eviction = evict(set, 0);
        assert_eq!(eviction.to_delete.len(), 1);
        assert!(eviction.to_keep.is_empty());
    }

    #[test]
    fn test_latest() {
        let set = vec![
            snapshot("2024-01-02 00h00m00s"),
            snapshot("2024-01-03 00h00m00s"),
            snapshot("2024-01-01 00h00m00s"),
        ];
        assert_eq!(latest(&set).unwrap().label, "2024-01-03 00h00m00s");
        assert!(latest(&[]).is_none());
    }
}
