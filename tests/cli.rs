use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn save_backup(base: &Path) -> Command {
    let mut cmd = Command::cargo_bin("save-backup").unwrap();
    cmd.env("SAVE_BACKUP_MANAGER_DIR", base)
        .env_remove("SAVE_BACKUP_LOG");
    cmd
}

fn live_folder(temp: &TempDir, contents: &[u8]) -> PathBuf {
    let live = temp.path().join("games").join("Celeste").join("Saves");
    fs::create_dir_all(&live).unwrap();
    fs::write(live.join("slot1.sav"), contents).unwrap();
    live
}

#[test]
fn list_without_games() {
    let temp = TempDir::new().unwrap();

    save_backup(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No save folders are tracked"));

    assert!(temp.path().join("Backups").is_dir());
}

#[test]
fn add_then_list() {
    let temp = TempDir::new().unwrap();
    let live = live_folder(&temp, b"one");

    save_backup(temp.path())
        .args(["add", "--name", "Celeste"])
        .arg(&live)
        .assert()
        .success()
        .stdout(predicate::str::contains("Now tracking Celeste"));

    let ini = fs::read_to_string(temp.path().join("savefolders.ini")).unwrap();
    assert!(ini.starts_with("Celeste = "));

    save_backup(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Celeste").and(predicate::str::contains("Total: 1 game(s)")));

    save_backup(temp.path())
        .args(["add", "--name", "Other"])
        .arg(&live)
        .assert()
        .success()
        .stdout(predicate::str::contains("already tracked as \"Celeste\""));
}

#[test]
fn add_rejects_missing_folder() {
    let temp = TempDir::new().unwrap();

    save_backup(temp.path())
        .args(["add", "--name", "Celeste"])
        .arg(temp.path().join("nowhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn backup_creates_snapshot() {
    let temp = TempDir::new().unwrap();
    let live = live_folder(&temp, b"one");

    save_backup(temp.path())
        .args(["add", "--name", "Celeste"])
        .arg(&live)
        .assert()
        .success();

    save_backup(temp.path())
        .arg("backup")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backups made for the following games:"));

    let game_dir = temp.path().join("Backups").join("Celeste");
    let snapshots: Vec<_> = fs::read_dir(&game_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(snapshots.len(), 1);

    let name = snapshots[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("Backup - "));
    assert_eq!(
        fs::read(snapshots[0].join("Saves").join("slot1.sav")).unwrap(),
        b"one"
    );

    save_backup(temp.path())
        .args(["snapshots", "Celeste"])
        .assert()
        .success()
        .stdout(predicate::str::contains(name).and(predicate::str::contains("[latest]")));
}

#[test]
fn restore_latest_snapshot() {
    let temp = TempDir::new().unwrap();
    let live = live_folder(&temp, b"before");

    save_backup(temp.path())
        .args(["add", "--name", "Celeste"])
        .arg(&live)
        .assert()
        .success();
    save_backup(temp.path()).arg("backup").assert().success();

    fs::write(live.join("slot1.sav"), b"after").unwrap();

    save_backup(temp.path())
        .args(["restore", "Celeste"])
        .assert()
        .success()
        .stdout(predicate::str::contains("restored 1 file(s)"));

    assert_eq!(fs::read(live.join("slot1.sav")).unwrap(), b"before");
    let safety = live
        .parent()
        .unwrap()
        .join("CurrentSaveBackup")
        .join("Saves")
        .join("slot1.sav");
    assert_eq!(fs::read(safety).unwrap(), b"after");

    save_backup(temp.path())
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains("RESTORE Celeste"));
}

#[test]
fn restore_unknown_game_fails() {
    let temp = TempDir::new().unwrap();

    save_backup(temp.path())
        .args(["restore", "Nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Game not found: Nobody"));
}

#[test]
fn config_rejects_zero_retention() {
    let temp = TempDir::new().unwrap();

    save_backup(temp.path())
        .args(["config", "--retention-limit", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Snapshots kept per game: 3"));

    save_backup(temp.path())
        .args(["config", "--retention-limit", "0"])
        .assert()
        .failure();
}
