//! Backup CLI commands
//!
//! Implements `backup`, `snapshots`, `restore`, `prune` and `history`.

use clap::Args;

use super::game::stop_tracking;
use super::prompt;
use super::AppContext;
use crate::backup::{RestoreOutcome, SafetyCopy};
use crate::display::{format_backup_run, format_history, format_restore_outcome, format_snapshot_list};
use crate::error::{SaveBackupError, SaveBackupResult};
use crate::models::TrackedGame;
use crate::services::{BackupRun, LATEST};
use crate::shutdown;

/// Arguments for `backup`
#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Back up only this game (all tracked games when omitted)
    pub game: Option<String>,

    /// Stop tracking games whose save folder no longer exists
    #[arg(long)]
    pub prune_missing: bool,
}

/// Arguments for `snapshots`
#[derive(Args, Debug)]
pub struct SnapshotsArgs {
    /// Tracked game name
    pub game: String,
}

/// Arguments for `restore`
#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Tracked game name
    pub game: String,

    /// Snapshot folder name or label (use 'latest' for most recent)
    #[arg(default_value = LATEST)]
    pub snapshot: String,

    /// Replace an existing CurrentSaveBackup copy with the current save
    #[arg(long)]
    pub overwrite_safety: bool,
}

/// Arguments for `prune`
#[derive(Args, Debug)]
pub struct PruneArgs {
    /// Prune only this game (all tracked games when omitted)
    pub game: Option<String>,
}

/// Arguments for `history`
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value = "20")]
    pub limit: usize,
}

/// Handle `backup`
pub fn handle_backup(ctx: &AppContext, args: BackupArgs) -> SaveBackupResult<()> {
    let games = selected_games(ctx, args.game.as_deref())?;
    if games.is_empty() {
        println!("No save folders are tracked.");
        println!("Add one with: save-backup add <folder>");
        return Ok(());
    }

    let run = ctx.backup_service().backup_all(&games);
    print!("{}", format_backup_run(&run));

    let missing = missing_names(&run);
    if !missing.is_empty() {
        if args.prune_missing {
            forget_games(ctx, &missing, false)?;
        } else {
            println!();
            println!("Missing save folders are still tracked.");
            println!("Stop tracking them with: save-backup backup --prune-missing");
        }
    }

    match run.failed_count() {
        0 => Ok(()),
        failed => Err(SaveBackupError::Storage(format!(
            "{} of {} backup(s) failed",
            failed,
            run.results.len()
        ))),
    }
}

/// Names of the games whose save folder was missing during a run
pub(crate) fn missing_names(run: &BackupRun) -> Vec<String> {
    run.missing().into_iter().map(|g| g.name.clone()).collect()
}

/// Stop tracking games, optionally asking about each one first
pub(crate) fn forget_games(ctx: &AppContext, names: &[String], ask: bool) -> SaveBackupResult<()> {
    for name in names {
        if ask {
            let question = format!(
                "The save folder for \"{}\" no longer exists. Stop tracking it?",
                name
            );
            if !prompt::confirm(&question, false) {
                println!(
                    "Despite the save folder not existing for \"{}\", it will be kept.",
                    name
                );
                continue;
            }
        }

        stop_tracking(ctx, name)?;
    }
    Ok(())
}

/// Handle `snapshots`
pub fn handle_snapshots(ctx: &AppContext, args: SnapshotsArgs) -> SaveBackupResult<()> {
    let game = find_game(ctx, &args.game)?;
    let snapshots = ctx.backup_service().list_snapshots(&game.name)?;
    print!("{}", format_snapshot_list(&game.name, &snapshots));
    println!();
    Ok(())
}

/// Handle `restore`
pub fn handle_restore(ctx: &AppContext, args: RestoreArgs) -> SaveBackupResult<()> {
    let game = find_game(ctx, &args.game)?;
    let service = ctx.backup_service();
    let snapshot = service.resolve_snapshot(&game.name, &args.snapshot)?;

    println!("Restoring {} from '{}'...", game.name, snapshot.dir_name());
    let outcome = service.restore(&game, &snapshot, args.overwrite_safety);
    report_restore(&game, outcome)
}

/// Print a restore outcome, turning a failure into an error
pub(crate) fn report_restore(game: &TrackedGame, outcome: RestoreOutcome) -> SaveBackupResult<()> {
    match outcome {
        RestoreOutcome::Restored { ref safety, .. } => {
            println!("{}", format_restore_outcome(&game.name, &outcome));
            if let SafetyCopy::Kept(path) = safety {
                println!(
                    "The copy at {} was taken before an earlier restore; use --overwrite-safety to refresh it.",
                    path.display()
                );
            }
            Ok(())
        }
        RestoreOutcome::Failed(err) => Err(err),
    }
}

/// Handle `prune`
pub fn handle_prune(ctx: &AppContext, args: PruneArgs) -> SaveBackupResult<()> {
    let games = selected_games(ctx, args.game.as_deref())?;
    let service = ctx.backup_service();

    let mut total = 0;
    for game in &games {
        let deleted = service.prune(&game.name)?;
        if !deleted.is_empty() {
            println!("{}: removed {} old snapshot(s)", game.name, deleted.len());
        }
        total += deleted.len();
    }

    println!(
        "Pruned {} snapshot(s); keeping at most {} per game.",
        total, ctx.settings.retention_limit
    );
    Ok(())
}

/// Handle `history`
pub fn handle_history(ctx: &AppContext, args: HistoryArgs) -> SaveBackupResult<()> {
    let entries = ctx.history.read_recent(args.limit)?;
    print!("{}", format_history(&entries));
    println!();
    Ok(())
}

pub(crate) fn find_game(ctx: &AppContext, name: &str) -> SaveBackupResult<TrackedGame> {
    shutdown::lock(&ctx.registry)
        .get(name.trim())
        .ok_or_else(|| SaveBackupError::game_not_found(name))
}

fn selected_games(ctx: &AppContext, name: Option<&str>) -> SaveBackupResult<Vec<TrackedGame>> {
    match name {
        Some(name) => Ok(vec![find_game(ctx, name)?]),
        None => Ok(ctx.games()),
    }
}
