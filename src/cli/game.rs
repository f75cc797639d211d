//! Tracked game CLI commands
//!
//! Implements `add`, `list`, `remove` and `config`.

use std::path::{Path, PathBuf};

use clap::Args;

use super::backup::find_game;
use super::prompt::{self, FolderPicker};
use super::AppContext;
use crate::config::Settings;
use crate::display::format_game_list;
use crate::error::{SaveBackupError, SaveBackupResult};
use crate::models::TrackedGame;
use crate::services::{AddGameResult, GameService};
use crate::shutdown;

/// Arguments for `add`
#[derive(Args, Debug)]
pub struct AddArgs {
    /// Save folder to track (prompted for when omitted)
    pub path: Option<PathBuf>,

    /// Name to track it under; defaults to the folder name
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Arguments for `remove`
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Tracked game name
    pub game: String,

    /// Skip confirmation
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for `config`
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Set how many snapshots are kept per game
    #[arg(long)]
    pub retention_limit: Option<usize>,
}

/// Handle `add`
pub fn handle_add(
    ctx: &AppContext,
    args: AddArgs,
    picker: &dyn FolderPicker,
) -> SaveBackupResult<()> {
    let path = match args.path {
        Some(path) => path,
        None => match picker.pick_folder()? {
            Some(path) => path,
            None => {
                println!("Cancelled.");
                return Ok(());
            }
        },
    };

    let name = match args.name {
        Some(name) => name,
        None => default_game_name(&path).ok_or_else(|| {
            SaveBackupError::Validation(format!(
                "Cannot derive a name from {}; pass --name",
                path.display()
            ))
        })?,
    };

    add_game(ctx, &name, &path)
}

/// Track a folder and report the result
pub(crate) fn add_game(ctx: &AppContext, name: &str, path: &Path) -> SaveBackupResult<()> {
    let mut registry = shutdown::lock(&ctx.registry);
    let mut service = GameService::new(&mut registry, &ctx.history);

    match service.add(name, path)? {
        AddGameResult::Added(game) => {
            println!("Now tracking {}", game);
        }
        AddGameResult::AlreadyTracked { name } => {
            println!("That save folder is already tracked as \"{}\".", name);
        }
    }

    Ok(())
}

/// Folder name of a path, used as the default game name
pub fn default_game_name(path: &Path) -> Option<String> {
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().trim().to_string())
        .filter(|n| !n.is_empty())
}

/// Handle `list`
pub fn handle_list(ctx: &AppContext) -> SaveBackupResult<()> {
    print!("{}", format_game_list(&ctx.games()));
    println!();
    Ok(())
}

/// Handle `remove`
pub fn handle_remove(ctx: &AppContext, args: RemoveArgs) -> SaveBackupResult<()> {
    let force = args.force;
    remove_game(ctx, &args.game, |game| {
        force || {
            let question = format!(
                "Stop tracking \"{}\"? Existing snapshots are kept on disk",
                game.name
            );
            prompt::confirm(&question, false)
        }
    })
}

/// Resolve a game, ask `confirm`, then stop tracking it
///
/// The registry is not locked while `confirm` runs.
pub(crate) fn remove_game(
    ctx: &AppContext,
    name: &str,
    confirm: impl FnOnce(&TrackedGame) -> bool,
) -> SaveBackupResult<()> {
    let game = find_game(ctx, name)?;

    if !confirm(&game) {
        println!("\"{}\" is still tracked.", game.name);
        return Ok(());
    }

    stop_tracking(ctx, &game.name)
}

/// Remove a game from the registry and report it
pub(crate) fn stop_tracking(ctx: &AppContext, name: &str) -> SaveBackupResult<()> {
    let mut registry = shutdown::lock(&ctx.registry);
    let removed = GameService::new(&mut registry, &ctx.history).remove(name)?;
    println!("Stopped tracking \"{}\".", removed.name);
    Ok(())
}

/// Handle `config`
pub fn handle_config(ctx: &mut AppContext, args: ConfigArgs) -> SaveBackupResult<()> {
    if let Some(limit) = args.retention_limit {
        let updated = Settings {
            retention_limit: limit,
            ..ctx.settings.clone()
        };
        updated.save(&ctx.paths)?;
        ctx.settings = updated;
        println!("Retention limit set to {}.", limit);
        println!();
    }

    println!("Save Backup Manager Configuration");
    println!("=================================");
    println!("Base directory:   {}", ctx.paths.base_dir().display());
    println!("Backups:          {}", ctx.paths.backups_dir().display());
    println!("Tracked games:    {}", ctx.paths.games_file().display());
    println!("Settings file:    {}", ctx.paths.settings_file().display());
    println!("History log:      {}", ctx.paths.history_log().display());
    println!();
    println!("Settings:");
    println!("  Snapshots kept per game: {}", ctx.settings.retention_limit);

    Ok(())
}
