use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use save_backup_manager::cli::{self, AppContext, PromptFolderPicker};
use save_backup_manager::config::paths::{AppPaths, BASE_DIR_ENV};
use save_backup_manager::shutdown::ShutdownGuard;

/// Environment variable holding the log filter
const LOG_ENV: &str = "SAVE_BACKUP_LOG";

#[derive(Parser)]
#[command(
    name = "save-backup",
    version,
    about = "Rolling, timestamped backups of game save folders",
    long_about = "Save Backup Manager tracks your game save folders and copies them \
                  into timestamped snapshots under ./Backups, keeping a limited \
                  number per game. Run without a command for the interactive menu."
)]
struct Cli {
    /// Directory holding Backups/, savefolders.ini and config.json
    #[arg(long, global = true, env = BASE_DIR_ENV)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start tracking a save folder
    Add(cli::AddArgs),

    /// List tracked save folders
    #[command(alias = "ls")]
    List,

    /// Back up all tracked games, or a single one
    Backup(cli::BackupArgs),

    /// List the snapshots of a game
    Snapshots(cli::SnapshotsArgs),

    /// Copy a snapshot back over a game's save folder
    Restore(cli::RestoreArgs),

    /// Delete snapshots beyond the retention limit
    Prune(cli::PruneArgs),

    /// Stop tracking a game
    #[command(alias = "rm")]
    Remove(cli::RemoveArgs),

    /// Show recent backup and restore activity
    History(cli::HistoryArgs),

    /// Show paths and settings, or change the retention limit
    Config(cli::ConfigArgs),

    /// Launch the interactive menu
    Menu,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let paths = match cli.base_dir {
        Some(dir) => AppPaths::with_base_dir(dir),
        None => AppPaths::new()?,
    };

    let mut ctx = AppContext::load(paths)?;
    let _guard = ShutdownGuard::install(Arc::clone(&ctx.registry))?;

    let picker = PromptFolderPicker;

    match cli.command {
        Some(Commands::Add(args)) => cli::handle_add(&ctx, args, &picker)?,
        Some(Commands::List) => cli::handle_list(&ctx)?,
        Some(Commands::Backup(args)) => cli::handle_backup(&ctx, args)?,
        Some(Commands::Snapshots(args)) => cli::handle_snapshots(&ctx, args)?,
        Some(Commands::Restore(args)) => cli::handle_restore(&ctx, args)?,
        Some(Commands::Prune(args)) => cli::handle_prune(&ctx, args)?,
        Some(Commands::Remove(args)) => cli::handle_remove(&ctx, args)?,
        Some(Commands::History(args)) => cli::handle_history(&ctx, args)?,
        Some(Commands::Config(args)) => cli::handle_config(&mut ctx, args)?,
        Some(Commands::Menu) | None => cli::run_menu(&ctx, &picker)?,
    }

    Ok(())
}
