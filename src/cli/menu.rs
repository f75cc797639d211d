//! Interactive menu
//!
//! Runs when no subcommand is given: add a save folder, list tracked games,
//! back up everything, restore a snapshot, or exit.

use super::backup::{forget_games, missing_names, report_restore};
use super::game::{add_game, default_game_name};
use super::prompt::{self, FolderPicker};
use super::AppContext;
use crate::display::{format_backup_run, format_game_list};
use crate::error::SaveBackupResult;

/// Entries of the main menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddFolder,
    ListGames,
    BackupAll,
    Restore,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 5] = [
        MenuChoice::AddFolder,
        MenuChoice::ListGames,
        MenuChoice::BackupAll,
        MenuChoice::Restore,
        MenuChoice::Exit,
    ];
}

impl std::fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MenuChoice::AddFolder => "Add save folder to backup list",
            MenuChoice::ListGames => "List all tracked save folders",
            MenuChoice::BackupAll => "Back up all save folders",
            MenuChoice::Restore => "Restore a snapshot",
            MenuChoice::Exit => "Exit",
        };
        f.write_str(label)
    }
}

/// Run the menu until the user exits
///
/// Errors from a single action are printed and the menu continues.
pub fn run_menu(ctx: &AppContext, picker: &dyn FolderPicker) -> SaveBackupResult<()> {
    println!("Save Backup Manager");
    println!("Tracking {} save folder(s).", ctx.games().len());
    println!();

    loop {
        let choice = match prompt::select("What would you like to do?", &MenuChoice::ALL)? {
            Some(index) => MenuChoice::ALL[index],
            None => MenuChoice::Exit,
        };

        let result = match choice {
            MenuChoice::AddFolder => add_folder(ctx, picker),
            MenuChoice::ListGames => {
                print!("{}", format_game_list(&ctx.games()));
                Ok(())
            }
            MenuChoice::BackupAll => backup_all(ctx),
            MenuChoice::Restore => restore(ctx),
            MenuChoice::Exit => {
                println!("Exiting...");
                return Ok(());
            }
        };

        if let Err(e) = result {
            eprintln!("Error: {}", e);
        }
        println!();
    }
}

fn add_folder(ctx: &AppContext, picker: &dyn FolderPicker) -> SaveBackupResult<()> {
    let Some(path) = picker.pick_folder()? else {
        println!("No folder selected.");
        return Ok(());
    };

    let suggested = default_game_name(&path);
    let Some(name) = prompt::input_text(
        "Name for this save data (a folder with this name holds its backups)",
        suggested.as_deref(),
    )?
    else {
        println!("No name given.");
        return Ok(());
    };

    add_game(ctx, &name, &path)
}

fn backup_all(ctx: &AppContext) -> SaveBackupResult<()> {
    let games = ctx.games();
    if games.is_empty() {
        println!("No save folders are tracked yet.");
        return Ok(());
    }

    let run = ctx.backup_service().backup_all(&games);
    print!("{}", format_backup_run(&run));

    forget_games(ctx, &missing_names(&run), true)
}

fn restore(ctx: &AppContext) -> SaveBackupResult<()> {
    let games = ctx.games();
    if games.is_empty() {
        println!("No save folders are tracked yet.");
        return Ok(());
    }

    let names: Vec<&str> = games.iter().map(|g| g.name.as_str()).collect();
    let Some(index) = prompt::select("Restore which game?", &names)? else {
        return Ok(());
    };
    let game = &games[index];

    let service = ctx.backup_service();
    let mut snapshots = service.list_snapshots(&game.name)?;
    if snapshots.is_empty() {
        println!("No snapshots found for {}.", game.name);
        return Ok(());
    }

    snapshots.reverse();
    let labels: Vec<String> = snapshots.iter().map(|s| s.dir_name()).collect();
    let Some(index) = prompt::select("Restore which snapshot? (newest first)", &labels)? else {
        return Ok(());
    };
    let snapshot = &snapshots[index];

    let question = format!(
        "Overwrite the save folder of {} with '{}'?",
        game.name,
        snapshot.dir_name()
    );
    if !prompt::confirm(&question, false) {
        println!("Restore cancelled.");
        return Ok(());
    }

    let overwrite_safety = service.safety_copy_exists(game)
        && prompt::confirm(
            "A CurrentSaveBackup copy from an earlier restore exists. Replace it with the current save?",
            false,
        );

    report_restore(game, service.restore(game, snapshot, overwrite_safety))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_order() {
        let labels: Vec<String> = MenuChoice::ALL.iter().map(|c| c.to_string()).collect();
        assert_eq!(labels.len(), 5);
        assert_eq!(labels[0], "Add save folder to backup list");
        assert_eq!(MenuChoice::ALL[4], MenuChoice::Exit);
    }
}
