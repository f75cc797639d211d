//! Tracked game display formatting
//!
//! Formats the tracked games as a table for terminal output.

use crate::models::TrackedGame;

/// Format the tracked games as a table
pub fn format_game_list(games: &[TrackedGame]) -> String {
    if games.is_empty() {
        return "No save folders are tracked.\n\nAdd one with: save-backup add <folder>"
            .to_string();
    }

    let name_width = games
        .iter()
        .map(|g| g.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<7}  {}\n",
        "Name",
        "Status",
        "Save Folder",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<7}  {:-<11}\n",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for game in games {
        let status = if game.source_exists() { "ok" } else { "missing" };
        output.push_str(&format!(
            "{:<name_width$}  {:<7}  {}\n",
            game.name,
            status,
            game.live_path.display(),
            name_width = name_width,
        ));
    }

    output.push_str(&format!("\nTotal: {} game(s)\n", games.len()));
    output
}
