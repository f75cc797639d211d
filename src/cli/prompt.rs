//! Interactive prompts
//!
//! Thin wrappers over `dialoguer` used by the interactive menu and by
//! commands that need a confirmation. A cancelled prompt (Esc or Ctrl-C on
//! most terminals) is reported as `None`, never as an error.

use std::io;
use std::path::{Path, PathBuf};

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use crate::error::{SaveBackupError, SaveBackupResult};

/// Supplies the save folder to track
pub trait FolderPicker {
    /// Ask for a folder; `None` means the user cancelled
    fn pick_folder(&self) -> SaveBackupResult<Option<PathBuf>>;
}

/// Reads a folder path typed (or pasted) at the terminal
#[derive(Debug, Default)]
pub struct PromptFolderPicker;

impl FolderPicker for PromptFolderPicker {
    fn pick_folder(&self) -> SaveBackupResult<Option<PathBuf>> {
        let answer = Input::<String>::with_theme(&theme())
            .with_prompt("Save folder path (empty to cancel)")
            .allow_empty(true)
            .validate_with(|input: &String| -> Result<(), String> {
                let input = clean_path_input(input);
                if input.is_empty() || Path::new(input).is_dir() {
                    Ok(())
                } else {
                    Err(format!("{} is not an existing folder", input))
                }
            })
            .interact_text();

        let Some(answer) = cancelled_as_none(answer)? else {
            return Ok(None);
        };

        let input = clean_path_input(&answer);
        if input.is_empty() {
            return Ok(None);
        }
        Ok(Some(PathBuf::from(input)))
    }
}

/// Strip whitespace and the quotes file managers add when copying a path
pub fn clean_path_input(input: &str) -> &str {
    let input = input.trim();
    input
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(input)
        .trim()
}

/// Ask a yes/no question
///
/// Any prompt failure counts as "no".
pub fn confirm(prompt: &str, default: bool) -> bool {
    match Confirm::with_theme(&theme())
        .with_prompt(prompt)
        .default(default)
        .interact_opt()
    {
        Ok(answer) => answer.unwrap_or(false),
        Err(e) => {
            tracing::debug!(error = %e, "confirmation prompt failed");
            false
        }
    }
}

/// Ask for a line of text, pre-filled with `default`
///
/// An empty answer without a default is treated as cancelled.
pub fn input_text(prompt: &str, default: Option<&str>) -> SaveBackupResult<Option<String>> {
    let theme = theme();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt(prompt)
        .allow_empty(true);
    if let Some(default) = default {
        input = input.default(default.to_string());
    }

    let answer = cancelled_as_none(input.interact_text())?;
    Ok(answer
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty()))
}

/// Let the user pick one item; returns its index
pub fn select<T: ToString>(prompt: &str, items: &[T]) -> SaveBackupResult<Option<usize>> {
    if items.is_empty() {
        return Ok(None);
    }

    let answer = Select::with_theme(&theme())
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt();

    Ok(cancelled_as_none(answer)?.flatten())
}

fn theme() -> ColorfulTheme {
    ColorfulTheme::default()
}

fn cancelled_as_none<T>(result: Result<T, dialoguer::Error>) -> SaveBackupResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => Ok(None),
        #[allow(unreachable_patterns)]
        Err(e) => Err(SaveBackupError::Io(format!("Prompt failed: {}", e))),
    }
}
