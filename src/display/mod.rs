//! Display formatting for terminal output
//!
//! Plain-text tables and summaries for tracked games, snapshots, backup runs
//! and the history log.

pub mod game;
pub mod snapshot;

pub use game::format_game_list;
pub use snapshot::{
    format_backup_run, format_history, format_restore_outcome, format_snapshot_list,
};
