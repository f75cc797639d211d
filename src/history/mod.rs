//! History log of backup activity
//!
//! Every add, remove, backup and restore is appended to `history.log` as one
//! JSON line, so past runs can be reviewed with `save-backup history`.

mod entry;
mod logger;

pub use entry::{Action, HistoryEntry};
pub use logger::HistoryLogger;
