//! Storage layer for the save backup manager
//!
//! Provides atomic file writes and the tracked game registry kept in
//! `savefolders.ini`.

pub mod file_io;
pub mod games;

pub use file_io::{read_json, write_atomic, write_json_atomic};
pub use games::GameRegistry;
