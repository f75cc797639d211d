//! Configuration module for the save backup manager
//!
//! This module provides configuration management including:
//! - Base directory and derived path resolution
//! - User settings persistence (retention limit)

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::Settings;
