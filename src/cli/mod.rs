//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the backup engine.

pub mod backup;
pub mod timezone;

pub use backup::{handle_backup_command, BackupCommands};
pub use timezone::{handle_timezone_command, TimezoneCommands};
