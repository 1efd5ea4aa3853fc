//! Configuration module for crx-backup
//!
//! This module provides configuration management including:
//! - Backup root and browser user-data path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::BackupPaths;
pub use settings::Settings;
