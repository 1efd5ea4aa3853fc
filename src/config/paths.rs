//! Path management for crx-backup
//!
//! Resolves the backup storage root and the browser's user-data root.
//!
//! ## Path Resolution Order
//!
//! Backup root:
//! 1. `CRX_BACKUP_DIR` environment variable (if set)
//! 2. `~/chrome_extension_backups`
//!
//! Browser user-data root:
//! 1. `CRX_BACKUP_USER_DATA_DIR` environment variable (if set)
//! 2. `user_data_dir` from `settings.json` (see [`BackupPaths::apply_settings`])
//! 3. Windows: `%LOCALAPPDATA%\Google\Chrome\User Data`
//! 4. macOS: `~/Library/Application Support/Google/Chrome`
//! 5. Linux and others: `~/.config/google-chrome`

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use super::settings::Settings;
use crate::error::BackupError;

/// Environment variable overriding the backup storage root
pub const BACKUP_DIR_ENV: &str = "CRX_BACKUP_DIR";

/// Environment variable overriding the browser user-data root
pub const USER_DATA_DIR_ENV: &str = "CRX_BACKUP_USER_DATA_DIR";

/// File name of the metadata document inside the backup root
pub const METADATA_FILE_NAME: &str = "backups_metadata.json";

/// File name of the settings file inside the backup root
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Manages all paths used by crx-backup
#[derive(Debug, Clone)]
pub struct BackupPaths {
    /// Directory holding every backup plus the metadata document
    backup_root: PathBuf,
    /// The browser's user-data directory (parent of all profiles)
    user_data_dir: PathBuf,
}

impl BackupPaths {
    /// Create a new BackupPaths instance from the environment and platform defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined and no
    /// override is set.
    pub fn new() -> Result<Self, BackupError> {
        let backup_root = match std::env::var_os(BACKUP_DIR_ENV) {
            Some(custom) => PathBuf::from(custom),
            None => home_dir()?.join("chrome_extension_backups"),
        };

        let user_data_dir = match std::env::var_os(USER_DATA_DIR_ENV) {
            Some(custom) => PathBuf::from(custom),
            None => default_user_data_dir()?,
        };

        Ok(Self {
            backup_root,
            user_data_dir,
        })
    }

    /// Create BackupPaths with explicit directories (useful for testing)
    pub fn with_dirs(backup_root: impl Into<PathBuf>, user_data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_root: backup_root.into(),
            user_data_dir: user_data_dir.into(),
        }
    }

    /// Apply the user-data override from settings, unless the environment already set one
    pub fn apply_settings(mut self, settings: &Settings) -> Self {
        if std::env::var_os(USER_DATA_DIR_ENV).is_none() {
            if let Some(dir) = &settings.user_data_dir {
                self.user_data_dir = dir.clone();
            }
        }
        self
    }

    /// Get the backup storage root
    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// Get the browser user-data root
    pub fn user_data_dir(&self) -> &Path {
        &self.user_data_dir
    }

    /// Get the path to the metadata document
    pub fn metadata_file(&self) -> PathBuf {
        self.backup_root.join(METADATA_FILE_NAME)
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.backup_root.join(SETTINGS_FILE_NAME)
    }

    /// Get the storage directory for a named backup
    pub fn backup_dir(&self, name: &str) -> PathBuf {
        self.backup_root.join(name)
    }

    /// Get the live directory of a browser profile
    pub fn profile_dir(&self, profile: &str) -> PathBuf {
        self.user_data_dir.join(profile)
    }

    /// Ensure the backup root exists
    pub fn ensure_directories(&self) -> Result<(), BackupError> {
        std::fs::create_dir_all(&self.backup_root)
            .map_err(|e| BackupError::Io(format!("Failed to create backup directory: {}", e)))
    }
}

fn home_dir() -> Result<PathBuf, BackupError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or_else(|| BackupError::Config("Could not determine home directory".into()))
}

/// Resolve the default Chrome user-data directory based on platform
#[cfg(windows)]
fn default_user_data_dir() -> Result<PathBuf, BackupError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| BackupError::Config("Could not determine LOCALAPPDATA directory".into()))?;
    Ok(dirs
        .data_local_dir()
        .join("Google")
        .join("Chrome")
        .join("User Data"))
}

/// Resolve the default Chrome user-data directory based on platform
#[cfg(target_os = "macos")]
fn default_user_data_dir() -> Result<PathBuf, BackupError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| BackupError::Config("Could not determine home directory".into()))?;
    Ok(dirs.data_dir().join("Google").join("Chrome"))
}

/// Resolve the default Chrome user-data directory based on platform
#[cfg(not(any(windows, target_os = "macos")))]
fn default_user_data_dir() -> Result<PathBuf, BackupError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| BackupError::Config("Could not determine home directory".into()))?;
    Ok(dirs.config_dir().join("google-chrome"))
}
