//! User settings for crx-backup
//!
//! Manages which profile files are tracked, which files are skipped, and how the
//! system timezone is handled.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::paths::BackupPaths;
use crate::error::BackupError;
use crate::storage::file_io::write_json_atomic;

/// User settings for crx-backup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Browser user-data directory; platform default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data_dir: Option<PathBuf>,

    /// Paths inside a profile that get backed up (files or directories)
    #[serde(default = "default_tracked_paths")]
    pub tracked_paths: Vec<String>,

    /// File name suffixes that are never copied (transient lock files)
    #[serde(default = "default_skip_suffixes")]
    pub skip_suffixes: Vec<String>,

    /// Program used to query and set the system timezone
    #[serde(default = "default_timezone_command")]
    pub timezone_command: String,

    /// Whether a restore re-applies the timezone captured with the backup
    #[serde(default = "default_restore_timezone")]
    pub restore_timezone: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_tracked_paths() -> Vec<String> {
    vec![
        "Preferences".to_string(),
        "Local Extension Settings".to_string(),
    ]
}

fn default_skip_suffixes() -> Vec<String> {
    vec!["LOCK".to_string()]
}

fn default_timezone_command() -> String {
    "tzutil".to_string()
}

fn default_restore_timezone() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            user_data_dir: None,
            tracked_paths: default_tracked_paths(),
            skip_suffixes: default_skip_suffixes(),
            timezone_command: default_timezone_command(),
            restore_timezone: default_restore_timezone(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &BackupPaths) -> Result<Self, BackupError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| BackupError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                BackupError::Config(format!("Failed to parse settings file: {}", e))
            })?;
            settings.validate()?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &BackupPaths) -> Result<(), BackupError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Check that every tracked path stays inside a profile directory
    pub fn validate(&self) -> Result<(), BackupError> {
        for tracked in &self.tracked_paths {
            if !is_profile_relative(tracked) {
                return Err(BackupError::Config(format!(
                    "Tracked path '{}' must be relative to the profile and must not contain '..'",
                    tracked
                )));
            }
        }
        Ok(())
    }

    /// Whether a file with this name is excluded from backups
    pub fn is_skipped(&self, file_name: &str) -> bool {
        self.skip_suffixes
            .iter()
            .any(|suffix| file_name.ends_with(suffix.as_str()))
    }
}

/// Only plain path components: no root, drive prefix, `.` or `..`
fn is_profile_relative(tracked: &str) -> bool {
    let path = Path::new(tracked);
    path.components().next().is_some()
        && path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(
            settings.tracked_paths,
            vec!["Preferences", "Local Extension Settings"]
        );
        assert_eq!(settings.timezone_command, "tzutil");
        assert!(settings.restore_timezone);
        assert!(settings.user_data_dir.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackupPaths::with_dirs(temp_dir.path(), temp_dir.path());

        let mut settings = Settings::default();
        settings.restore_timezone = false;
        settings.timezone_command = "/usr/local/bin/tz-wrapper".into();

        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(!loaded.restore_timezone);
        assert_eq!(loaded.timezone_command, "/usr/local/bin/tz-wrapper");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"restore_timezone": false}"#).unwrap();
        assert!(!settings.restore_timezone);
        assert_eq!(settings.skip_suffixes, vec!["LOCK"]);
        assert_eq!(settings.schema_version, 1);
    }

    #[test]
    fn test_invalid_settings_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackupPaths::with_dirs(temp_dir.path(), temp_dir.path());
        std::fs::write(paths.settings_file(), "not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, BackupError::Config(_)));
    }

    #[test]
    fn test_is_skipped() {
        let settings = Settings::default();
        assert!(settings.is_skipped("LOCK"));
        assert!(settings.is_skipped("SingletonLOCK"));
        assert!(!settings.is_skipped("000003.log"));
        assert!(!settings.is_skipped("Lockfile"));
    }

    #[test]
    fn test_tracked_paths_must_stay_inside_profile() {
        let temp_dir = TempDir::new().unwrap();
        let outside = temp_dir.path().join("important.txt");

        for tracked in [
            outside.to_string_lossy().into_owned(),
            "../Profile 1/Preferences".to_string(),
            "Local Extension Settings/../../x".to_string(),
            "./Preferences".to_string(),
            String::new(),
        ] {
            let settings = Settings {
                tracked_paths: vec!["Preferences".into(), tracked.clone()],
                ..Settings::default()
            };
            assert!(
                matches!(settings.validate(), Err(BackupError::Config(_))),
                "accepted {:?}",
                tracked
            );
        }

        let settings = Settings {
            tracked_paths: vec!["Extensions".into(), "Local Extension Settings/abc".into()],
            ..Settings::default()
        };
        settings.validate().unwrap();
        Settings::default().validate().unwrap();
    }

    #[test]
    fn test_load_rejects_escaping_tracked_path() {
        let temp_dir = TempDir::new().unwrap();
        let paths = BackupPaths::with_dirs(temp_dir.path(), temp_dir.path());
        std::fs::write(
            paths.settings_file(),
            r#"{"tracked_paths": ["Preferences", "../../etc"]}"#,
        )
        .unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, BackupError::Config(_)));
    }
}
