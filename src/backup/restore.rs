//! Backup restoration for crx-backup
//!
//! Copies a backup's files back over the live profile and re-applies the
//! timezone captured with it.

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};

use super::copy::{copy_tree, remove_path};
use super::manager::{is_single_component, locate_backup_dir};
use crate::config::paths::BackupPaths;
use crate::config::settings::Settings;
use crate::error::{BackupError, BackupResult};
use crate::models::BackupRecord;
use crate::storage::MetadataStore;
use crate::timezone::TimezoneTool;

/// Handles restoring from backups
pub struct RestoreManager {
    paths: BackupPaths,
    settings: Settings,
    store: MetadataStore,
    timezone: Box<dyn TimezoneTool>,
}

impl RestoreManager {
    /// Create a new RestoreManager
    pub fn new(paths: BackupPaths, settings: Settings, timezone: Box<dyn TimezoneTool>) -> Self {
        let store = MetadataStore::new(paths.metadata_file());
        Self {
            paths,
            settings,
            store,
            timezone,
        }
    }

    /// Restore a backup over its source profile
    ///
    /// Every top-level entry of the backup replaces the same-named entry in the
    /// live profile. Fails with `NotFound` before touching anything if the
    /// backup, its directory, or the profile is missing. A timezone that can't
    /// be applied is reported in the result and does not undo the file restore.
    pub fn restore_backup(&self, name: &str) -> BackupResult<RestoreResult> {
        let record = self
            .store
            .get(name)
            .ok_or_else(|| BackupError::backup_not_found(name))?;

        let profile_dir = self.paths.profile_dir(&record.profile);
        if !is_single_component(&record.profile) || !profile_dir.is_dir() {
            return Err(BackupError::profile_not_found(&record.profile));
        }

        let backup_dir = self.storage_dir(name, &record)?;

        let mut entries = fs::read_dir(&backup_dir)
            .and_then(|entries| entries.collect::<Result<Vec<_>, _>>())
            .map_err(|e| {
                BackupError::Io(format!(
                    "Failed to read backup directory {}: {}",
                    backup_dir.display(),
                    e
                ))
            })?;
        entries.sort_by_key(|entry| entry.file_name());

        let mut result = RestoreResult {
            backup_name: name.to_string(),
            profile: record.profile.clone(),
            entries_restored: Vec::new(),
            files_restored: 0,
            timezone: TimezoneOutcome::NotCaptured,
        };

        for entry in entries {
            let src = entry.path();
            let dst = profile_dir.join(entry.file_name());

            remove_path(&dst)?;
            result.files_restored += copy_tree(&src, &dst)?;
            result
                .entries_restored
                .push(entry.file_name().to_string_lossy().into_owned());
        }

        info!(
            "Restored backup '{}' into profile '{}' ({} files)",
            name, record.profile, result.files_restored
        );

        result.timezone = self.apply_timezone(&record);
        Ok(result)
    }

    fn apply_timezone(&self, record: &BackupRecord) -> TimezoneOutcome {
        let Some(label) = record.captured_timezone() else {
            return TimezoneOutcome::NotCaptured;
        };

        if !self.settings.restore_timezone {
            return TimezoneOutcome::Skipped(label.to_string());
        }

        match self.timezone.set_timezone(label) {
            Ok(()) => TimezoneOutcome::Applied(label.to_string()),
            Err(error) => {
                warn!("Could not restore timezone '{}': {}", label, error);
                TimezoneOutcome::Failed {
                    label: label.to_string(),
                    error,
                }
            }
        }
    }

    /// Locate a backup's files, falling back to `<root>/<name>` if the recorded
    /// path has moved away
    fn storage_dir(&self, name: &str, record: &BackupRecord) -> BackupResult<PathBuf> {
        locate_backup_dir(&self.paths, name, record).ok_or_else(|| BackupError::NotFound {
            entity_type: "Backup directory",
            identifier: record.backup_path.display().to_string(),
        })
    }

    /// Check a backup without restoring it
    pub fn validate_backup(&self, name: &str) -> BackupResult<ValidationResult> {
        let record = self
            .store
            .get(name)
            .ok_or_else(|| BackupError::backup_not_found(name))?;

        let profile_exists = is_single_component(&record.profile)
            && self.paths.profile_dir(&record.profile).is_dir();
        let (backup_dir_exists, entries) = match self.storage_dir(name, &record) {
            Ok(dir) => {
                let mut entries: Vec<String> = fs::read_dir(&dir)?
                    .filter_map(|entry| entry.ok())
                    .map(|entry| entry.file_name().to_string_lossy().into_owned())
                    .collect();
                entries.sort();
                (true, entries)
            }
            Err(_) => (false, Vec::new()),
        };

        Ok(ValidationResult {
            record,
            profile_exists,
            backup_dir_exists,
            entries,
        })
    }
}

/// What happened to the timezone during a restore
#[derive(Debug)]
pub enum TimezoneOutcome {
    /// The backup carries no usable timezone label
    NotCaptured,
    /// Timezone restore is disabled in settings
    Skipped(String),
    /// The system timezone was changed
    Applied(String),
    /// The change was refused; the files were still restored
    Failed { label: String, error: BackupError },
}

/// Result of a restore operation
#[derive(Debug)]
pub struct RestoreResult {
    /// Name of the restored backup
    pub backup_name: String,
    /// Profile the files were written into
    pub profile: String,
    /// Top-level entries replaced in the profile
    pub entries_restored: Vec<String>,
    /// Number of files written
    pub files_restored: usize,
    /// Timezone phase outcome
    pub timezone: TimezoneOutcome,
}

impl RestoreResult {
    /// Whether the timezone phase failed
    pub fn timezone_failed(&self) -> bool {
        matches!(self.timezone, TimezoneOutcome::Failed { .. })
    }

    /// Get a summary of what was restored
    pub fn summary(&self) -> String {
        if self.entries_restored.is_empty() {
            format!("Restored: nothing (backup '{}' is empty)", self.backup_name)
        } else {
            format!("Restored: {}", self.entries_restored.join(", "))
        }
    }
}

/// Result of validating a backup
#[derive(Debug)]
pub struct ValidationResult {
    /// The backup's record
    pub record: BackupRecord,
    /// Whether the source profile is present
    pub profile_exists: bool,
    /// Whether the backup's files are present
    pub backup_dir_exists: bool,
    /// Top-level entries the restore would replace
    pub entries: Vec<String>,
}

impl ValidationResult {
    /// Check if a restore would go ahead
    pub fn is_restorable(&self) -> bool {
        self.profile_exists && self.backup_dir_exists
    }

    /// Get a summary of the backup's state
    pub fn summary(&self) -> String {
        match (self.profile_exists, self.backup_dir_exists) {
            (true, true) => format!("Restorable ({} entries)", self.entries.len()),
            (false, _) => format!("Profile '{}' is missing", self.record.profile),
            (true, false) => "Backup files are missing".to_string(),
        }
    }
}
