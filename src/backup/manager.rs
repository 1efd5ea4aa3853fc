//! Backup manager for crx-backup
//!
//! Creates, lists and deletes backups of a profile's extension data. Every
//! operation that changes backup state updates the metadata store as its last
//! step.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::copy::{backup_tracked_path, remove_path, CopyReport, SkippedFile};
use super::profiles::list_profiles;
use crate::config::paths::BackupPaths;
use crate::config::settings::Settings;
use crate::error::{BackupError, BackupResult};
use crate::models::{validate_backup_name, BackupRecord};
use crate::storage::{BackupMap, MetadataStore};
use crate::timezone::TimezoneTool;

/// Result of a successful backup
#[derive(Debug, Clone)]
pub struct BackupSummary {
    /// Name the backup was stored under
    pub name: String,
    /// The record written to the metadata store
    pub record: BackupRecord,
    /// Number of files copied
    pub files_copied: usize,
    /// Files left out (lock files, unreadable files)
    pub skipped: Vec<SkippedFile>,
}

/// Manages backup creation, listing and deletion
pub struct BackupManager {
    /// Backup root and browser user-data paths
    paths: BackupPaths,
    /// Tracked paths and skip rules
    settings: Settings,
    /// Metadata document
    store: MetadataStore,
    /// Source of the timezone label recorded with each backup
    timezone: Box<dyn TimezoneTool>,
}

impl BackupManager {
    /// Create a new BackupManager, initializing the backup root on first use
    pub fn new(
        paths: BackupPaths,
        settings: Settings,
        timezone: Box<dyn TimezoneTool>,
    ) -> BackupResult<Self> {
        let store = MetadataStore::open(&paths)?;
        Ok(Self {
            paths,
            settings,
            store,
            timezone,
        })
    }

    /// List the browser profiles available for backup
    pub fn list_profiles(&self) -> Vec<String> {
        list_profiles(self.paths.user_data_dir())
    }

    /// Back up the tracked files of `profile` under `name`
    ///
    /// Fails with `NotFound` when the profile directory is missing and with
    /// `AlreadyExists` when `name` is taken; neither failure touches the
    /// filesystem. Unreadable files are skipped and reported in the summary.
    pub fn create_backup(&self, profile: &str, name: &str) -> BackupResult<BackupSummary> {
        validate_backup_name(name).map_err(|e| BackupError::Validation(e.to_string()))?;
        self.settings.validate()?;

        let profile_dir = self.paths.profile_dir(profile);
        if !is_single_component(profile) || !profile_dir.is_dir() {
            return Err(BackupError::profile_not_found(profile));
        }

        let backup_dir = self.paths.backup_dir(name);
        if self.store.contains(name) || fs::symlink_metadata(&backup_dir).is_ok() {
            return Err(BackupError::backup_exists(name));
        }

        fs::create_dir(&backup_dir).map_err(|e| {
            BackupError::Io(format!(
                "Failed to create backup directory {}: {}",
                backup_dir.display(),
                e
            ))
        })?;

        let report = match self.copy_profile(&profile_dir, &backup_dir) {
            Ok(report) => report,
            Err(e) => {
                discard_backup_dir(&backup_dir);
                return Err(e);
            }
        };

        let timezone = self.timezone.current_label();
        let backup_path = std::path::absolute(&backup_dir).unwrap_or_else(|_| backup_dir.clone());
        let record = BackupRecord::new(profile, timezone, backup_path);

        if let Err(e) = self.store.insert(name, record.clone()) {
            discard_backup_dir(&backup_dir);
            return Err(e);
        }

        info!(
            "Created backup '{}' of profile '{}' ({} files copied, {} skipped)",
            name,
            profile,
            report.files_copied,
            report.skipped.len()
        );

        Ok(BackupSummary {
            name: name.to_string(),
            record,
            files_copied: report.files_copied,
            skipped: report.skipped,
        })
    }

    fn copy_profile(&self, profile_dir: &Path, backup_dir: &Path) -> BackupResult<CopyReport> {
        let mut report = CopyReport::default();
        for relative in &self.settings.tracked_paths {
            backup_tracked_path(profile_dir, relative, backup_dir, &self.settings, &mut report)?;
        }
        Ok(report)
    }

    /// Delete a backup's files and its record
    ///
    /// Both the recorded location and `<root>/<name>` are cleared, so a backup
    /// root that was moved or copied keeps no orphaned directory.
    pub fn delete_backup(&self, name: &str) -> BackupResult<BackupRecord> {
        let record = self.get_backup(name)?;

        for dir in backup_dir_candidates(&self.paths, name, &record) {
            remove_path(&dir)?;
        }
        self.store.remove(name)?;

        info!("Deleted backup '{}'", name);
        Ok(record)
    }

    /// Every backup record, keyed by name
    pub fn list_backups_with_details(&self) -> BackupMap {
        self.store.load()
    }

    /// Get a specific backup by name
    pub fn get_backup(&self, name: &str) -> BackupResult<BackupRecord> {
        self.store
            .get(name)
            .ok_or_else(|| BackupError::backup_not_found(name))
    }

    /// Get backup root path
    pub fn backup_root(&self) -> PathBuf {
        self.paths.backup_root().to_path_buf()
    }
}

/// A profile name must name a direct child of the user-data root
pub(crate) fn is_single_component(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Where a backup's files may live: the recorded path, then `<root>/<name>`
fn backup_dir_candidates(paths: &BackupPaths, name: &str, record: &BackupRecord) -> Vec<PathBuf> {
    let mut candidates = vec![record.backup_path.clone()];
    let fallback = paths.backup_dir(name);
    if fallback != record.backup_path {
        candidates.push(fallback);
    }
    candidates
}

/// The first existing storage directory of a backup
pub(crate) fn locate_backup_dir(
    paths: &BackupPaths,
    name: &str,
    record: &BackupRecord,
) -> Option<PathBuf> {
    backup_dir_candidates(paths, name, record)
        .into_iter()
        .find(|dir| dir.is_dir())
}

fn discard_backup_dir(backup_dir: &Path) {
    if let Err(e) = remove_path(backup_dir) {
        warn!(
            "Failed to clean up partial backup {}: {}",
            backup_dir.display(),
            e
        );
    }
}
