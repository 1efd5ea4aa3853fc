//! Backup record model
//!
//! One entry in the metadata document, describing where a backup lives and what
//! it was taken from.

use std::fmt;
use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::config::paths::{METADATA_FILE_NAME, SETTINGS_FILE_NAME};
use crate::timezone::{is_unknown_label, UNKNOWN_TIMEZONE};

/// Format of [`BackupRecord::timestamp`]
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Characters that can't appear in a directory name on at least one supported platform
const FORBIDDEN_NAME_CHARS: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

/// Metadata describing one backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupRecord {
    /// Name of the profile directory that was backed up
    pub profile: String,

    /// Local creation time, formatted with [`TIMESTAMP_FORMAT`]
    pub timestamp: String,

    /// Display label of the system timezone at backup time
    #[serde(default = "unknown_timezone")]
    pub timezone: String,

    /// Absolute path of the backup's storage directory
    pub backup_path: PathBuf,
}

fn unknown_timezone() -> String {
    UNKNOWN_TIMEZONE.to_string()
}

impl BackupRecord {
    /// Create a record stamped with the current local time
    pub fn new(
        profile: impl Into<String>,
        timezone: impl Into<String>,
        backup_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            profile: profile.into(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            timezone: timezone.into(),
            backup_path: backup_path.into(),
        }
    }

    /// The timezone label worth re-applying, if one was captured
    pub fn captured_timezone(&self) -> Option<&str> {
        if is_unknown_label(&self.timezone) {
            None
        } else {
            Some(self.timezone.as_str())
        }
    }

    /// Parse the creation time; `None` for hand-edited or foreign timestamps
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }
}

/// Validate a caller-chosen backup name
///
/// The name becomes a directory under the backup root, so it must be a single
/// path component and must not shadow the root's own bookkeeping files.
pub fn validate_backup_name(name: &str) -> Result<(), BackupNameError> {
    if name.trim().is_empty() {
        return Err(BackupNameError::Empty);
    }

    if name != name.trim() {
        return Err(BackupNameError::SurroundingWhitespace);
    }

    if name == "." || name == ".." {
        return Err(BackupNameError::Reserved(name.to_string()));
    }

    if let Some(c) = name
        .chars()
        .find(|c| FORBIDDEN_NAME_CHARS.contains(c) || c.is_control())
    {
        return Err(BackupNameError::InvalidChar(c));
    }

    if name.eq_ignore_ascii_case(METADATA_FILE_NAME)
        || name.eq_ignore_ascii_case(SETTINGS_FILE_NAME)
        || name.ends_with(".tmp")
    {
        return Err(BackupNameError::Reserved(name.to_string()));
    }

    Ok(())
}

/// Validation errors for backup names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupNameError {
    Empty,
    SurroundingWhitespace,
    InvalidChar(char),
    Reserved(String),
}

impl fmt::Display for BackupNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Backup name cannot be empty"),
            Self::SurroundingWhitespace => {
                write!(f, "Backup name cannot start or end with whitespace")
            }
            Self::InvalidChar(c) => write!(f, "Backup name cannot contain {:?}", c),
            Self::Reserved(name) => write!(f, "Backup name '{}' is reserved", name),
        }
    }
}

impl std::error::Error for BackupNameError {}
