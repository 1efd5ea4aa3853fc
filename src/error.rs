//! Custom error types for crx-backup
//!
//! This module defines the error hierarchy for the backup engine using thiserror.
//! Every failure the core can report maps to one distinguishable variant so that a
//! front-end can decide how to present it.

use thiserror::Error;

/// The main error type for crx-backup operations
#[derive(Error, Debug)]
pub enum BackupError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid caller input (e.g. a backup name that can't be a directory name)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A profile, backup, or backup directory does not exist
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// A backup name collides with an existing record or directory
    #[error("{entity_type} already exists: {identifier}")]
    AlreadyExists {
        entity_type: &'static str,
        identifier: String,
    },

    /// Elevated privileges are required, or a file could not be read
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// An external tool reported failure
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// The metadata document could not be parsed
    #[error("Corrupt metadata: {0}")]
    Corrupt(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BackupError {
    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for browser profiles
    pub fn profile_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Profile",
            identifier: identifier.into(),
        }
    }

    /// Create an "already exists" error for backups
    pub fn backup_exists(identifier: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is an "already exists" error
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Check if this is a permission error
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::PermissionDenied(_))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BackupError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for crx-backup operations
pub type BackupResult<T> = Result<T, BackupError>;
