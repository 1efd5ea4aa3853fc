//! Core data models for crx-backup
//!
//! Backup records as stored in the metadata document, and the naming rules for
//! backups and browser profiles.

pub mod backup;
pub mod profile;

pub use backup::{validate_backup_name, BackupNameError, BackupRecord, TIMESTAMP_FORMAT};
pub use profile::{is_profile_name, DEFAULT_PROFILE};
