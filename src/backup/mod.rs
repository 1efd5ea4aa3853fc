//! Backup engine for crx-backup
//!
//! Copies a browser profile's extension data into a named backup and restores it
//! later.
//!
//! # Architecture
//!
//! The backup system consists of two main components:
//!
//! - `BackupManager`: discovers profiles, creates, lists and deletes backups
//! - `RestoreManager`: validates and restores backups, re-applying the timezone
//!
//! # Backup Layout
//!
//! Each backup is a directory under the backup root mirroring the tracked paths
//! of the profile (by default `Preferences` and `Local Extension Settings/`).
//! Records live in `backups_metadata.json` next to them.
//!
//! # Example
//!
//! ```rust,ignore
//! use crx_backup::backup::{BackupManager, RestoreManager};
//! use crx_backup::config::{BackupPaths, Settings};
//! use crx_backup::timezone::Tzutil;
//!
//! let paths = BackupPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//!
//! let manager = BackupManager::new(
//!     paths.clone(),
//!     settings.clone(),
//!     Box::new(Tzutil::from_settings(&settings)),
//! )?;
//! manager.create_backup("Default", "before-update")?;
//!
//! // Later
//! let restore = RestoreManager::new(paths, settings.clone(), Box::new(Tzutil::from_settings(&settings)));
//! let result = restore.restore_backup("before-update")?;
//! println!("{}", result.summary());
//! ```

pub mod copy;
mod manager;
mod profiles;
mod restore;

pub use copy::{SkipReason, SkippedFile};
pub use manager::{BackupManager, BackupSummary};
pub use profiles::list_profiles;
pub use restore::{RestoreManager, RestoreResult, TimezoneOutcome, ValidationResult};
