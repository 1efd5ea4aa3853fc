//! crx-backup - Backup and restore for browser extension settings
//!
//! This library snapshots the extension-related data of a Chromium-family browser
//! profile into named backups, records them in a JSON metadata document, and
//! restores them later, re-applying the system timezone that was active when the
//! backup was taken.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Backup records and naming rules
//! - `storage`: JSON metadata store
//! - `backup`: Backup creation, listing, deletion and restore
//! - `timezone`: System timezone access through an external tool
//! - `cli` / `display`: Command handlers and terminal formatting
//!
//! # Example
//!
//! ```rust,ignore
//! use crx_backup::config::{paths::BackupPaths, settings::Settings};
//!
//! let paths = BackupPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let paths = paths.apply_settings(&settings);
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod storage;
pub mod timezone;

pub use error::{BackupError, BackupResult};
