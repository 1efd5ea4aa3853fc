//! Metadata store
//!
//! A single JSON document mapping backup name to [`BackupRecord`]:
//!
//! ```json
//! {
//!   "backups": {
//!     "snap1": {
//!       "profile": "Default",
//!       "timestamp": "2024-05-01 10:00:00",
//!       "timezone": "(UTC+08:00) Beijing, Chongqing, Hong Kong, Urumqi",
//!       "backup_path": "C:\\Users\\me\\chrome_extension_backups\\snap1"
//!     }
//!   }
//! }
//! ```
//!
//! Every mutation reloads the whole document, edits it in memory and rewrites it
//! atomically.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::file_io::{read_json, write_json_atomic};
use crate::config::paths::BackupPaths;
use crate::error::BackupResult;
use crate::models::BackupRecord;

/// All backup records, keyed by backup name
pub type BackupMap = BTreeMap<String, BackupRecord>;

/// On-disk shape of the metadata document
#[derive(Debug, Default, Serialize, Deserialize)]
struct MetadataDocument {
    #[serde(default)]
    backups: BackupMap,
}

/// Durable mapping from backup name to [`BackupRecord`]
#[derive(Debug, Clone)]
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    /// Create a store backed by the given document path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the store under the backup root, creating an empty document on first use
    pub fn open(paths: &BackupPaths) -> BackupResult<Self> {
        paths.ensure_directories()?;
        let store = Self::new(paths.metadata_file());
        store.initialize()?;
        Ok(store)
    }

    /// Write an empty document if none exists yet
    pub fn initialize(&self) -> BackupResult<()> {
        if !self.path.exists() {
            debug!("Creating metadata document at {}", self.path.display());
            self.save(&BackupMap::new())?;
        }
        Ok(())
    }

    /// Load every record
    ///
    /// A missing or unparsable document yields an empty map; corruption is logged,
    /// never returned.
    pub fn load(&self) -> BackupMap {
        match read_json::<MetadataDocument, _>(&self.path) {
            Ok(document) => document.backups,
            Err(e) => {
                warn!("Treating metadata as empty: {}", e);
                BackupMap::new()
            }
        }
    }

    /// Replace the document with the given records
    pub fn save(&self, backups: &BackupMap) -> BackupResult<()> {
        #[derive(Serialize)]
        struct DocumentRef<'a> {
            backups: &'a BackupMap,
        }

        write_json_atomic(&self.path, &DocumentRef { backups })
    }

    /// Look up a single record
    pub fn get(&self, name: &str) -> Option<BackupRecord> {
        self.load().remove(name)
    }

    /// Check whether a record with this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.load().contains_key(name)
    }

    /// Add or replace a record and persist the document
    pub fn insert(&self, name: impl Into<String>, record: BackupRecord) -> BackupResult<()> {
        let mut backups = self.load();
        backups.insert(name.into(), record);
        self.save(&backups)
    }

    /// Remove a record and persist the document; returns the removed record
    pub fn remove(&self, name: &str) -> BackupResult<Option<BackupRecord>> {
        let mut backups = self.load();
        let removed = backups.remove(name);
        if removed.is_some() {
            self.save(&backups)?;
        }
        Ok(removed)
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }
}
