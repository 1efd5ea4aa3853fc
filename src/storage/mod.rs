//! Storage layer for crx-backup
//!
//! Provides the JSON metadata store and the atomic file helpers it is built on.

pub mod file_io;
pub mod metadata;

pub use file_io::{read_json, write_json_atomic};
pub use metadata::{BackupMap, MetadataStore};
