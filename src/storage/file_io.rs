//! JSON document I/O
//!
//! Documents are read whole and replaced whole. A replacement goes through a
//! sibling temp file so readers only ever see the old or the new document.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{BackupError, BackupResult};

/// Read a JSON document, or `T::default()` if there is none yet
///
/// A document that exists but does not parse yields [`BackupError::Corrupt`].
pub fn read_json<T, P>(path: P) -> BackupResult<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => {
            return Err(BackupError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            )))
        }
    };

    serde_json::from_slice(&bytes)
        .map_err(|e| BackupError::Corrupt(format!("{}: {}", path.display(), e)))
}

/// Replace a JSON document in one step
///
/// Output is pretty-printed with non-ASCII text kept verbatim. The parent
/// directory must already exist.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> BackupResult<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = serde_json::to_vec_pretty(data)?;

    let staging = staging_path(path);
    if let Err(e) = write_synced(&staging, &bytes).and_then(|_| fs::rename(&staging, path)) {
        let _ = fs::remove_file(&staging);
        return Err(BackupError::Storage(format!(
            "Failed to write {}: {}",
            path.display(),
            e
        )));
    }

    Ok(())
}

/// `<dir>/<file>.tmp`, next to the document so the rename stays on one filesystem
fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.json");

        let data: TestData = read_json(&path).unwrap();
        assert_eq!(data, TestData::default());
    }

    #[test]
    fn test_read_malformed_is_corrupt() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{\"name\": ").unwrap();

        let err = read_json::<TestData, _>(&path).unwrap_err();
        assert!(matches!(err, BackupError::Corrupt(_)));
    }

    #[test]
    fn test_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        let data = TestData {
            name: "时区".to_string(),
            value: 42,
        };

        write_json_atomic(&path, &data).unwrap();

        // Pretty-printed and non-ASCII kept verbatim
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"name\": \"时区\""));

        let loaded: TestData = read_json(&path).unwrap();
        assert_eq!(data, loaded);
    }

    #[test]
    fn test_write_replaces_and_leaves_no_staging_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");
        fs::write(&path, "old").unwrap();

        write_json_atomic(&path, &TestData::default()).unwrap();

        assert!(fs::read_to_string(&path).unwrap().contains("\"value\": 0"));
        assert!(!temp_dir.path().join("test.json.tmp").exists());
    }

    #[test]
    fn test_write_into_missing_directory_fails_cleanly() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("test.json");

        let err = write_json_atomic(&path, &TestData::default()).unwrap_err();
        assert!(matches!(err, BackupError::Storage(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_unserializable_data_is_json_error() {
        use std::collections::HashMap;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.json");

        // JSON object keys must be strings
        let mut data = HashMap::new();
        data.insert(vec![1u8], 1);

        let err = write_json_atomic(&path, &data).unwrap_err();
        assert!(matches!(err, BackupError::Json(_)));
        assert!(!path.exists());
    }
}
