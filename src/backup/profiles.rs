//! Browser profile discovery

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::models::is_profile_name;

/// List the profile directories directly under the browser's user-data root
///
/// Order follows directory enumeration. A missing or unreadable root yields an
/// empty list.
pub fn list_profiles(user_data_dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(user_data_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(
                "Cannot read user-data directory {}: {}",
                user_data_dir.display(),
                e
            );
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_profile_name(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_profiles() {
        let temp = TempDir::new().unwrap();
        for dir in ["Default", "Profile 1", "Profile 3", "System Profile", "Crashpad"] {
            fs::create_dir(temp.path().join(dir)).unwrap();
        }
        fs::write(temp.path().join("Local State"), "{}").unwrap();
        fs::write(temp.path().join("Profile.lock"), "").unwrap();

        let mut profiles = list_profiles(temp.path());
        profiles.sort();

        assert_eq!(profiles, vec!["Default", "Profile 1", "Profile 3"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(list_profiles(&temp.path().join("absent")).is_empty());
    }
}
