//! File-tree copying for backup and restore
//!
//! Backups are best effort: lock files and unreadable files are skipped and
//! reported. Restores copy everything and fail on the first error.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use crate::config::settings::Settings;
use crate::error::{BackupError, BackupResult};

/// Why a file was left out of a backup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Transient lock file held by a running browser
    LockFile,
    /// The file could not be read
    PermissionDenied(String),
}

/// A file left out of a backup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Outcome of copying tracked paths into a backup
#[derive(Debug, Default, Clone)]
pub struct CopyReport {
    /// Number of files copied
    pub files_copied: usize,
    /// Files that were skipped
    pub skipped: Vec<SkippedFile>,
}

impl CopyReport {
    fn skip(&mut self, path: &Path, reason: SkipReason) {
        self.skipped.push(SkippedFile {
            path: path.to_path_buf(),
            reason,
        });
    }
}

/// Copy one tracked path of a profile into a backup directory
///
/// `relative` is the tracked path relative to `profile_dir`; it keeps the same
/// relative location under `backup_dir`. Missing tracked paths are ignored.
pub fn backup_tracked_path(
    profile_dir: &Path,
    relative: &str,
    backup_dir: &Path,
    settings: &Settings,
    report: &mut CopyReport,
) -> BackupResult<()> {
    let src = profile_dir.join(relative);
    let dest = backup_dir.join(relative);

    if fs::symlink_metadata(&src).is_err() {
        debug!("Tracked path {} does not exist, skipping", src.display());
        return Ok(());
    }

    if !src.is_dir() {
        return backup_file(&src, &dest, settings, report);
    }

    for entry in WalkDir::new(&src).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(&src).to_path_buf();
                match e.into_io_error() {
                    Some(io_err) if io_err.kind() == io::ErrorKind::PermissionDenied => {
                        warn!("Skipping unreadable path {}: {}", path.display(), io_err);
                        report.skip(&path, SkipReason::PermissionDenied(io_err.to_string()));
                        continue;
                    }
                    Some(io_err) => {
                        return Err(BackupError::Io(format!(
                            "Failed to read {}: {}",
                            path.display(),
                            io_err
                        )))
                    }
                    None => {
                        return Err(BackupError::Io(format!(
                            "Filesystem loop at {}",
                            path.display()
                        )))
                    }
                }
            }
        };

        let rel_path = entry
            .path()
            .strip_prefix(&src)
            .map_err(|e| BackupError::Io(e.to_string()))?;
        let target = dest.join(rel_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| {
                BackupError::Io(format!("Failed to create {}: {}", target.display(), e))
            })?;
        } else {
            backup_file(entry.path(), &target, settings, report)?;
        }
    }

    Ok(())
}

/// Copy a single file into a backup, honouring skip rules
fn backup_file(
    src: &Path,
    dest: &Path,
    settings: &Settings,
    report: &mut CopyReport,
) -> BackupResult<()> {
    let file_name = src
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default();

    if settings.is_skipped(&file_name) {
        trace!("Skipping lock file {}", src.display());
        report.skip(src, SkipReason::LockFile);
        return Ok(());
    }

    match copy_file(src, dest) {
        Ok(_) => {
            trace!("Copied {} -> {}", src.display(), dest.display());
            report.files_copied += 1;
            Ok(())
        }
        Err(e) => skip_or_fail(src, e, report),
    }
}

/// Unreadable files are left out of the backup; any other failure aborts it
fn skip_or_fail(src: &Path, e: io::Error, report: &mut CopyReport) -> BackupResult<()> {
    if e.kind() != io::ErrorKind::PermissionDenied {
        return Err(BackupError::Io(format!(
            "Failed to copy {}: {}",
            src.display(),
            e
        )));
    }

    warn!("Skipping unreadable file {}: {}", src.display(), e);
    report.skip(src, SkipReason::PermissionDenied(e.to_string()));
    Ok(())
}

/// Copy a file or directory tree to `dest`, replacing nothing
///
/// Used by restore, where every file must arrive.
pub fn copy_tree(src: &Path, dest: &Path) -> BackupResult<usize> {
    if !src.is_dir() {
        copy_file(src, dest).map_err(|e| copy_error(src, e))?;
        return Ok(1);
    }

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(|e| BackupError::Io(e.to_string()))?;
        let rel_path = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| BackupError::Io(e.to_string()))?;
        let target = dest.join(rel_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            copy_file(entry.path(), &target).map_err(|e| copy_error(entry.path(), e))?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Remove a file or directory tree if it exists
pub fn remove_path(path: &Path) -> BackupResult<()> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

fn copy_error(path: &Path, e: io::Error) -> BackupError {
    match e.kind() {
        io::ErrorKind::PermissionDenied => {
            BackupError::PermissionDenied(format!("{}: {}", path.display(), e))
        }
        _ => BackupError::Io(format!("Failed to copy {}: {}", path.display(), e)),
    }
}

/// Copy file contents and permissions, then carry over the modification time
fn copy_file(src: &Path, dest: &Path) -> io::Result<u64> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let bytes = fs::copy(src, dest)?;

    if let Err(e) = preserve_mtime(src, dest) {
        debug!("Could not preserve mtime of {}: {}", dest.display(), e);
    }

    Ok(bytes)
}

fn preserve_mtime(src: &Path, dest: &Path) -> io::Result<()> {
    let modified = fs::metadata(src)?.modified()?;
    File::options().write(true).open(dest)?.set_modified(modified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_backup_single_file() {
        let temp = TempDir::new().unwrap();
        let profile = temp.path().join("Default");
        let backup = temp.path().join("snap1");
        write(&profile.join("Preferences"), "0123456789");

        let mut report = CopyReport::default();
        backup_tracked_path(&profile, "Preferences", &backup, &Settings::default(), &mut report)
            .unwrap();

        assert_eq!(report.files_copied, 1);
        assert_eq!(fs::read_to_string(backup.join("Preferences")).unwrap(), "0123456789");
    }

    #[test]
    fn test_backup_directory_skips_lock_files() {
        let temp = TempDir::new().unwrap();
        let profile = temp.path().join("Default");
        let backup = temp.path().join("snap1");
        let settings_dir = profile.join("Local Extension Settings");
        write(&settings_dir.join("ext1").join("000003.log"), "hello");
        write(&settings_dir.join("ext1").join("LOCK"), "");
        write(&settings_dir.join("ext2").join("CURRENT"), "MANIFEST-000001");

        let mut report = CopyReport::default();
        backup_tracked_path(
            &profile,
            "Local Extension Settings",
            &backup,
            &Settings::default(),
            &mut report,
        )
        .unwrap();

        let copied = backup.join("Local Extension Settings");
        assert_eq!(fs::read_to_string(copied.join("ext1").join("000003.log")).unwrap(), "hello");
        assert!(copied.join("ext2").join("CURRENT").exists());
        assert!(!copied.join("ext1").join("LOCK").exists());

        assert_eq!(report.files_copied, 2);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].reason, SkipReason::LockFile);
    }

    #[test]
    fn test_backup_missing_tracked_path_is_ignored() {
        let temp = TempDir::new().unwrap();
        let profile = temp.path().join("Default");
        fs::create_dir_all(&profile).unwrap();

        let mut report = CopyReport::default();
        backup_tracked_path(
            &profile,
            "Local Extension Settings",
            &temp.path().join("snap1"),
            &Settings::default(),
            &mut report,
        )
        .unwrap();

        assert_eq!(report.files_copied, 0);
        assert!(!temp.path().join("snap1").exists());
    }

    #[test]
    fn test_copy_preserves_mtime() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src.txt");
        let dest = temp.path().join("out").join("dest.txt");
        write(&src, "data");

        let past = SystemTime::now() - Duration::from_secs(86_400);
        File::options().write(true).open(&src).unwrap().set_modified(past).unwrap();

        copy_file(&src, &dest).unwrap();

        let copied = fs::metadata(&dest).unwrap().modified().unwrap();
        let original = fs::metadata(&src).unwrap().modified().unwrap();
        assert_eq!(copied, original);
    }

    #[test]
    fn test_copy_tree_and_remove_path() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        write(&src.join("a").join("b.txt"), "b");
        write(&src.join("c.txt"), "c");

        let dest = temp.path().join("dest");
        assert_eq!(copy_tree(&src, &dest).unwrap(), 2);
        assert_eq!(fs::read_to_string(dest.join("a").join("b.txt")).unwrap(), "b");

        remove_path(&dest).unwrap();
        assert!(!dest.exists());

        // Removing something that is already gone is fine
        remove_path(&dest).unwrap();
    }

    #[test]
    fn test_permission_denied_is_skipped() {
        let mut report = CopyReport::default();
        let src = Path::new("Default/Local Extension Settings/ext1/000003.log");

        skip_or_fail(
            src,
            io::Error::new(io::ErrorKind::PermissionDenied, "Access is denied."),
            &mut report,
        )
        .unwrap();

        assert_eq!(report.files_copied, 0);
        assert_eq!(
            report.skipped,
            vec![SkippedFile {
                path: src.to_path_buf(),
                reason: SkipReason::PermissionDenied("Access is denied.".into()),
            }]
        );
    }

    #[test]
    fn test_other_copy_errors_abort() {
        let mut report = CopyReport::default();

        let err = skip_or_fail(
            Path::new("Preferences"),
            io::Error::new(io::ErrorKind::Other, "disk full"),
            &mut report,
        )
        .unwrap_err();

        assert!(matches!(err, BackupError::Io(_)));
        assert!(report.skipped.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_backup_skips_unreadable_file() {
        use std::os::unix::fs::PermissionsExt;

        // Root ignores file permissions
        if unsafe { libc::geteuid() } == 0 {
            return;
        }

        let temp = TempDir::new().unwrap();
        let profile = temp.path().join("Default");
        let dir = profile.join("Local Extension Settings").join("ext1");
        write(&dir.join("readable.log"), "ok");
        write(&dir.join("secret.log"), "nope");
        fs::set_permissions(dir.join("secret.log"), fs::Permissions::from_mode(0o000)).unwrap();

        let mut report = CopyReport::default();
        let result = backup_tracked_path(
            &profile,
            "Local Extension Settings",
            &temp.path().join("snap1"),
            &Settings::default(),
            &mut report,
        );

        fs::set_permissions(dir.join("secret.log"), fs::Permissions::from_mode(0o644)).unwrap();

        result.unwrap();
        assert_eq!(report.files_copied, 1);
        assert!(matches!(
            report.skipped[0].reason,
            SkipReason::PermissionDenied(_)
        ));
    }
}
