//! System timezone interop
//!
//! The operating system's timezone is read and changed through an external
//! command-line tool. The engine only talks to the [`TimezoneTool`] trait;
//! [`Tzutil`] is the command-backed implementation.
//!
//! Timezones have two names: an internal identifier (`China Standard Time`) and a
//! display label (`(UTC+08:00) Beijing, Chongqing, Hong Kong, Urumqi`). Backups
//! record the label.

pub mod elevation;
#[cfg(test)]
pub(crate) mod testing;
mod tzutil;

pub use elevation::is_elevated;
pub use tzutil::Tzutil;

use crate::error::BackupResult;

/// Label recorded when the current timezone could not be determined
pub const UNKNOWN_TIMEZONE: &str = "Unknown";

/// Sentinel written by older versions of the tool
const LEGACY_UNKNOWN_TIMEZONE: &str = "未知时区";

/// Check whether a recorded label means "no timezone captured"
pub fn is_unknown_label(label: &str) -> bool {
    let label = label.trim();
    label.is_empty() || label == UNKNOWN_TIMEZONE || label == LEGACY_UNKNOWN_TIMEZONE
}

/// Read and write the system timezone
pub trait TimezoneTool {
    /// Display label of the active timezone, or [`UNKNOWN_TIMEZONE`]. Never fails.
    fn current_label(&self) -> String;

    /// Every known display label, sorted. Empty when the tool is unavailable.
    fn available_labels(&self) -> Vec<String>;

    /// Switch the system timezone
    ///
    /// Fails with `PermissionDenied` when the process is not elevated and with
    /// `OperationFailed` when the tool rejects the change.
    fn set_timezone(&self, label: &str) -> BackupResult<()>;
}

/// One identifier/label pair from the tool's listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimezoneEntry {
    pub label: String,
    pub id: String,
}

/// Parse the listing printed by `tzutil /l`
///
/// The listing is a sequence of blocks separated by blank lines; each block holds
/// a display label followed by its identifier.
pub fn parse_timezone_listing(output: &str) -> Vec<TimezoneEntry> {
    let mut entries = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in output.lines().map(str::trim).chain(std::iter::once("")) {
        if !line.is_empty() {
            block.push(line);
            continue;
        }

        for pair in block.chunks(2) {
            let (label, id) = match pair {
                [label, id] => (*label, *id),
                [single] => (*single, *single),
                _ => continue,
            };
            entries.push(TimezoneEntry {
                label: label.to_string(),
                id: id.to_string(),
            });
        }
        block.clear();
    }

    entries
}
