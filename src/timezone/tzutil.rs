//! Command-backed timezone tool
//!
//! Drives Windows' `tzutil` (or any program accepting the same arguments):
//!
//! - `/g` prints the active timezone identifier
//! - `/l` prints every label/identifier pair
//! - `/s <identifier>` switches the system timezone

use std::process::Command;

use tracing::{debug, info, warn};

use super::{elevation, parse_timezone_listing, TimezoneEntry, TimezoneTool, UNKNOWN_TIMEZONE};
use crate::config::settings::Settings;
use crate::error::{BackupError, BackupResult};

const GET_ARG: &str = "/g";
const LIST_ARG: &str = "/l";
const SET_ARG: &str = "/s";

/// Suffix `tzutil /g` appends when daylight saving adjustment is off
const DST_OFF_SUFFIX: &str = "_dstoff";

/// Timezone access through an external command
#[derive(Debug, Clone)]
pub struct Tzutil {
    program: String,
    elevation_check: fn() -> bool,
}

impl Default for Tzutil {
    fn default() -> Self {
        Self::new("tzutil")
    }
}

impl Tzutil {
    /// Create a tool that runs `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            elevation_check: elevation::is_elevated,
        }
    }

    /// Create a tool using the command configured in settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.timezone_command.clone())
    }

    /// Replace the privilege check consulted before changing the timezone
    pub fn with_elevation_check(mut self, check: fn() -> bool) -> Self {
        self.elevation_check = check;
        self
    }

    /// Program this tool runs
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the tool, returning stdout on success
    fn run(&self, args: &[&str]) -> BackupResult<String> {
        debug!("Running {} {}", self.program, args.join(" "));

        let output = Command::new(&self.program).args(args).output().map_err(|e| {
            BackupError::OperationFailed(format!("Failed to run {}: {}", self.program, e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                "unknown error".to_string()
            } else {
                stderr
            };
            return Err(BackupError::OperationFailed(format!(
                "{} {} exited with {}: {}",
                self.program,
                args.join(" "),
                output.status,
                message
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn list_entries(&self) -> BackupResult<Vec<TimezoneEntry>> {
        self.run(&[LIST_ARG])
            .map(|stdout| parse_timezone_listing(&stdout))
    }

    /// Map a label (or identifier) to the identifier `/s` expects
    fn resolve_id(&self, label: &str) -> String {
        let entries = match self.list_entries() {
            Ok(entries) => entries,
            Err(e) => {
                debug!("Could not list timezones, passing '{}' through: {}", label, e);
                return label.to_string();
            }
        };

        entries
            .into_iter()
            .find(|entry| entry.label == label || entry.id == label)
            .map(|entry| entry.id)
            .unwrap_or_else(|| label.to_string())
    }
}

impl TimezoneTool for Tzutil {
    fn current_label(&self) -> String {
        let current = match self.run(&[GET_ARG]) {
            Ok(stdout) => stdout.trim().to_string(),
            Err(e) => {
                warn!("Could not read current timezone: {}", e);
                return UNKNOWN_TIMEZONE.to_string();
            }
        };
        let id = current.strip_suffix(DST_OFF_SUFFIX).unwrap_or(&current);

        if id.is_empty() {
            return UNKNOWN_TIMEZONE.to_string();
        }

        let entries = match self.list_entries() {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not list timezones: {}", e);
                return UNKNOWN_TIMEZONE.to_string();
            }
        };

        match entries.into_iter().find(|entry| entry.id == id) {
            Some(entry) => entry.label,
            None => {
                warn!("Timezone '{}' missing from listing", id);
                UNKNOWN_TIMEZONE.to_string()
            }
        }
    }

    fn available_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = match self.list_entries() {
            Ok(entries) => entries.into_iter().map(|entry| entry.label).collect(),
            Err(e) => {
                warn!("Could not list timezones: {}", e);
                return Vec::new();
            }
        };
        labels.sort();
        labels.dedup();
        labels
    }

    fn set_timezone(&self, label: &str) -> BackupResult<()> {
        if !(self.elevation_check)() {
            return Err(BackupError::PermissionDenied(
                "administrator privileges are required to change the system timezone".into(),
            ));
        }

        let id = self.resolve_id(label);
        info!("Setting system timezone to '{}' ({})", label, id);
        self.run(&[SET_ARG, &id])?;
        Ok(())
    }
}
