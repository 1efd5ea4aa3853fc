//! Backup display formatting
//!
//! Formats backups, profiles and restore outcomes for terminal output.

use chrono::{Local, NaiveDateTime};

use crate::backup::{BackupSummary, RestoreResult, SkipReason, TimezoneOutcome};
use crate::models::BackupRecord;
use crate::storage::BackupMap;

/// Format backups as a table, ordered by name
pub fn format_backup_list(backups: &BackupMap) -> String {
    if backups.is_empty() {
        return "No backups found.".to_string();
    }

    let name_width = backups.keys().map(|n| n.chars().count()).max().unwrap_or(4).max(4);
    let profile_width = backups
        .values()
        .map(|r| r.profile.chars().count())
        .max()
        .unwrap_or(7)
        .max(7);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<profile_width$}  {:<19}  {}\n",
        "Name",
        "Profile",
        "Created",
        "Timezone",
        name_width = name_width,
        profile_width = profile_width,
    ));

    output.push_str(&format!(
        "{:-<name_width$}  {:-<profile_width$}  {:-<19}  {:-<8}\n",
        "",
        "",
        "",
        "",
        name_width = name_width,
        profile_width = profile_width,
    ));

    for (name, record) in backups {
        output.push_str(&format!(
            "{:<name_width$}  {:<profile_width$}  {:<19}  {}\n",
            name,
            record.profile,
            record.timestamp,
            record.timezone,
            name_width = name_width,
            profile_width = profile_width,
        ));
    }

    output.push_str(&format!("\nTotal: {} backup(s)\n", backups.len()));
    output
}

/// Format a single backup's details
pub fn format_backup_details(name: &str, record: &BackupRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Backup: {}\n", name));
    output.push_str(&format!("  Profile:   {}\n", record.profile));
    match record.created_at() {
        Some(created) => output.push_str(&format!(
            "  Created:   {} ({} ago)\n",
            record.timestamp,
            format_age(created, Local::now().naive_local())
        )),
        None => output.push_str(&format!("  Created:   {}\n", record.timestamp)),
    }
    output.push_str(&format!(
        "  Timezone:  {}\n",
        record.captured_timezone().unwrap_or("(not captured)")
    ));
    output.push_str(&format!("  Location:  {}\n", record.backup_path.display()));
    output.push_str(&format!(
        "  Status:    {}\n",
        if record.backup_path.is_dir() {
            "OK"
        } else {
            "Missing files"
        }
    ));

    output
}

/// Format the time between two instants in human-readable form
fn format_age(created: NaiveDateTime, now: NaiveDateTime) -> String {
    let total_seconds = now.signed_duration_since(created).num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format the outcome of a backup
pub fn format_backup_summary(summary: &BackupSummary) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Backup '{}' created from profile '{}'\n",
        summary.name, summary.record.profile
    ));
    output.push_str(&format!("  Files copied: {}\n", summary.files_copied));
    output.push_str(&format!("  Timezone:     {}\n", summary.record.timezone));
    output.push_str(&format!(
        "  Location:     {}\n",
        summary.record.backup_path.display()
    ));

    if !summary.skipped.is_empty() {
        output.push_str(&format!("  Skipped {} file(s):\n", summary.skipped.len()));
        for skipped in &summary.skipped {
            let reason = match &skipped.reason {
                SkipReason::LockFile => "lock file".to_string(),
                SkipReason::PermissionDenied(msg) => msg.clone(),
            };
            output.push_str(&format!("    {} ({})\n", skipped.path.display(), reason));
        }
    }

    output
}

/// Format the outcome of a restore
pub fn format_restore_result(result: &RestoreResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Backup '{}' restored into profile '{}'\n",
        result.backup_name, result.profile
    ));
    output.push_str(&format!("{}\n", result.summary()));
    output.push_str(&format!("Files written: {}\n", result.files_restored));

    match &result.timezone {
        TimezoneOutcome::NotCaptured => {
            output.push_str("Timezone: not captured with this backup\n");
        }
        TimezoneOutcome::Skipped(label) => {
            output.push_str(&format!("Timezone: left unchanged (backup has {})\n", label));
        }
        TimezoneOutcome::Applied(label) => {
            output.push_str(&format!("Timezone: set to {}\n", label));
        }
        TimezoneOutcome::Failed { label, error } => {
            output.push_str(&format!(
                "Warning: files were restored but the timezone could not be set to {}: {}\n",
                label, error
            ));
        }
    }

    output
}

/// Format profile names as a list
pub fn format_profile_list(profiles: &[String]) -> String {
    if profiles.is_empty() {
        return "No profiles found.".to_string();
    }

    let mut output = String::new();
    for profile in profiles {
        output.push_str(&format!("  {}\n", profile));
    }
    output
}
