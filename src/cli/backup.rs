//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;

use crate::backup::{BackupManager, RestoreManager};
use crate::config::paths::BackupPaths;
use crate::config::settings::Settings;
use crate::display::{
    format_backup_details, format_backup_list, format_backup_summary, format_restore_result,
};
use crate::error::BackupResult;
use crate::timezone::Tzutil;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Back up a profile's extension data
    Create {
        /// Profile directory name (e.g. "Default", "Profile 1")
        profile: String,
        /// Name for the new backup
        name: String,
    },

    /// List all backups
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore a backup over its source profile
    Restore {
        /// Backup name
        name: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,

        /// Leave the system timezone unchanged
        #[arg(long)]
        no_timezone: bool,
    },

    /// Delete a backup and its files
    Delete {
        /// Backup name
        name: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &BackupPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> BackupResult<()> {
    let manager = BackupManager::new(
        paths.clone(),
        settings.clone(),
        Box::new(Tzutil::from_settings(settings)),
    )?;

    match cmd {
        BackupCommands::Create { profile, name } => {
            println!("Backing up profile '{}'...", profile);
            let summary = manager.create_backup(&profile, &name)?;
            print!("{}", format_backup_summary(&summary));
        }

        BackupCommands::List { verbose } => {
            let backups = manager.list_backups_with_details();

            if backups.is_empty() {
                println!("No backups found in {}.", manager.backup_root().display());
                println!("Create one with: crx-backup backup create <PROFILE> <NAME>");
                return Ok(());
            }

            if verbose {
                for (name, record) in &backups {
                    println!("{}", format_backup_details(name, record));
                }
                println!("Total: {} backup(s)", backups.len());
            } else {
                print!("{}", format_backup_list(&backups));
            }
        }

        BackupCommands::Restore {
            name,
            force,
            no_timezone,
        } => {
            let mut settings = settings.clone();
            if no_timezone {
                settings.restore_timezone = false;
            }

            let restore_manager = RestoreManager::new(
                paths.clone(),
                settings.clone(),
                Box::new(Tzutil::from_settings(&settings)),
            );
            let validation = restore_manager.validate_backup(&name)?;

            print!("{}", format_backup_details(&name, &validation.record));
            println!("Will replace: {}", validation.entries.join(", "));
            println!("Status: {}", validation.summary());
            println!();

            if !validation.is_restorable() {
                println!("This backup cannot be restored as it stands.");
                if !force {
                    return Ok(());
                }
            }

            if !force {
                println!(
                    "WARNING: This will overwrite the extension data of profile '{}'!",
                    validation.record.profile
                );
                println!("To proceed, run again with --force flag:");
                println!("  crx-backup backup restore {} --force", name);
                return Ok(());
            }

            println!("Restoring from backup...");
            let result = restore_manager.restore_backup(&name)?;

            println!("Restore complete!");
            print!("{}", format_restore_result(&result));
        }

        BackupCommands::Delete { name, force } => {
            let record = manager.get_backup(&name)?;

            if !force {
                print!("{}", format_backup_details(&name, &record));
                println!();
                println!("To delete this backup, run again with --force flag:");
                println!("  crx-backup backup delete {} --force", name);
                return Ok(());
            }

            manager.delete_backup(&name)?;
            println!("Deleted backup '{}'.", name);
        }
    }

    Ok(())
}
