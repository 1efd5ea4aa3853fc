//! Timezone CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::error::BackupResult;
use crate::timezone::{TimezoneTool, Tzutil};

/// Timezone subcommands
#[derive(Subcommand)]
pub enum TimezoneCommands {
    /// Show the current system timezone
    Current,

    /// List every timezone the system knows
    List,

    /// Change the system timezone (requires administrator privileges)
    Set {
        /// Display label or identifier
        label: String,
    },
}

/// Handle a timezone command
pub fn handle_timezone_command(settings: &Settings, cmd: TimezoneCommands) -> BackupResult<()> {
    let tool = Tzutil::from_settings(settings);

    match cmd {
        TimezoneCommands::Current => {
            println!("{}", tool.current_label());
        }

        TimezoneCommands::List => {
            let labels = tool.available_labels();
            if labels.is_empty() {
                println!("No timezones available from '{}'.", tool.program());
                return Ok(());
            }
            for label in &labels {
                println!("{}", label);
            }
        }

        TimezoneCommands::Set { label } => {
            tool.set_timezone(&label)?;
            println!("Timezone set to {}", label);
        }
    }

    Ok(())
}
