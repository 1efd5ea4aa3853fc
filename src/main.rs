use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crx_backup::backup::list_profiles;
use crx_backup::cli::{handle_backup_command, handle_timezone_command};
use crx_backup::config::{paths::BackupPaths, settings::Settings};
use crx_backup::display::format_profile_list;
use crx_backup::timezone::is_elevated;

#[derive(Parser)]
#[command(
    name = "crx-backup",
    version,
    about = "Back up and restore browser extension settings",
    long_about = "crx-backup snapshots the extension data of a Chrome profile into \
                  named backups and restores them later, together with the system \
                  timezone that was active when the backup was taken."
)]
struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the browser profiles available for backup
    Profiles,

    /// Backup management commands
    #[command(subcommand)]
    Backup(crx_backup::cli::BackupCommands),

    /// System timezone commands
    #[command(subcommand, alias = "tz")]
    Timezone(crx_backup::cli::TimezoneCommands),

    /// Show current configuration and paths
    Config,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Initialize paths and settings
    let paths = BackupPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let paths = paths.apply_settings(&settings);

    match cli.command {
        Some(Commands::Profiles) => {
            println!("Profiles in {}:", paths.user_data_dir().display());
            print!("{}", format_profile_list(&list_profiles(paths.user_data_dir())));
            println!();
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&paths, &settings, cmd)?;
        }
        Some(Commands::Timezone(cmd)) => {
            handle_timezone_command(&settings, cmd)?;
        }
        Some(Commands::Config) => {
            println!("crx-backup Configuration");
            println!("========================");
            println!("Backup directory:    {}", paths.backup_root().display());
            println!("Metadata file:       {}", paths.metadata_file().display());
            println!("Browser user data:   {}", paths.user_data_dir().display());
            println!();
            println!("Settings:");
            println!("  Tracked paths:     {}", settings.tracked_paths.join(", "));
            println!("  Skipped suffixes:  {}", settings.skip_suffixes.join(", "));
            println!("  Timezone command:  {}", settings.timezone_command);
            println!("  Restore timezone:  {}", settings.restore_timezone);
            println!(
                "  Elevated:          {}",
                if is_elevated() { "Yes" } else { "No" }
            );
        }
        None => {
            println!("crx-backup - Backup and restore for browser extension settings");
            println!();
            println!("Run 'crx-backup --help' for usage information.");
        }
    }

    Ok(())
}
