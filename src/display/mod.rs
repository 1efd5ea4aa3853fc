//! Display formatting for terminal output
//!
//! Provides utilities for formatting backups and restore outcomes for terminal
//! display.

pub mod backup;

pub use backup::{
    format_backup_details, format_backup_list, format_backup_summary, format_profile_list,
    format_restore_result,
};
