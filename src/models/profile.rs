//! Browser profile naming
//!
//! Chrome keeps one directory per profile under its user-data root: the first is
//! `Default`, later ones are `Profile 1`, `Profile 2`, ...

/// Name of the browser's first profile directory
pub const DEFAULT_PROFILE: &str = "Default";

/// Prefix shared by numbered profile directories
pub const NUMBERED_PROFILE_PREFIX: &str = "Profile";

/// Check whether a user-data entry name denotes a profile
pub fn is_profile_name(name: &str) -> bool {
    name == DEFAULT_PROFILE || name.starts_with(NUMBERED_PROFILE_PREFIX)
}
