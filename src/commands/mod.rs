//! Command dispatch and handlers.

pub mod check;
pub mod resolve;
pub mod show;

use std::path::Path;

use crate::cli::Command;
use crate::profile::Profile;
use crate::system::SystemModel;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    match command {
        Command::Show { profile } => show::run(profile),
        Command::Resolve { profile, task, capability, hint, json } => {
            resolve::run(profile, task, capability, hint.as_deref(), *json)
        }
        Command::Check { profile } => check::run(profile),
    }
}

/// Reads and parses a profile file, then builds the system model.
fn load_system(path: &Path) -> Result<SystemModel, String> {
    let profile = load_profile(path)?;
    profile.build().map_err(|e| format!("invalid profile {}: {e}", path.display()))
}

/// Reads and parses a profile file.
fn load_profile(path: &Path) -> Result<Profile, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read profile {}: {e}", path.display()))?;
    Profile::parse(&contents)
}
