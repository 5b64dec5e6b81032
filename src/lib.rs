//! Core library entry for the `capslot` CLI.
//!
//! Task models declare named, nestable capability slots (data sources),
//! compose them through inheritance and device-driver specialization, and
//! the resolution and merge engines map capability queries to concrete
//! slots and unify redundant task instances during plan construction.

pub mod cli;
pub mod commands;
pub mod error;
pub mod instance;
pub mod merge;
pub mod model;
pub mod profile;
pub mod resolve;
pub mod slots;
pub mod system;

pub use error::{Error, ErrorKind, Result};

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command
/// execution fails.
pub fn run<I, T>(args: I) -> std::result::Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}
