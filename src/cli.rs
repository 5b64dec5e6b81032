//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `capslot`.
#[derive(Debug, Parser)]
#[command(name = "capslot", version, about = "Model and resolve capability slots")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the models and task slot tables declared by a profile.
    Show {
        /// Path to the profile YAML file.
        profile: PathBuf,
    },
    /// Resolve a capability query against a task model's slot table.
    Resolve {
        /// Path to the profile YAML file.
        profile: PathBuf,
        /// The task model to query.
        #[arg(long)]
        task: String,
        /// The capability model to resolve.
        #[arg(long)]
        capability: String,
        /// Optional path-or-suffix hint to disambiguate.
        #[arg(long)]
        hint: Option<String>,
        /// Emit a machine-readable JSON report.
        #[arg(long)]
        json: bool,
    },
    /// Load a profile and report declaration errors.
    Check {
        /// Path to the profile YAML file.
        profile: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_show_subcommand() {
        let cli = Cli::parse_from(["capslot", "show", "models.yaml"]);
        assert!(matches!(cli.command, Command::Show { .. }));
    }

    #[test]
    fn parses_resolve_with_hint_and_json() {
        let cli = Cli::parse_from([
            "capslot", "resolve", "models.yaml", "--task", "Stereo", "--capability", "image",
            "--hint", "left", "--json",
        ]);
        match cli.command {
            Command::Resolve { task, capability, hint, json, .. } => {
                assert_eq!(task, "Stereo");
                assert_eq!(capability, "image");
                assert_eq!(hint.as_deref(), Some("left"));
                assert!(json);
            }
            other => panic!("expected resolve, got {other:?}"),
        }
    }

    #[test]
    fn resolve_requires_task_and_capability() {
        let result = Cli::try_parse_from(["capslot", "resolve", "models.yaml"]);
        assert!(result.is_err());
    }
}
