//! CLI command definitions
//!
//! Defines the clap commands for the smoke-test CLI.

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the full smoke-test suite (default)
    Run,

    /// Only check that the server answers GET / with 200
    Health,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Base URL of the server under test (overrides the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Path to a config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print response previews and debug logs
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Write the final tally as JSON to this path
    #[arg(long, global = true)]
    pub report: Option<PathBuf>,
}
