//! CLI command handling
//!
//! Resolves configuration, builds the runner and dispatches commands.

use colored::Colorize;
use tracing::debug;

use crate::commands::{Commands, GlobalArgs};
use crate::common::config::Config;
use crate::common::Result;
use crate::testing::{self, TestRunner};

/// Load the config file and apply command-line overrides
pub fn resolve_config(args: &GlobalArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    if let Some(base_url) = &args.base_url {
        config.target.base_url = base_url.clone();
    }

    debug!(base_url = %config.target.base_url, "resolved configuration");
    Ok(config)
}

/// Dispatch a CLI command
///
/// Returns whether the run passed.
pub async fn dispatch(command: Commands, args: GlobalArgs) -> Result<bool> {
    let config = resolve_config(&args)?;
    let mut runner = TestRunner::new(&config.target.base_url, config.timeouts, args.verbose)?;

    match command {
        Commands::Health => {
            println!("Testing server health at {}...", config.target.base_url);
            Ok(runner.check_liveness().await)
        }

        Commands::Run => {
            let report = testing::run_all(&mut runner, &config.suite).await?;
            report.print();

            if let Some(path) = &args.report {
                report.write_json(path)?;
                println!("Report written to {}", path.display().to_string().dimmed());
            }

            Ok(report.all_passed)
        }
    }
}
