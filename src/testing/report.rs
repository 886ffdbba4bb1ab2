//! Final tally of a suite run

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::common::Result;

use super::session::SessionState;

/// Counts reported at the end of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    pub base_url: String,
    pub tests_run: u32,
    pub tests_passed: u32,
    pub tests_failed: u32,
    pub all_passed: bool,
}

impl SuiteReport {
    pub fn from_session(session: &SessionState) -> Self {
        Self {
            base_url: session.base_url().to_string(),
            tests_run: session.tests_run(),
            tests_passed: session.tests_passed(),
            tests_failed: session.tests_failed(),
            all_passed: session.all_passed(),
        }
    }

    /// Print the colored tally to stdout
    pub fn print(&self) {
        println!("\n{}", "=".repeat(50));
        println!(
            "{} {}/{} tests passed",
            "Test Results:".blue().bold(),
            self.tests_passed,
            self.tests_run
        );

        if self.all_passed {
            println!("{} {}", "✓".green().bold(), "All tests passed!".green().bold());
        } else {
            println!(
                "{} {}",
                "✗".red().bold(),
                format!("{} tests failed", self.tests_failed).red().bold()
            );
        }
    }

    /// Write the report as pretty JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
