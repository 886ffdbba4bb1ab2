//! Durak smoke tests - black-box HTTP checks for the Durak card-game backend
//!
//! This library provides the test runner, the scenario helpers and the
//! ambient pieces (config, logging, errors) used by the `durak-smoke` CLI.

pub mod cli;
pub mod commands;
pub mod common;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use testing::{HttpMethod, ResponseBody, SessionState, TestCase, TestOutcome, TestRunner};
