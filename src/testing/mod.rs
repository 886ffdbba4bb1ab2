//! HTTP smoke-test runner
//!
//! A [`TestRunner`] executes one request per [`TestCase`] against the
//! server under test and keeps the pass/fail tally in its [`SessionState`].
//! The [`suite`] module strings the Durak backend checks together.

mod case;
mod report;
mod runner;
mod session;
pub mod suite;

pub use case::{AuthMode, HttpMethod, ResponseBody, TestCase, TestOutcome};
pub use report::SuiteReport;
pub use runner::{CorsProbe, TestRunner, CORS_HEADERS};
pub use session::SessionState;
pub use suite::run_all;
