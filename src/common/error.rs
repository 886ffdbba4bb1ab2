//! Error types for the smoke-test harness
//!
//! Unexpected status codes and transport failures are not errors here: the
//! runner records them as failed tests. These variants cover the conditions
//! that stop the harness itself.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Request Errors ===
    #[error("Unsupported HTTP method '{0}'. Supported methods: GET, POST, PUT, DELETE")]
    UnsupportedMethod(String),

    #[error("Server at {0} is not responding, aborting tests")]
    ServerUnreachable(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an unsupported method error
    pub fn unsupported_method(method: &str) -> Self {
        Self::UnsupportedMethod(method.to_string())
    }
}
