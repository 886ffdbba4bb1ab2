//! Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::paths::config_path;
use super::{Error, Result};

/// Base URL used when neither the config file nor `--base-url` sets one
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Server under test
    #[serde(default)]
    pub target: TargetConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Scenario settings
    #[serde(default)]
    pub suite: SuiteConfig,
}

/// Server under test
#[derive(Debug, Deserialize)]
pub struct TargetConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Timeout settings in seconds
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Timeouts {
    /// Timeout for every call made through the runner
    #[serde(default = "default_request")]
    pub request_secs: u64,

    /// Timeout for the initial liveness check
    #[serde(default = "default_probe")]
    pub liveness_secs: u64,

    /// Timeout for the CORS preflight probe
    #[serde(default = "default_probe")]
    pub cors_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request_secs: default_request(),
            liveness_secs: default_probe(),
            cors_secs: default_probe(),
        }
    }
}

fn default_request() -> u64 {
    10
}
fn default_probe() -> u64 {
    5
}

/// Username/password pair sent to the auth endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Scenario settings
#[derive(Debug, Clone, Deserialize)]
pub struct SuiteConfig {
    /// Static assets that must be served with 200
    #[serde(default = "default_static_assets")]
    pub static_assets: Vec<String>,

    /// Prefix for the generated registration username
    #[serde(default = "default_username_prefix")]
    pub username_prefix: String,

    /// Password used for the generated user
    #[serde(default = "default_password")]
    pub password: String,

    /// An account that already exists on the server
    #[serde(default = "default_taken")]
    pub taken: Credentials,

    /// Credentials that must be rejected
    #[serde(default = "default_invalid")]
    pub invalid: Credentials,

    /// Credentials fired repeatedly by the rate-limit probe
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Credentials,

    /// Number of requests fired by the rate-limit probe
    #[serde(default = "default_rate_limit_attempts")]
    pub rate_limit_attempts: u32,

    /// Status returned for bad or missing credentials
    #[serde(default = "default_unauthorized_status")]
    pub unauthorized_status: u16,

    /// Status returned when registering a taken username
    #[serde(default = "default_username_taken_status")]
    pub username_taken_status: u16,

    /// Also require the profile endpoint to refuse a request without a token
    #[serde(default)]
    pub check_unauthenticated: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            static_assets: default_static_assets(),
            username_prefix: default_username_prefix(),
            password: default_password(),
            taken: default_taken(),
            invalid: default_invalid(),
            rate_limit: default_rate_limit(),
            rate_limit_attempts: default_rate_limit_attempts(),
            unauthorized_status: default_unauthorized_status(),
            username_taken_status: default_username_taken_status(),
            check_unauthenticated: false,
        }
    }
}

fn default_static_assets() -> Vec<String> {
    ["style.css", "game.js", "login.html", "reg.html"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_username_prefix() -> String {
    "testuser".to_string()
}
fn default_password() -> String {
    "TestPass123!".to_string()
}
fn default_taken() -> Credentials {
    Credentials::new("admin", "password123")
}
fn default_invalid() -> Credentials {
    Credentials::new("nonexistent", "wrongpass")
}
fn default_rate_limit() -> Credentials {
    Credentials::new("test", "test")
}
fn default_rate_limit_attempts() -> u32 {
    5
}
fn default_unauthorized_status() -> u16 {
    401
}
fn default_username_taken_status() -> u16 {
    400
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from an explicit path, which must exist
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.target.base_url.trim().is_empty() {
            return Err(Error::Config("target.base_url must not be empty".to_string()));
        }
        if self.timeouts.request_secs == 0
            || self.timeouts.liveness_secs == 0
            || self.timeouts.cors_secs == 0
        {
            return Err(Error::Config("timeouts must be at least 1 second".to_string()));
        }
        Ok(())
    }
}
