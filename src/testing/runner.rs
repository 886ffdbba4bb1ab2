//! Test runner implementation
//!
//! Executes one HTTP call per test case against the server under test and
//! records the outcome in the session. Unexpected status codes and
//! transport failures become failed tests; nothing here aborts a run.

use std::time::Duration;

use colored::Colorize;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use tracing::{debug, warn};

use crate::common::config::Timeouts;
use crate::common::{Error, Result};

use super::case::{AuthMode, HttpMethod, ResponseBody, TestCase, TestOutcome};
use super::session::SessionState;

/// Headers whose presence indicates CORS handling
pub const CORS_HEADERS: [&str; 3] = [
    "Access-Control-Allow-Origin",
    "Access-Control-Allow-Methods",
    "Access-Control-Allow-Headers",
];

/// Characters of a response body shown in progress output
const PREVIEW_CHARS: usize = 200;

/// Result of an OPTIONS preflight probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsProbe {
    /// The server answered; lists which CORS headers were present
    Answered { found: Vec<&'static str> },
    /// The request itself failed
    Failed(String),
}

impl CorsProbe {
    pub fn found_any(&self) -> bool {
        matches!(self, CorsProbe::Answered { found } if !found.is_empty())
    }
}

/// Executes test cases against one base URL
pub struct TestRunner {
    client: Client,
    session: SessionState,
    timeouts: Timeouts,
    verbose: bool,
}

impl TestRunner {
    /// Create a runner with a fresh session
    ///
    /// The HTTP client, and its connection pool, live as long as the runner.
    pub fn new(base_url: impl Into<String>, timeouts: Timeouts, verbose: bool) -> Result<Self> {
        let client = Client::builder().build().map_err(Error::HttpClient)?;
        Ok(Self {
            client,
            session: SessionState::new(base_url),
            timeouts,
            verbose,
        })
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.session.set_token(token);
    }

    pub fn clear_token(&mut self) {
        self.session.clear_token();
    }

    /// Execute a case given its method as a string
    ///
    /// Unknown methods are rejected before anything is sent or counted.
    pub async fn execute_named(
        &mut self,
        name: &str,
        method: &str,
        endpoint: &str,
        expected_status: u16,
    ) -> Result<TestOutcome> {
        let method: HttpMethod = method.parse()?;
        Ok(self
            .execute(TestCase::new(name, method, endpoint, expected_status))
            .await)
    }

    /// Execute a single test case and record its outcome
    pub async fn execute(&mut self, case: TestCase) -> TestOutcome {
        let url = self.session.url_for(&case.endpoint);

        println!("\n{} {}...", "Testing".blue().bold(), case.name.white().bold());
        println!("   URL: {} {}", case.method, url.dimmed());

        let outcome = self.dispatch(&case, &url).await;
        self.session.record(outcome.success);
        outcome
    }

    async fn dispatch(&self, case: &TestCase, url: &str) -> TestOutcome {
        let headers = match self.build_headers(case) {
            Ok(headers) => headers,
            Err(reason) => {
                println!("  {} Failed - {}", "✗".red(), reason);
                return TestOutcome::failed(None);
            }
        };

        let mut request = self
            .client
            .request(Method::from(case.method), url)
            .headers(headers)
            .timeout(Duration::from_secs(self.timeouts.request_secs));

        if case.method.sends_body() {
            if let Some(payload) = &case.payload {
                request = request.json(payload);
            }
        }

        debug!(method = %case.method, url, "dispatching request");

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, error = %e, "request failed");
                println!("  {} Failed - Network Error: {}", "✗".red(), e);
                return TestOutcome::failed(None);
            }
        };

        let status = response.status().as_u16();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                warn!(url, error = %e, "failed to read response body");
                println!("  {} Failed - Error reading body: {}", "✗".red(), e);
                return TestOutcome::failed(Some(status));
            }
        };

        if status != case.expected_status {
            println!(
                "  {} Failed - Expected {}, got {}",
                "✗".red(),
                case.expected_status,
                status
            );
            println!("   Response: {}", preview(&text).dimmed());
            return TestOutcome::failed(Some(status));
        }

        println!("  {} Passed - Status: {}", "✓".green(), status);
        let body = ResponseBody::from_text(&text);
        match &body {
            ResponseBody::Malformed { error } => {
                debug!(url, error = %error, "response body is not JSON");
            }
            ResponseBody::Empty => debug!(url, "response body is empty"),
            ResponseBody::Json(_) => {}
        }
        if self.verbose {
            println!("   Response: {}", preview(&text).dimmed());
        }

        TestOutcome {
            success: true,
            status: Some(status),
            body,
        }
    }

    /// JSON content type, then caller overrides, then the bearer token
    fn build_headers(&self, case: &TestCase) -> std::result::Result<HeaderMap, String> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (name, value) in &case.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| format!("Invalid header name '{}': {}", name, e))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| format!("Invalid value for header '{}': {}", name, e))?;
            headers.insert(name, value);
        }

        if case.auth == AuthMode::Session {
            if let Some(token) = self.session.token() {
                let value = HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| format!("Invalid bearer token: {}", e))?;
                headers.insert(AUTHORIZATION, value);
            }
        }

        Ok(headers)
    }

    /// Bare GET of the base URL; true only on HTTP 200
    ///
    /// Not counted as a test.
    pub async fn check_liveness(&self) -> bool {
        let url = self.session.base_url();
        let result = self
            .client
            .get(url)
            .timeout(Duration::from_secs(self.timeouts.liveness_secs))
            .send()
            .await;

        match result {
            Ok(response) if response.status() == StatusCode::OK => {
                println!("  {} Server is running and responding", "✓".green());
                true
            }
            Ok(response) => {
                println!(
                    "  {} Server responded with status {}",
                    "✗".red(),
                    response.status().as_u16()
                );
                false
            }
            Err(e) => {
                warn!(url, error = %e, "liveness check failed");
                println!("  {} Server health check failed: {}", "✗".red(), e);
                false
            }
        }
    }

    /// OPTIONS request reporting which CORS headers came back
    ///
    /// Not counted as a test.
    pub async fn probe_cors(&self, endpoint: &str) -> CorsProbe {
        let url = self.session.url_for(endpoint);
        let result = self
            .client
            .request(Method::OPTIONS, &url)
            .timeout(Duration::from_secs(self.timeouts.cors_secs))
            .send()
            .await;

        match result {
            Ok(response) => {
                let headers = response.headers();
                let found = CORS_HEADERS
                    .into_iter()
                    .filter(|name| headers.contains_key(*name))
                    .collect();
                CorsProbe::Answered { found }
            }
            Err(e) => {
                warn!(url = %url, error = %e, "CORS probe failed");
                CorsProbe::Failed(e.to_string())
            }
        }
    }
}

fn preview(text: &str) -> String {
    let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}
