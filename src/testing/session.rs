//! Session state threaded through every test call

/// Base URL, held token and running counters for one suite run
#[derive(Debug, Clone)]
pub struct SessionState {
    base_url: String,
    auth_token: Option<String>,
    tests_run: u32,
    tests_passed: u32,
}

impl SessionState {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            auth_token: None,
            tests_run: 0,
            tests_passed: 0,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.auth_token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.auth_token = None;
    }

    pub fn tests_run(&self) -> u32 {
        self.tests_run
    }

    pub fn tests_passed(&self) -> u32 {
        self.tests_passed
    }

    pub fn tests_failed(&self) -> u32 {
        self.tests_run - self.tests_passed
    }

    /// Count one executed test. The only way the counters move.
    pub fn record(&mut self, passed: bool) {
        self.tests_run += 1;
        if passed {
            self.tests_passed += 1;
        }
    }

    /// True when every executed test passed (vacuously true for no tests)
    pub fn all_passed(&self) -> bool {
        self.tests_passed == self.tests_run
    }

    /// Join the base URL and an endpoint with exactly one slash
    pub fn url_for(&self, endpoint: &str) -> String {
        join_url(&self.base_url, endpoint)
    }
}

pub(crate) fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}
