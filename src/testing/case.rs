//! Test case and outcome types
//!
//! A [`TestCase`] describes one HTTP call and the status it must return.
//! It is built per call and consumed by the runner.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::common::Error;

/// HTTP verbs the runner can dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether the payload, if any, is sent as the request body
    pub fn sends_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(Error::unsupported_method(s)),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Which credentials a case presents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// Send the session's bearer token when one is held
    #[default]
    Session,
    /// Never send a bearer token
    Anonymous,
}

/// A single HTTP call with its expected status
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub method: HttpMethod,
    pub endpoint: String,
    pub expected_status: u16,
    pub payload: Option<Value>,
    /// Extra headers, applied after the JSON content type and before auth
    pub headers: Vec<(String, String)>,
    pub auth: AuthMode,
}

impl TestCase {
    pub fn new(
        name: impl Into<String>,
        method: HttpMethod,
        endpoint: impl Into<String>,
        expected_status: u16,
    ) -> Self {
        Self {
            name: name.into(),
            method,
            endpoint: endpoint.into(),
            expected_status,
            payload: None,
            headers: Vec::new(),
            auth: AuthMode::Session,
        }
    }

    pub fn get(name: impl Into<String>, endpoint: impl Into<String>, expected_status: u16) -> Self {
        Self::new(name, HttpMethod::Get, endpoint, expected_status)
    }

    pub fn post(name: impl Into<String>, endpoint: impl Into<String>, expected_status: u16) -> Self {
        Self::new(name, HttpMethod::Post, endpoint, expected_status)
    }

    /// Attach a JSON payload
    pub fn json(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Add a header override
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Send without the session token
    pub fn anonymous(mut self) -> Self {
        self.auth = AuthMode::Anonymous;
        self
    }
}

/// Parsed response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// Body parsed as JSON
    Json(Value),
    /// No body, or the body was not inspected
    Empty,
    /// Non-empty body that is not JSON
    Malformed { error: String },
}

impl ResponseBody {
    /// Classify raw response text
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            return ResponseBody::Empty;
        }
        match serde_json::from_str(text) {
            Ok(value) => ResponseBody::Json(value),
            Err(e) => ResponseBody::Malformed {
                error: e.to_string(),
            },
        }
    }

    /// Top-level field of a JSON object body
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            ResponseBody::Json(Value::Object(map)) => map.get(key),
            _ => None,
        }
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The `token` field, when it is a non-empty string
    pub fn token(&self) -> Option<&str> {
        self.get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
    }
}

/// Result of executing a [`TestCase`]
#[derive(Debug, Clone)]
pub struct TestOutcome {
    pub success: bool,
    /// Observed status, `None` on transport failure
    pub status: Option<u16>,
    pub body: ResponseBody,
}

impl TestOutcome {
    pub(crate) fn failed(status: Option<u16>) -> Self {
        Self {
            success: false,
            status,
            body: ResponseBody::Empty,
        }
    }
}
