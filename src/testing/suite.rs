//! Scenario helpers and the full smoke-test script
//!
//! Each helper is a fixed sequence of runner calls. The only branching is
//! on fields present in the returned bodies.

use chrono::Local;
use colored::Colorize;
use serde_json::json;

use crate::common::config::{Credentials, SuiteConfig};
use crate::common::{Error, Result};

use super::case::TestCase;
use super::report::SuiteReport;
use super::runner::{CorsProbe, TestRunner};

pub const REGISTER_ENDPOINT: &str = "api/auth/register";
pub const LOGIN_ENDPOINT: &str = "api/auth/login";
pub const PROFILE_ENDPOINT: &str = "api/me";
pub const STATS_ENDPOINT: &str = "api/stats/me";

fn credentials_payload(credentials: &Credentials) -> serde_json::Value {
    json!({
        "username": credentials.username,
        "password": credentials.password,
    })
}

/// Username for a fresh registration, suffixed with the local time
pub fn generated_username(prefix: &str) -> String {
    format!("{}_{}", prefix, Local::now().format("%H%M%S"))
}

fn section(title: &str) {
    println!("\n{}", title.cyan().bold());
}

/// GET every configured static asset, expecting 200
///
/// Returns how many were served.
pub async fn static_assets(runner: &mut TestRunner, config: &SuiteConfig) -> usize {
    let mut served = 0;
    for asset in &config.static_assets {
        let outcome = runner
            .execute(TestCase::get(format!("Static file: {asset}"), asset.as_str(), 200))
            .await;
        if outcome.success {
            served += 1;
        } else {
            println!("  {} Static file {} not accessible", "✗".red(), asset);
        }
    }
    served
}

/// Register a fresh user and capture its token
///
/// Returns the generated credentials when the server issued a token.
pub async fn register(runner: &mut TestRunner, config: &SuiteConfig) -> Option<Credentials> {
    let credentials = Credentials::new(
        generated_username(&config.username_prefix),
        config.password.clone(),
    );

    let outcome = runner
        .execute(
            TestCase::post("User Registration", REGISTER_ENDPOINT, 200)
                .json(credentials_payload(&credentials)),
        )
        .await;

    match outcome.body.token() {
        Some(token) if outcome.success => {
            runner.set_token(token);
            println!("  {} Registration successful, token received", "✓".green());
            Some(credentials)
        }
        _ => {
            println!("  {} Registration failed or no token received", "✗".red());
            None
        }
    }
}

/// Log in and overwrite the held token
pub async fn login(runner: &mut TestRunner, credentials: &Credentials) -> bool {
    let outcome = runner
        .execute(
            TestCase::post("User Login", LOGIN_ENDPOINT, 200)
                .json(credentials_payload(credentials)),
        )
        .await;

    match outcome.body.token() {
        Some(token) if outcome.success => {
            runner.set_token(token);
            println!("  {} Login successful, token updated", "✓".green());
            true
        }
        _ => {
            println!("  {} Login failed or no token received", "✗".red());
            false
        }
    }
}

/// Fetch the profile and stats of the logged-in user
///
/// Sends nothing and returns false when no token is held.
pub async fn protected_routes(runner: &mut TestRunner) -> bool {
    if runner.token().is_none() {
        println!(
            "  {} No token available for protected route testing",
            "✗".red()
        );
        return false;
    }

    let outcome = runner
        .execute(TestCase::get("Get User Profile", PROFILE_ENDPOINT, 200))
        .await;
    if outcome.success && outcome.body.has_key("user") {
        println!("  {} User profile retrieved successfully", "✓".green());
    }

    let outcome = runner
        .execute(TestCase::get("Get User Stats", STATS_ENDPOINT, 200))
        .await;
    if outcome.success && outcome.body.has_key("stats") {
        println!("  {} User stats retrieved successfully", "✓".green());
    }

    true
}

/// Wrong credentials and a taken username must both be rejected
pub async fn invalid_auth(runner: &mut TestRunner, config: &SuiteConfig) {
    let outcome = runner
        .execute(
            TestCase::post("Invalid Login", LOGIN_ENDPOINT, config.unauthorized_status)
                .json(credentials_payload(&config.invalid)),
        )
        .await;
    if outcome.success {
        println!("  {} Invalid login correctly rejected", "✓".green());
    }

    let outcome = runner
        .execute(
            TestCase::post(
                "Duplicate Registration",
                REGISTER_ENDPOINT,
                config.username_taken_status,
            )
            .json(credentials_payload(&config.taken)),
        )
        .await;
    if outcome.success {
        println!("  {} Duplicate registration correctly rejected", "✓".green());
    }
}

/// The profile endpoint must refuse a request without a bearer token
///
/// Any held token is left untouched.
pub async fn unauthenticated_access(runner: &mut TestRunner, config: &SuiteConfig) {
    let outcome = runner
        .execute(
            TestCase::get(
                "Unauthenticated Profile",
                PROFILE_ENDPOINT,
                config.unauthorized_status,
            )
            .anonymous(),
        )
        .await;
    if outcome.success {
        println!("  {} Missing token correctly rejected", "✓".green());
    }
}

/// Fire repeated logins with invalid credentials
///
/// Each attempt expects the unauthorized status. No 429 is asserted, so
/// this does not verify that rate limiting exists.
pub async fn rate_limit_probe(runner: &mut TestRunner, config: &SuiteConfig) {
    println!(
        "  Making {} rapid requests to {}...",
        config.rate_limit_attempts, LOGIN_ENDPOINT
    );
    for attempt in 1..=config.rate_limit_attempts {
        runner
            .execute(
                TestCase::post(
                    format!("Rate Limit Test {attempt}"),
                    LOGIN_ENDPOINT,
                    config.unauthorized_status,
                )
                .json(credentials_payload(&config.rate_limit)),
            )
            .await;
    }
    println!("  {} Rate limiting test completed", "✓".green());
}

/// Look for CORS headers on the login endpoint; never fails
pub async fn cors_probe(runner: &TestRunner) -> bool {
    let probe = runner.probe_cors(LOGIN_ENDPOINT).await;
    if probe.found_any() {
        println!("  {} CORS headers found", "✓".green());
    } else if let CorsProbe::Failed(reason) = &probe {
        println!("  {} CORS probe failed: {}", "✗".yellow(), reason);
    } else {
        println!(
            "  {} CORS headers not found (might be handled by middleware)",
            "ℹ".blue()
        );
    }
    true
}

/// Run the whole suite in order
///
/// Aborts with [`Error::ServerUnreachable`] if the liveness check fails;
/// every later failure is only counted.
pub async fn run_all(runner: &mut TestRunner, config: &SuiteConfig) -> Result<SuiteReport> {
    println!("{}", "Starting Durak API Testing Suite".blue().bold());
    println!("{}", "=".repeat(50));

    println!("Testing server health...");
    if !runner.check_liveness().await {
        return Err(Error::ServerUnreachable(
            runner.session().base_url().to_string(),
        ));
    }

    section("Static Files");
    static_assets(runner, config).await;

    section("Authentication");
    if let Some(credentials) = register(runner, config).await {
        login(runner, &credentials).await;

        section("Protected Routes");
        protected_routes(runner).await;
    }

    section("Invalid Authentication");
    invalid_auth(runner, config).await;
    if config.check_unauthenticated {
        unauthenticated_access(runner, config).await;
    }

    section("Rate Limiting");
    rate_limit_probe(runner, config).await;

    section("CORS");
    cors_probe(runner).await;

    Ok(SuiteReport::from_session(runner.session()))
}
