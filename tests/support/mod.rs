#![allow(dead_code)]

//! In-process mock of the Durak backend for integration tests.
//!
//! An axum router serving the endpoints the smoke suite touches. A
//! middleware layer records every request before it reaches a handler.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::{Body, Bytes};
use axum::extract::{Path, Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION, CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const ECHO_ENDPOINT: &str = "api/echo";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lowercased
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }
}

/// Behaviour of the mocked backend
pub struct DurakBackend {
    users: HashMap<String, String>,
    tokens: HashMap<String, String>,
    next_token: u32,
    assets: HashSet<String>,
    root_status: StatusCode,
    missing_token_status: StatusCode,
    cors: bool,
    registration_open: bool,
}

impl Default for DurakBackend {
    fn default() -> Self {
        let mut users = HashMap::new();
        users.insert("admin".to_string(), "password123".to_string());
        Self {
            users,
            tokens: HashMap::new(),
            next_token: 1,
            assets: ["style.css", "game.js", "login.html", "reg.html"]
                .into_iter()
                .map(String::from)
                .collect(),
            root_status: StatusCode::OK,
            missing_token_status: StatusCode::UNAUTHORIZED,
            cors: true,
            registration_open: true,
        }
    }
}

impl DurakBackend {
    pub fn without_cors(mut self) -> Self {
        self.cors = false;
        self
    }

    pub fn missing_asset(mut self, asset: &str) -> Self {
        self.assets.remove(asset);
        self
    }

    pub fn root_status(mut self, status: u16) -> Self {
        self.root_status = StatusCode::from_u16(status).unwrap();
        self
    }

    /// Status for protected requests that carry no bearer token
    pub fn missing_token_status(mut self, status: u16) -> Self {
        self.missing_token_status = StatusCode::from_u16(status).unwrap();
        self
    }

    pub fn registration_closed(mut self) -> Self {
        self.registration_open = false;
        self
    }

    fn issue_token(&mut self, username: &str) -> String {
        let token = format!("tok-{}", self.next_token);
        self.next_token += 1;
        self.tokens.insert(token.clone(), username.to_string());
        token
    }

    fn authenticated_user(&self, headers: &HeaderMap) -> Result<String, Response> {
        let token = headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or_else(|| error_reply(self.missing_token_status, "UNAUTHORIZED"))?;
        self.tokens
            .get(token)
            .cloned()
            .ok_or_else(|| error_reply(StatusCode::UNAUTHORIZED, "INVALID_TOKEN"))
    }
}

struct AppState {
    backend: Mutex<DurakBackend>,
    requests: Mutex<Vec<RecordedRequest>>,
}

type Shared = Arc<AppState>;

#[derive(Deserialize)]
struct CredentialsBody {
    username: String,
    password: String,
}

fn error_reply(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "error": error }))).into_response()
}

async fn record_request(State(state): State<Shared>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let Ok(bytes) = axum::body::to_bytes(body, usize::MAX).await else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        headers: parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                Some((name.as_str().to_string(), value.to_str().ok()?.to_string()))
            })
            .collect(),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    };
    state.requests.lock().unwrap().push(recorded);

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

async fn root(State(state): State<Shared>) -> Response {
    let status = state.backend.lock().unwrap().root_status;
    (status, Html("<html>Durak</html>")).into_response()
}

async fn static_asset(State(state): State<Shared>, Path(asset): Path<String>) -> Response {
    let served = state.backend.lock().unwrap().assets.contains(&asset);
    if served {
        (
            [(CONTENT_TYPE, "text/plain")],
            "/* static asset */ body { margin: 0 }",
        )
            .into_response()
    } else {
        error_reply(StatusCode::NOT_FOUND, "NOT_FOUND")
    }
}

async fn register(State(state): State<Shared>, Json(body): Json<CredentialsBody>) -> Response {
    let mut backend = state.backend.lock().unwrap();
    if backend.users.contains_key(&body.username) {
        return error_reply(StatusCode::BAD_REQUEST, "USERNAME_TAKEN");
    }
    if !backend.registration_open {
        return error_reply(StatusCode::SERVICE_UNAVAILABLE, "REGISTRATION_CLOSED");
    }
    backend.users.insert(body.username.clone(), body.password);
    let token = backend.issue_token(&body.username);
    Json(json!({ "token": token, "user": { "username": body.username } })).into_response()
}

async fn login(State(state): State<Shared>, Json(body): Json<CredentialsBody>) -> Response {
    let mut backend = state.backend.lock().unwrap();
    if backend.users.get(&body.username) != Some(&body.password) {
        return error_reply(StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS");
    }
    let token = backend.issue_token(&body.username);
    Json(json!({ "token": token })).into_response()
}

async fn preflight(State(state): State<Shared>) -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    if state.backend.lock().unwrap().cors {
        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET,POST,OPTIONS"),
        );
    }
    response
}

async fn profile(State(state): State<Shared>, headers: HeaderMap) -> Response {
    match state.backend.lock().unwrap().authenticated_user(&headers) {
        Ok(username) => Json(json!({ "user": { "username": username } })).into_response(),
        Err(reply) => reply,
    }
}

async fn stats(State(state): State<Shared>, headers: HeaderMap) -> Response {
    match state.backend.lock().unwrap().authenticated_user(&headers) {
        Ok(_) => Json(json!({ "stats": { "games": 0, "wins": 0 } })).into_response(),
        Err(reply) => reply,
    }
}

async fn echo(method: Method, body: Bytes) -> Json<Value> {
    Json(json!({
        "method": method.as_str(),
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn not_found() -> Response {
    error_reply(StatusCode::NOT_FOUND, "NOT_FOUND")
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/:asset", get(static_asset))
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login).options(preflight))
        .route("/api/me", get(profile))
        .route("/api/stats/me", get(stats))
        .route("/api/echo", put(echo).delete(echo))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(Arc::clone(&state), record_request))
        .with_state(state)
}

/// Running mock server
pub struct MockServer {
    pub addr: SocketAddr,
    state: Shared,
}

impl MockServer {
    pub async fn start(backend: DurakBackend) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState {
            backend: Mutex::new(backend),
            requests: Mutex::new(Vec::new()),
        });

        let app = router(Arc::clone(&state));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.trim_start_matches('/') == path)
            .collect()
    }
}

/// An address nothing is listening on
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// An address that accepts connections and never answers
pub async fn silent_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    addr
}
