//! Shared helpers for HTTP-level integration tests.
//!
//! `build_test_state` wires an [`AppState`] against the given database pool,
//! and `app` turns it into the full production router via
//! [`build_app_router`], so tests exercise the same middleware stack (CORS,
//! request ID, timeout, tracing, panic recovery) that production uses.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use imagia_core::plan::{Plan, PlanQuotas};
use imagia_core::verification::VerificationStore;
use imagia_db::models::user::{CreateUser, User};
use imagia_db::repositories::UserRepo;
use imagia_ollama::OllamaClient;

use imagia_api::auth::password::hash_password;
use imagia_api::auth::token::generate_token;
use imagia_api::config::ServerConfig;
use imagia_api::router::build_app_router;
use imagia_api::sms::SmsClient;
use imagia_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and the given Ollama URL.
///
/// SMS delivery is disabled so registration never attempts outbound HTTP.
pub fn test_config(ollama_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        ollama_url: ollama_url.to_string(),
        sms_api_url: None,
        default_model: "llama3.2-vision:latest".to_string(),
        quotas: PlanQuotas::default(),
        verification_ttl_mins: 10,
    }
}

/// Build an [`AppState`] for tests, pointing the generation client at
/// `ollama_url` (a wiremock server, or an unroutable address for tests that
/// never hit the relay).
pub fn build_test_state(pool: PgPool, ollama_url: &str) -> AppState {
    let config = test_config(ollama_url);
    AppState {
        pool,
        ollama: Arc::new(OllamaClient::new(config.ollama_url.clone())),
        sms: Arc::new(SmsClient::new(config.sms_api_url.clone())),
        verifications: Arc::new(VerificationStore::new(config.verification_ttl_mins)),
        config: Arc::new(config),
    }
}

/// Build the full application router from a state.
///
/// Tests that need to reach into shared state (e.g. to read a pending
/// verification code) keep the state and call this per request; `Router`
/// clones share the same `Arc`s.
pub fn app(state: &AppState) -> Router {
    build_app_router(state.clone(), &state.config)
}

/// Convenience for tests that never touch the Ollama relay.
pub fn build_test_app(pool: PgPool) -> Router {
    let state = build_test_state(pool, "http://127.0.0.1:1");
    app(&state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Fixture helpers
// ---------------------------------------------------------------------------

/// Insert a user directly in the database with the plan's default ceiling.
/// Returns the row and the plaintext password used.
pub async fn create_user(pool: &PgPool, nickname: &str, plan: Plan) -> (User, String) {
    use std::sync::atomic::{AtomicU32, Ordering};
    static PHONE_SEQ: AtomicU32 = AtomicU32::new(0);

    let password = "test_password_123!";
    let quotas = PlanQuotas::default();
    let input = CreateUser {
        phone: format!("600{:06}", PHONE_SEQ.fetch_add(1, Ordering::Relaxed)),
        nickname: nickname.to_string(),
        email: format!("{nickname}@test.com"),
        plan: plan.to_string(),
        remaining_quota: quotas.ceiling(plan),
        password_hash: hash_password(password).expect("hashing should succeed"),
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
    (user, password.to_string())
}

/// Insert a user and mark them verified by storing a fresh bearer token.
/// Returns the row (pre-token) and the plaintext token.
pub async fn create_verified_user(pool: &PgPool, nickname: &str, plan: Plan) -> (User, String) {
    let (user, _password) = create_user(pool, nickname, plan).await;
    let token = generate_token();
    let stored = UserRepo::set_token(pool, user.id, &token)
        .await
        .expect("token update should succeed");
    assert!(stored, "token must be stored for a fresh user");
    (user, token)
}
