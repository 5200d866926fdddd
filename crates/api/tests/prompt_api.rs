//! HTTP-level integration tests for the model listing and prompt relay,
//! with the generation server stubbed by wiremock.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_verified_user, get, post_json_auth};
use imagia_core::plan::Plan;
use sqlx::PgPool;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ---------------------------------------------------------------------------
// Model listing
// ---------------------------------------------------------------------------

/// GET /api/models relays the generation server's tag list.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_models_relays_upstream_tags(pool: PgPool) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [
                {
                    "name": "llama3.2-vision:latest",
                    "modified_at": "2025-01-15T10:00:00Z",
                    "size": 7_900_000_000_i64,
                    "digest": "abc123",
                },
                {
                    "name": "mistral:7b",
                    "modified_at": "2025-02-01T08:30:00Z",
                    "size": 4_100_000_000_i64,
                    "digest": "def456",
                },
            ]
        })))
        .mount(&server)
        .await;

    let state = common::build_test_state(pool, &server.uri());
    let response = get(common::app(&state), "/api/models").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "OK");
    assert_eq!(json["data"]["total_models"], 2);
    assert_eq!(json["data"]["models"][0]["name"], "llama3.2-vision:latest");
    assert_eq!(json["data"]["models"][1]["name"], "mistral:7b");
}

/// When the generation server is down, model listing answers 502.
#[sqlx::test(migrations = "../db/migrations")]
async fn list_models_upstream_failure_returns_502(pool: PgPool) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let state = common::build_test_state(pool, &server.uri());
    let response = get(common::app(&state), "/api/models").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ERROR");
}

// ---------------------------------------------------------------------------
// Prompt submission
// ---------------------------------------------------------------------------

/// A successful prompt answers 201 with the generated text and persists a
/// request row carrying the answer.
#[sqlx::test(migrations = "../db/migrations")]
async fn submit_prompt_persists_request_row(pool: PgPool) {
    let (user, token) = create_verified_user(&pool, "asker", Plan::Free).await;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama3.2-vision:latest",
            "prompt": "describe a cat",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "  A small domestic feline.  ",
            "done": true,
        })))
        .mount(&server)
        .await;

    let state = common::build_test_state(pool.clone(), &server.uri());
    let body = serde_json::json!({ "userId": user.id, "prompt": "describe a cat" });
    let response = post_json_auth(common::app(&state), "/api/generate", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "OK");
    assert_eq!(json["data"]["userId"], user.id);
    assert_eq!(json["data"]["prompt"], "describe a cat");
    assert_eq!(json["data"]["response"], "A small domestic feline.");
    assert_eq!(json["data"]["model"], "llama3.2-vision:latest");
    let request_id = json["data"]["requestId"].as_i64().unwrap();

    let (prompt, answer): (String, Option<String>) =
        sqlx::query_as("SELECT prompt, answer FROM requests WHERE id = $1")
            .bind(request_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(prompt, "describe a cat");
    assert_eq!(answer.as_deref(), Some("A small domestic feline."));
}

/// The historical alias path accepts the same body and shares the handler.
#[sqlx::test(migrations = "../db/migrations")]
async fn analitzar_imatge_alias_works(pool: PgPool) {
    let (user, token) = create_verified_user(&pool, "aliased", Plan::Free).await;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "a dog on a beach",
            "done": true,
        })))
        .mount(&server)
        .await;

    let state = common::build_test_state(pool, &server.uri());
    let body = serde_json::json!({
        "userId": user.id,
        "prompt": "what is in this image?",
        "images": ["aGVsbG8="],
    });
    let response =
        post_json_auth(common::app(&state), "/api/analitzar-imatge", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["response"], "a dog on a beach");
}

/// An explicit model in the body overrides the configured default.
#[sqlx::test(migrations = "../db/migrations")]
async fn submit_prompt_honors_explicit_model(pool: PgPool) {
    let (user, token) = create_verified_user(&pool, "chooser", Plan::Premium).await;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({ "model": "mistral:7b" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "ok",
            "done": true,
        })))
        .mount(&server)
        .await;

    let state = common::build_test_state(pool, &server.uri());
    let body = serde_json::json!({
        "userId": user.id,
        "prompt": "hello",
        "model": "mistral:7b",
    });
    let response = post_json_auth(common::app(&state), "/api/generate", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["model"], "mistral:7b");
}

/// An upstream failure answers 502 and persists no request row.
#[sqlx::test(migrations = "../db/migrations")]
async fn submit_prompt_upstream_failure_persists_nothing(pool: PgPool) {
    let (user, token) = create_verified_user(&pool, "unlucky", Plan::Free).await;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&server)
        .await;

    let state = common::build_test_state(pool.clone(), &server.uri());
    let body = serde_json::json!({ "userId": user.id, "prompt": "hello" });
    let response = post_json_auth(common::app(&state), "/api/generate", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ERROR");
    assert_eq!(json["data"], serde_json::Value::Null);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM requests")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0, "failed generations must not be persisted");
}

/// Prompts require a bearer token like any other per-user operation.
#[sqlx::test(migrations = "../db/migrations")]
async fn submit_prompt_requires_token(pool: PgPool) {
    let (user, _token) = create_verified_user(&pool, "anon", Plan::Free).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "userId": user.id, "prompt": "hello" });
    let response = common::post_json(app, "/api/generate", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// A missing prompt field is a 400 before any upstream call happens.
#[sqlx::test(migrations = "../db/migrations")]
async fn submit_prompt_missing_prompt_returns_400(pool: PgPool) {
    let (user, token) = create_verified_user(&pool, "empty", Plan::Free).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "userId": user.id });
    let response = post_json_auth(app, "/api/generate", body, &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("prompt"));
}

/// Submitting a prompt does not touch the quota counter; accounting is a
/// separate call.
#[sqlx::test(migrations = "../db/migrations")]
async fn submit_prompt_does_not_consume_quota(pool: PgPool) {
    let (user, token) = create_verified_user(&pool, "frugal", Plan::Free).await;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "ok",
            "done": true,
        })))
        .mount(&server)
        .await;

    let state = common::build_test_state(pool.clone(), &server.uri());
    let body = serde_json::json!({ "userId": user.id, "prompt": "hello" });
    let response = post_json_auth(common::app(&state), "/api/generate", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let remaining: i32 = sqlx::query_scalar("SELECT remaining_quota FROM users WHERE id = $1")
        .bind(user.id)
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(remaining, 20);
}
