//! Handler for prompt submission: relay to the generation server and
//! persist the resulting request row.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use imagia_core::types::DbId;
use imagia_db::models::request::CreatePromptRequest;
use imagia_db::repositories::RequestRepo;
use imagia_ollama::GenerateRequest;
use serde::{Deserialize, Serialize};

use super::{required, required_id};
use crate::error::AppResult;
use crate::middleware::auth::{authenticate_user, BearerToken};
use crate::ops_log;
use crate::response::ApiEnvelope;
use crate::state::AppState;

/// Request body for `POST /api/generate` (and `/api/analitzar-imatge`).
#[derive(Debug, Deserialize)]
pub struct PromptRequestBody {
    #[serde(rename = "userId")]
    pub user_id: Option<DbId>,
    pub prompt: Option<String>,
    /// Base64-encoded images for multimodal models.
    pub images: Option<Vec<String>>,
    pub model: Option<String>,
    pub stream: Option<bool>,
}

/// Payload returned for an accepted prompt.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptData {
    pub request_id: DbId,
    pub user_id: DbId,
    pub prompt: String,
    pub response: String,
    pub model: String,
}

/// POST /api/generate | POST /api/analitzar-imatge
///
/// Submit a prompt (optionally with images) on behalf of a verified user.
/// The answer is persisted as a `requests` row and returned with 201.
/// Upstream failures propagate as 502; nothing is persisted in that case.
pub async fn submit_prompt(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(input): Json<PromptRequestBody>,
) -> AppResult<(StatusCode, Json<ApiEnvelope<PromptData>>)> {
    let user_id = required_id(input.user_id, "userId")?;
    let prompt = required(input.prompt, "prompt")?;

    let user = authenticate_user(&state.pool, user_id, &token).await?;

    let model = input
        .model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| state.config.default_model.clone());

    let generate = GenerateRequest {
        model: model.clone(),
        prompt: prompt.clone(),
        images: input.images,
        stream: input.stream.unwrap_or(false),
    };

    let answer = match state.ollama.generate(&generate).await {
        Ok(answer) => answer,
        Err(e) => {
            ops_log::record(
                &state.pool,
                "ERROR",
                "PROMPT",
                &format!("Generation failed for user {}", user.nickname),
            )
            .await;
            return Err(e.into());
        }
    };

    let request = RequestRepo::create(
        &state.pool,
        &CreatePromptRequest {
            user_id,
            prompt: prompt.clone(),
            answer: Some(answer.clone()),
            model: model.clone(),
        },
    )
    .await?;

    ops_log::record(
        &state.pool,
        "INFO",
        "PROMPT",
        &format!("User {} submitted prompt {}", user.nickname, request.id),
    )
    .await;

    let data = PromptData {
        request_id: request.id,
        user_id,
        prompt,
        response: answer,
        model,
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok("Prompt processed", data)),
    ))
}
