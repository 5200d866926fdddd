//! Handler for the model-listing passthrough.

use axum::extract::State;
use axum::Json;
use imagia_ollama::ModelInfo;
use serde::Serialize;

use crate::error::AppResult;
use crate::ops_log;
use crate::response::ApiEnvelope;
use crate::state::AppState;

/// Payload for the model listing. Field names follow the upstream tags
/// endpoint (`total_models`, `models`).
#[derive(Debug, Serialize)]
pub struct ModelList {
    pub total_models: usize,
    pub models: Vec<ModelInfo>,
}

/// GET|POST /api/models
///
/// Relay the generation server's model list.
pub async fn list_models(State(state): State<AppState>) -> AppResult<Json<ApiEnvelope<ModelList>>> {
    let models = match state.ollama.list_models().await {
        Ok(models) => models,
        Err(e) => {
            ops_log::record(&state.pool, "ERROR", "MODELS", "Failed to list models").await;
            return Err(e.into());
        }
    };

    tracing::info!(count = models.len(), "Model list retrieved");

    let data = ModelList {
        total_models: models.len(),
        models,
    };
    Ok(Json(ApiEnvelope::ok("Models retrieved", data)))
}
