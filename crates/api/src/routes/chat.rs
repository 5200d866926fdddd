//! Route definitions for the generation endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{models, prompts};
use crate::state::AppState;

/// Routes mounted directly under `/api`.
///
/// `/analitzar-imatge` is the historical alias of `/generate`; both accept
/// the same body and share one handler.
///
/// ```text
/// GET|POST /models           -> list_models
/// POST     /generate         -> submit_prompt
/// POST     /analitzar-imatge -> submit_prompt
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/models",
            get(models::list_models).post(models::list_models),
        )
        .route("/generate", post(prompts::submit_prompt))
        .route("/analitzar-imatge", post(prompts::submit_prompt))
}
