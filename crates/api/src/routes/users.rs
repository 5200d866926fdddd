//! Route definitions for the `/usuaris` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::{quota, users};
use crate::state::AppState;

/// Routes mounted at `/usuaris`.
///
/// ```text
/// POST /registrar -> register
/// POST /validar   -> validate
/// POST /login     -> login (administrators only)
/// POST /quota     -> use_quota (consumes one unit)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/registrar", post(users::register))
        .route("/validar", post(users::validate))
        .route("/login", post(users::login))
        .route("/quota", post(quota::use_quota))
}
