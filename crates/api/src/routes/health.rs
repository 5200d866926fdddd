use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::response::ApiEnvelope;
use crate::state::AppState;

/// Health payload, wrapped in the standard response envelope like every
/// other endpoint.
#[derive(Serialize)]
pub struct HealthData {
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database answered a round trip.
    pub db_healthy: bool,
}

/// GET /health -- service liveness plus a database round trip.
///
/// Always answers 200; a broken database shows up as `db_healthy: false`
/// so load balancers keep routing while operators investigate.
async fn health_check(State(state): State<AppState>) -> Json<ApiEnvelope<HealthData>> {
    let db_healthy = imagia_db::health_check(&state.pool).await.is_ok();

    let message = if db_healthy {
        "Service healthy"
    } else {
        "Database unreachable"
    };

    Json(ApiEnvelope::ok(
        message,
        HealthData {
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        },
    ))
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
