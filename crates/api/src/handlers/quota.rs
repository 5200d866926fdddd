//! Handlers for fetching and consuming quota.

use axum::extract::State;
use axum::Json;
use imagia_core::error::CoreError;
use imagia_core::plan::Plan;
use imagia_core::types::DbId;
use imagia_db::models::user::User;
use imagia_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use super::required_id;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{authenticate_user, BearerToken};
use crate::ops_log;
use crate::response::ApiEnvelope;
use crate::state::AppState;

/// Request body for both quota endpoints.
#[derive(Debug, Deserialize)]
pub struct QuotaRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<DbId>,
}

/// Quota counters for one user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuotaCounters {
    pub plan: String,
    pub remaining_quote: i32,
    pub total_quote: i32,
}

impl QuotaCounters {
    fn for_user(state: &AppState, user: &User) -> Result<Self, AppError> {
        let plan: Plan = user.plan.parse().map_err(AppError::Core)?;
        Ok(Self {
            plan: user.plan.clone(),
            remaining_quote: user.remaining_quota,
            total_quote: state.config.quotas.ceiling(plan),
        })
    }
}

/// POST /api/admin/usuaris/quota
///
/// Fetch the authenticated user's quota counters without consuming any.
pub async fn get_quota(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(input): Json<QuotaRequest>,
) -> AppResult<Json<ApiEnvelope<QuotaCounters>>> {
    let user_id = required_id(input.user_id, "userId")?;
    let user = authenticate_user(&state.pool, user_id, &token).await?;

    let counters = QuotaCounters::for_user(&state, &user)?;
    Ok(Json(ApiEnvelope::ok("Quota fetched", counters)))
}

/// POST /api/usuaris/quota
///
/// Consume exactly one quota unit. The decrement is a conditional UPDATE,
/// so concurrent calls can never drive the counter negative; an exhausted
/// counter answers 402 and stays at zero.
pub async fn use_quota(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(input): Json<QuotaRequest>,
) -> AppResult<Json<ApiEnvelope<QuotaCounters>>> {
    let user_id = required_id(input.user_id, "userId")?;
    let user = authenticate_user(&state.pool, user_id, &token).await?;

    let Some(updated) = UserRepo::consume_quota(&state.pool, user_id).await? else {
        ops_log::record(
            &state.pool,
            "WARN",
            "QUOTA",
            &format!("Quota exhausted for user {}", user.nickname),
        )
        .await;
        return Err(AppError::Core(CoreError::QuotaExhausted(
            "No remaining requests for this plan".into(),
        )));
    };

    ops_log::record(
        &state.pool,
        "INFO",
        "QUOTA",
        &format!(
            "User {} consumed one request ({} remaining)",
            updated.nickname, updated.remaining_quota
        ),
    )
    .await;

    let counters = QuotaCounters::for_user(&state, &updated)?;
    Ok(Json(ApiEnvelope::ok("Quota consumed", counters)))
}
