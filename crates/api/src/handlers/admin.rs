//! Handlers for the admin surface: user listing, plan changes, quota
//! overrides, and the operational log report.
//!
//! Every handler authenticates the caller with [`require_admin`]: token
//! equality against the stored value plus the ADMINISTRATOR plan.

use axum::extract::State;
use axum::Json;
use imagia_core::error::CoreError;
use imagia_core::plan::Plan;
use imagia_core::types::DbId;
use imagia_db::models::user::UserResponse;
use imagia_db::repositories::{LogRepo, UserRepo};
use serde::Deserialize;

use super::{required, required_id};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{require_admin, BearerToken};
use crate::ops_log::{self, LogReport};
use crate::response::ApiEnvelope;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/admin/usuaris` and `POST /api/admin/logs`.
#[derive(Debug, Deserialize)]
pub struct AdminRequest {
    #[serde(rename = "adminId")]
    pub admin_id: Option<DbId>,
}

/// Request body for `POST /api/admin/usuaris/pla/actualitzar`.
#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    #[serde(rename = "adminId")]
    pub admin_id: Option<DbId>,
    pub nickname: Option<String>,
    /// New plan: only `FREE` or `PREMIUM` are accepted.
    pub plan: Option<String>,
}

/// Request body for `POST /api/admin/usuaris/pla/setAvailableRequests`.
#[derive(Debug, Deserialize)]
pub struct SetAvailableRequest {
    #[serde(rename = "adminId")]
    pub admin_id: Option<DbId>,
    pub nickname: Option<String>,
    #[serde(rename = "availableRequests")]
    pub available_requests: Option<i32>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/admin/usuaris
///
/// List all users, most recently created first.
pub async fn list_users(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(input): Json<AdminRequest>,
) -> AppResult<Json<ApiEnvelope<Vec<UserResponse>>>> {
    let admin_id = required_id(input.admin_id, "adminId")?;
    require_admin(&state.pool, admin_id, &token).await?;

    let users = UserRepo::list(&state.pool).await?;
    let responses: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();

    Ok(Json(ApiEnvelope::ok("Users listed", responses)))
}

/// POST /api/admin/usuaris/pla/actualitzar
///
/// Change a user's plan and reset their quota to the new plan's ceiling
/// (full reset, never pro-rated). Administrators cannot be reassigned.
pub async fn update_plan(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(input): Json<UpdatePlanRequest>,
) -> AppResult<Json<ApiEnvelope<UserResponse>>> {
    let admin_id = required_id(input.admin_id, "adminId")?;
    let nickname = required(input.nickname, "nickname")?;
    let plan_name = required(input.plan, "plan")?;

    let admin = require_admin(&state.pool, admin_id, &token).await?;

    let new_plan: Plan = plan_name.parse().map_err(AppError::Core)?;
    if !new_plan.is_assignable() {
        return Err(AppError::Core(CoreError::Validation(
            "Plan must be FREE or PREMIUM".into(),
        )));
    }

    let target = UserRepo::find_by_nickname(&state.pool, &nickname)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "User",
                key: nickname.clone(),
            })
        })?;

    let target_plan: Plan = target.plan.parse().map_err(AppError::Core)?;
    if target_plan == Plan::Administrator {
        return Err(AppError::Core(CoreError::Forbidden(
            "An administrator's plan cannot be changed".into(),
        )));
    }

    let ceiling = state.config.quotas.ceiling(new_plan);
    let updated = UserRepo::update_plan(&state.pool, target.id, new_plan.as_str(), ceiling)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "User",
                key: target.id.to_string(),
            })
        })?;

    ops_log::record(
        &state.pool,
        "INFO",
        "ADMIN",
        &format!(
            "Admin {} changed plan of {} to {}",
            admin.nickname, updated.nickname, updated.plan
        ),
    )
    .await;

    Ok(Json(ApiEnvelope::ok(
        "Plan updated",
        UserResponse::from(&updated),
    )))
}

/// POST /api/admin/usuaris/pla/setAvailableRequests
///
/// Overwrite a user's remaining quota with an arbitrary non-negative value,
/// independent of the plan ceiling.
pub async fn set_available_requests(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(input): Json<SetAvailableRequest>,
) -> AppResult<Json<ApiEnvelope<UserResponse>>> {
    let admin_id = required_id(input.admin_id, "adminId")?;
    let nickname = required(input.nickname, "nickname")?;
    let remaining = input.available_requests.ok_or_else(|| {
        AppError::Core(CoreError::Validation(
            "Missing required field 'availableRequests'".into(),
        ))
    })?;

    if remaining < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "availableRequests must be zero or positive".into(),
        )));
    }

    let admin = require_admin(&state.pool, admin_id, &token).await?;

    let target = UserRepo::find_by_nickname(&state.pool, &nickname)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "User",
                key: nickname.clone(),
            })
        })?;

    let updated = UserRepo::set_remaining_quota(&state.pool, target.id, remaining)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "User",
                key: target.id.to_string(),
            })
        })?;

    ops_log::record(
        &state.pool,
        "INFO",
        "ADMIN",
        &format!(
            "Admin {} set remaining requests of {} to {}",
            admin.nickname, updated.nickname, remaining
        ),
    )
    .await;

    Ok(Json(ApiEnvelope::ok(
        "Remaining requests updated",
        UserResponse::from(&updated),
    )))
}

/// POST /api/admin/logs
///
/// Operational logs from the last hour, oldest first, bucketed by level and
/// category alongside the flat list.
pub async fn get_logs(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(input): Json<AdminRequest>,
) -> AppResult<Json<ApiEnvelope<LogReport>>> {
    let admin_id = required_id(input.admin_id, "adminId")?;
    require_admin(&state.pool, admin_id, &token).await?;

    let entries = LogRepo::recent(&state.pool, ops_log::REPORT_WINDOW_MINS).await?;
    let report = ops_log::build_report(entries);

    Ok(Json(ApiEnvelope::ok("Logs retrieved", report)))
}
