//! Handlers for registration, phone validation, and admin login.

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use imagia_core::error::CoreError;
use imagia_core::plan::Plan;
use imagia_core::types::DbId;
use imagia_db::models::user::CreateUser;
use imagia_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use super::{required, required_id};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::generate_token;
use crate::error::{AppError, AppResult};
use crate::ops_log;
use crate::response::ApiEnvelope;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/usuaris/registrar`.
///
/// Fields are `Option` so missing values surface as the documented 400
/// envelope instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub phone: Option<String>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    /// Plan name: `FREE`, `PREMIUM` or `ADMINISTRATOR`.
    pub type_id: Option<String>,
    pub password: Option<String>,
}

/// Payload returned on successful registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterData {
    pub user_id: DbId,
    pub nickname: String,
    pub plan: String,
    pub remaining_quote: i32,
    pub total_quote: i32,
}

/// Request body for `POST /api/usuaris/validar`.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<DbId>,
    pub phone: Option<String>,
    pub code: Option<String>,
}

/// Request body for `POST /api/usuaris/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub nickname: Option<String>,
    pub password: Option<String>,
}

/// Payload returned by validate and login (the token itself travels in the
/// `Authorization` response header).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub user_id: DbId,
    pub nickname: String,
    pub plan: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/usuaris/registrar
///
/// Create an unverified user with the plan's full quota, store a pending
/// six-digit verification code, and dispatch it via SMS.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let phone = required(input.phone, "phone")?;
    let nickname = required(input.nickname, "nickname")?;
    let email = required(input.email, "email")?;
    let type_id = required(input.type_id, "type_id")?;
    let password = required(input.password, "password")?;

    // Unrecognized plan names are a 400, never a silent default.
    let plan: Plan = type_id.parse().map_err(AppError::Core)?;
    let ceiling = state.config.quotas.ceiling(plan);

    let password_hash = hash_password(&password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let create = CreateUser {
        phone: phone.clone(),
        nickname,
        email,
        plan: plan.to_string(),
        remaining_quota: ceiling,
        password_hash,
    };

    // Unique-violation on phone/nickname/email surfaces as 409.
    let user = UserRepo::create(&state.pool, &create).await?;

    let code = state.verifications.issue(user.id, &phone);
    state.verifications.sweep();

    if let Err(e) = state.sms.send_verification(&phone, &code).await {
        tracing::warn!(error = %e, user_id = user.id, "SMS delivery failed");
        ops_log::record(
            &state.pool,
            "WARN",
            "AUTH",
            &format!("SMS delivery failed for user {}", user.id),
        )
        .await;
    }

    ops_log::record(
        &state.pool,
        "INFO",
        "AUTH",
        &format!("User {} registered with plan {}", user.nickname, user.plan),
    )
    .await;

    let data = RegisterData {
        user_id: user.id,
        nickname: user.nickname,
        plan: user.plan,
        remaining_quote: user.remaining_quota,
        total_quote: ceiling,
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiEnvelope::ok("User registered; verification code sent", data)),
    ))
}

/// POST /api/usuaris/validar
///
/// One-shot phone validation: consumes the pending code and issues the
/// user's opaque bearer token in the `Authorization` response header.
pub async fn validate(
    State(state): State<AppState>,
    Json(input): Json<ValidateRequest>,
) -> AppResult<impl IntoResponse> {
    let user_id = required_id(input.user_id, "userId")?;
    let phone = required(input.phone, "phone")?;
    let code = required(input.code, "code")?;

    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "User",
                key: user_id.to_string(),
            })
        })?;

    // Exact match on phone and code; removes the entry on success.
    state
        .verifications
        .consume(user_id, &phone, &code)
        .map_err(AppError::Core)?;

    let token = generate_token();
    let updated = UserRepo::set_token(&state.pool, user_id, &token).await?;
    if !updated {
        // Token already present: the null -> token transition is one-time.
        return Err(AppError::Core(CoreError::Unauthorized(
            "User is already validated".into(),
        )));
    }

    ops_log::record(
        &state.pool,
        "INFO",
        "AUTH",
        &format!("User {} validated their phone", user.nickname),
    )
    .await;

    let data = AuthData {
        user_id,
        nickname: user.nickname,
        plan: user.plan,
    };

    Ok((
        AppendHeaders([(AUTHORIZATION, format!("Bearer {token}"))]),
        Json(ApiEnvelope::ok("Phone validated", data)),
    ))
}

/// POST /api/usuaris/login
///
/// Administrator-only login by nickname + password. Returns the stored
/// bearer token in the `Authorization` response header.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let nickname = required(input.nickname, "nickname")?;
    let password = required(input.password, "password")?;

    let user = UserRepo::find_by_nickname(&state.pool, &nickname)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Invalid credentials".into())))?;

    let plan: Plan = user.plan.parse().map_err(AppError::Core)?;
    if plan != Plan::Administrator {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only administrators may log in".into(),
        )));
    }

    let Some(token) = user.api_token.clone() else {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Account has not validated its phone".into(),
        )));
    };

    let password_valid = verify_password(&password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        ops_log::record(
            &state.pool,
            "WARN",
            "AUTH",
            &format!("Failed login attempt for {nickname}"),
        )
        .await;
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid credentials".into(),
        )));
    }

    ops_log::record(
        &state.pool,
        "INFO",
        "AUTH",
        &format!("Administrator {nickname} logged in"),
    )
    .await;

    let data = AuthData {
        user_id: user.id,
        nickname: user.nickname,
        plan: user.plan,
    };

    Ok((
        AppendHeaders([(AUTHORIZATION, format!("Bearer {token}"))]),
        Json(ApiEnvelope::ok("Login successful", data)),
    ))
}
