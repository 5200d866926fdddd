//! Bearer-token extraction and database-backed authentication checks.
//!
//! Tokens are opaque strings stored on the user row at phone validation.
//! Authenticating a call means loading the user named in the request body
//! and comparing the stored token with the presented one exactly.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use imagia_core::error::CoreError;
use imagia_core::plan::Plan;
use imagia_core::types::DbId;
use imagia_db::models::user::User;
use imagia_db::repositories::UserRepo;
use sqlx::PgPool;

use crate::error::AppError;

/// The raw bearer token from the `Authorization` header.
///
/// Use this as an extractor parameter in any handler that requires a token;
/// pair it with [`authenticate_user`] or [`require_admin`] to resolve the
/// caller against the user store.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        Ok(BearerToken(token.to_string()))
    }
}

/// Load a user by id and check the presented token against the stored one.
///
/// Fails with 404 when the user does not exist, and 401 when the user has
/// not validated their phone yet or the token differs in any way.
pub async fn authenticate_user(
    pool: &PgPool,
    user_id: DbId,
    token: &str,
) -> Result<User, AppError> {
    let user = UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "User",
                key: user_id.to_string(),
            })
        })?;

    match &user.api_token {
        Some(stored) if stored == token => Ok(user),
        Some(_) => Err(AppError::Core(CoreError::Unauthorized(
            "Invalid token".into(),
        ))),
        None => Err(AppError::Core(CoreError::Unauthorized(
            "User has not validated their phone".into(),
        ))),
    }
}

/// Like [`authenticate_user`], but additionally requires the ADMINISTRATOR
/// plan. Fails with 403 for any other plan.
pub async fn require_admin(pool: &PgPool, admin_id: DbId, token: &str) -> Result<User, AppError> {
    let admin = authenticate_user(pool, admin_id, token).await?;

    let plan: Plan = admin.plan.parse().map_err(AppError::Core)?;
    if plan != Plan::Administrator {
        return Err(AppError::Core(CoreError::Forbidden(
            "Administrator plan required".into(),
        )));
    }

    Ok(admin)
}
