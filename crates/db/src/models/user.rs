//! User entity model and DTOs.

use imagia_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash and the bearer token -- NEVER serialize this to
/// API responses directly. Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub phone: String,
    pub nickname: String,
    pub email: String,
    /// Stored plan name (`FREE`, `PREMIUM`, `ADMINISTRATOR`).
    pub plan: String,
    pub remaining_quota: i32,
    pub password_hash: String,
    /// Opaque bearer token; `None` until the phone has been validated.
    pub api_token: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Whether the user has completed phone validation.
    pub fn is_verified(&self) -> bool {
        self.api_token.is_some()
    }
}

/// Safe user representation for API responses (no password hash, no token).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: DbId,
    pub phone: String,
    pub nickname: String,
    pub email: String,
    pub plan: String,
    pub remaining_quote: i32,
    pub verified: bool,
    pub created_at: Timestamp,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            phone: user.phone.clone(),
            nickname: user.nickname.clone(),
            email: user.email.clone(),
            plan: user.plan.clone(),
            remaining_quote: user.remaining_quota,
            verified: user.is_verified(),
            created_at: user.created_at,
        }
    }
}

/// DTO for inserting a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub phone: String,
    pub nickname: String,
    pub email: String,
    pub plan: String,
    pub remaining_quota: i32,
    pub password_hash: String,
}
