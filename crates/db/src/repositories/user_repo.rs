//! Repository for the `users` table.

use imagia_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, phone, nickname, email, plan, remaining_quota, \
                        password_hash, api_token, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (phone, nickname, email, plan, remaining_quota, password_hash)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.phone)
            .bind(&input.nickname)
            .bind(&input.email)
            .bind(&input.plan)
            .bind(input.remaining_quota)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by nickname (case-sensitive).
    pub async fn find_by_nickname(
        pool: &PgPool,
        nickname: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE nickname = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(nickname)
            .fetch_optional(pool)
            .await
    }

    /// List all users, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY created_at DESC");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Set the bearer token after phone validation.
    ///
    /// Only succeeds while the token is still unset, so the null -> token
    /// transition happens at most once per user. Returns `true` if the row
    /// was updated.
    pub async fn set_token(pool: &PgPool, id: DbId, token: &str) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET api_token = $2 WHERE id = $1 AND api_token IS NULL")
                .bind(id)
                .bind(token)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Atomically consume one quota unit.
    ///
    /// The decrement is a single conditional UPDATE, so concurrent calls can
    /// never drive the counter below zero. Returns the updated row, or `None`
    /// when the counter was already exhausted.
    pub async fn consume_quota(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET remaining_quota = remaining_quota - 1
             WHERE id = $1 AND remaining_quota > 0
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Change a user's plan and reset the quota counter to the new ceiling.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_plan(
        pool: &PgPool,
        id: DbId,
        plan: &str,
        ceiling: i32,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET plan = $2, remaining_quota = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(plan)
            .bind(ceiling)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the remaining quota with an admin-supplied value,
    /// independent of the plan ceiling.
    pub async fn set_remaining_quota(
        pool: &PgPool,
        id: DbId,
        remaining: i32,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET remaining_quota = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(remaining)
            .fetch_optional(pool)
            .await
    }
}
