//! Repository for the `requests` table.

use imagia_core::types::DbId;
use sqlx::PgPool;

use crate::models::request::{CreatePromptRequest, PromptRequest};

const COLUMNS: &str = "id, user_id, prompt, answer, model, created_at, updated_at";

/// Provides operations for persisted prompt requests.
pub struct RequestRepo;

impl RequestRepo {
    /// Insert a new prompt request, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePromptRequest,
    ) -> Result<PromptRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO requests (user_id, prompt, answer, model)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PromptRequest>(&query)
            .bind(input.user_id)
            .bind(&input.prompt)
            .bind(&input.answer)
            .bind(&input.model)
            .fetch_one(pool)
            .await
    }

    /// List all requests submitted by one user, oldest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<PromptRequest>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM requests WHERE user_id = $1 ORDER BY created_at ASC");
        sqlx::query_as::<_, PromptRequest>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
