//! Prompt request entity model.

use imagia_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A persisted prompt submission and the answer it produced.
///
/// Rows are created once per accepted prompt and never mutated.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PromptRequest {
    pub id: DbId,
    pub user_id: DbId,
    pub prompt: String,
    pub answer: Option<String>,
    pub model: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new prompt request.
#[derive(Debug)]
pub struct CreatePromptRequest {
    pub user_id: DbId,
    pub prompt: String,
    pub answer: Option<String>,
    pub model: String,
}
