//! Operational log entity model.

use imagia_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One append-only operational log row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LogEntry {
    pub id: DbId,
    /// Severity: `DEBUG`, `INFO`, `WARN` or `ERROR`.
    pub level: String,
    /// Operational tag, e.g. `PROMPT`, `QUOTA`, `ADMIN`.
    pub category: String,
    pub message: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
