//! Repository for the append-only `logs` table.

use sqlx::PgPool;

use crate::models::log::LogEntry;

const COLUMNS: &str = "id, level, category, message, created_at, updated_at";

/// Provides operations for operational log rows.
pub struct LogRepo;

impl LogRepo {
    /// Append one log row.
    pub async fn insert(
        pool: &PgPool,
        level: &str,
        category: &str,
        message: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO logs (level, category, message) VALUES ($1, $2, $3)")
            .bind(level)
            .bind(category)
            .bind(message)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// All rows created within the last `minutes` minutes, oldest first.
    pub async fn recent(pool: &PgPool, minutes: i64) -> Result<Vec<LogEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM logs
             WHERE created_at >= NOW() - ($1 * INTERVAL '1 minute')
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, LogEntry>(&query)
            .bind(minutes)
            .fetch_all(pool)
            .await
    }
}
