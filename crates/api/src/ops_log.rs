//! Persisted operational logging and the admin log report.
//!
//! Besides the `tracing` event stream, notable handler outcomes are written
//! to the `logs` table so admins can inspect the last hour of activity
//! through the API. Writing a log row is best-effort: a failed insert is
//! reported via `tracing::warn!` and never fails the request.

use std::collections::BTreeMap;

use imagia_db::models::log::LogEntry;
use imagia_db::repositories::LogRepo;
use serde::Serialize;
use sqlx::PgPool;

/// Severity levels recognized by the bucketed report.
pub const LEVELS: [&str; 4] = ["DEBUG", "INFO", "WARN", "ERROR"];

/// Operational categories recognized by the bucketed report.
pub const CATEGORIES: [&str; 5] = ["AUTH", "PROMPT", "QUOTA", "ADMIN", "MODELS"];

/// How far back the admin log report looks.
pub const REPORT_WINDOW_MINS: i64 = 60;

/// Append one operational log row, swallowing storage failures.
pub async fn record(pool: &PgPool, level: &str, category: &str, message: &str) {
    if let Err(e) = LogRepo::insert(pool, level, category, message).await {
        tracing::warn!(error = %e, level, category, "Failed to persist operational log entry");
    }
}

/// One bucket of the admin log report.
#[derive(Debug, Serialize)]
pub struct LogBucket {
    pub count: usize,
    pub entries: Vec<LogEntry>,
}

/// Last-hour logs bucketed by level and by category, plus the flat list.
///
/// Entries with a level or category outside the recognized sets are dropped
/// from the corresponding bucketed view but still appear, and count, in the
/// flat list.
#[derive(Debug, Serialize)]
pub struct LogReport {
    pub total: usize,
    pub by_level: BTreeMap<&'static str, LogBucket>,
    pub by_category: BTreeMap<&'static str, LogBucket>,
    pub entries: Vec<LogEntry>,
}

/// Bucket a window of log entries into the report shape.
pub fn build_report(entries: Vec<LogEntry>) -> LogReport {
    let mut by_level: BTreeMap<&'static str, LogBucket> = LEVELS
        .iter()
        .map(|l| {
            (
                *l,
                LogBucket {
                    count: 0,
                    entries: Vec::new(),
                },
            )
        })
        .collect();
    let mut by_category: BTreeMap<&'static str, LogBucket> = CATEGORIES
        .iter()
        .map(|c| {
            (
                *c,
                LogBucket {
                    count: 0,
                    entries: Vec::new(),
                },
            )
        })
        .collect();

    for entry in &entries {
        if let Some(known) = LEVELS.iter().find(|l| **l == entry.level) {
            let bucket = by_level.get_mut(known).expect("bucket pre-seeded");
            bucket.count += 1;
            bucket.entries.push(entry.clone());
        }
        if let Some(known) = CATEGORIES.iter().find(|c| **c == entry.category) {
            let bucket = by_category.get_mut(known).expect("bucket pre-seeded");
            bucket.count += 1;
            bucket.entries.push(entry.clone());
        }
    }

    LogReport {
        total: entries.len(),
        by_level,
        by_category,
        entries,
    }
}
