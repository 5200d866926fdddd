/// Internal database identifier (BIGSERIAL).
pub type DbId = i64;

/// UTC timestamp as stored in `timestamptz` columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
