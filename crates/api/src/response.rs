//! Shared response envelope for API handlers.
//!
//! Every endpoint answers with `{ "status": "OK"|"ERROR", "message": ...,
//! "data": ... }`. Handlers build the success side via [`ApiEnvelope::ok`];
//! the error side is produced by `AppError::into_response`.

use serde::Serialize;

/// Standard response envelope.
#[derive(Debug, Serialize)]
pub struct ApiEnvelope<T: Serialize> {
    pub status: &'static str,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiEnvelope<T> {
    /// Build a success envelope with a human-readable message and payload.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "OK",
            message: message.into(),
            data: Some(data),
        }
    }
}
