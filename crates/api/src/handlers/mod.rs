//! HTTP handlers, grouped by resource.

pub mod admin;
pub mod models;
pub mod prompts;
pub mod quota;
pub mod users;

use imagia_core::error::CoreError;

use crate::error::AppError;

/// Unwrap a required request field, rejecting missing or blank values with
/// a 400 validation error naming the field.
fn required(value: Option<String>, name: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Core(CoreError::Validation(format!(
            "Missing required field '{name}'"
        )))),
    }
}

/// Unwrap a required numeric id field.
fn required_id(value: Option<i64>, name: &str) -> Result<i64, AppError> {
    value.ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Missing required field '{name}'"
        )))
    })
}
