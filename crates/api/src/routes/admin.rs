//! Route definitions for the `/admin` resource.
//!
//! All routes require the ADMINISTRATOR plan (enforced inside the handlers
//! via `require_admin`), except the quota fetch which authenticates the
//! user named in the body.

use axum::routing::post;
use axum::Router;

use crate::handlers::{admin, quota};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// POST /usuaris                           -> list_users
/// POST /usuaris/quota                     -> get_quota
/// POST /usuaris/pla/actualitzar           -> update_plan
/// POST /usuaris/pla/setAvailableRequests  -> set_available_requests
/// POST /logs                              -> get_logs
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/usuaris", post(admin::list_users))
        .route("/usuaris/quota", post(quota::get_quota))
        .route("/usuaris/pla/actualitzar", post(admin::update_plan))
        .route(
            "/usuaris/pla/setAvailableRequests",
            post(admin::set_available_requests),
        )
        .route("/logs", post(admin::get_logs))
}
