pub mod admin;
pub mod chat;
pub mod health;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /usuaris/registrar                       register (public)
/// /usuaris/validar                         validate phone code (public)
/// /usuaris/login                           admin login (public)
/// /usuaris/quota                           consume one quota unit
///
/// /models                                  list generation models
/// /generate                                submit prompt
/// /analitzar-imatge                        submit prompt (image alias)
///
/// /admin/usuaris                           list users (admin only)
/// /admin/usuaris/quota                     fetch quota counters
/// /admin/usuaris/pla/actualitzar           change a user's plan
/// /admin/usuaris/pla/setAvailableRequests  overwrite remaining quota
/// /admin/logs                              last-hour log report
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/usuaris", users::router())
        .merge(chat::router())
        .nest("/admin", admin::router())
}
