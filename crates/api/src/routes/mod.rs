pub mod admin;
pub mod auth;
pub mod health;
pub mod sessions;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                  login (public)
/// /auth/logout                                 logout (requires auth)
///
/// /sessions                                    list, close all
/// /sessions/heartbeat                          register or refresh (POST)
/// /sessions/count                              quota poll
/// /sessions/{id}                               close one (DELETE)
/// /sessions/payments                           record, list
/// /sessions/payments/{payment_id}/confirm      confirm (admin only)
///
/// /users/me                                    profile (session guard)
///
/// /admin/users/{id}/quotas                     set quotas (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/sessions", sessions::router())
        .nest("/users", users::router())
        .nest("/admin", admin::router())
}
