//! Route definitions for the `/admin` resource.

use axum::routing::put;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin` (admin role enforced per handler).
///
/// ```text
/// PUT /users/{id}/quotas   -> update_quotas
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/users/{id}/quotas", put(admin::update_quotas))
}
