//! Route definitions for the `/sessions` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::{payments, sessions};
use crate::state::AppState;

/// Routes mounted at `/sessions`.
///
/// ```text
/// GET    /                                  -> list
/// DELETE /                                  -> close_all
/// POST   /heartbeat                         -> heartbeat
/// GET    /count                             -> count
/// DELETE /{id}                              -> close
/// POST   /payments                          -> record
/// GET    /payments                          -> list
/// POST   /payments/{payment_id}/confirm     -> confirm (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sessions::list).delete(sessions::close_all))
        .route("/heartbeat", post(sessions::heartbeat))
        .route("/count", get(sessions::count))
        .route("/{id}", delete(sessions::close))
        .route("/payments", post(payments::record).get(payments::list))
        .route("/payments/{payment_id}/confirm", post(payments::confirm))
}
