use std::sync::Arc;

use crate::config::ServerConfig;
use crate::sessions::SessionQuotaManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference-counted and everything else sits
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (login and admin user management).
    pub pool: igeco_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Session quota manager, with its store injected at start-up.
    pub sessions: Arc<SessionQuotaManager>,
}
