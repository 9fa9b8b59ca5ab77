//! Active login session model and DTOs.

use igeco_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `active_sessions` table.
///
/// Whether the session is *active* is derived from `last_activity`; see
/// `igeco_core::session_quota::is_active`.
#[derive(Debug, Clone, FromRow)]
pub struct ActiveSession {
    pub id: DbId,
    pub user_id: DbId,
    /// SHA-256 hex digest of the authentication token.
    pub token_hash: String,
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub last_activity: Timestamp,
    pub created_at: Timestamp,
}

/// Client metadata captured on every heartbeat.
#[derive(Debug, Clone, Default)]
pub struct SessionMetadata {
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// DTO for inserting a new session row.
#[derive(Debug, Clone)]
pub struct CreateActiveSession {
    pub user_id: DbId,
    pub token_hash: String,
    pub metadata: SessionMetadata,
    pub now: Timestamp,
}

/// Session representation for API responses (no token digest).
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: DbId,
    pub device_info: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub last_activity: Timestamp,
    pub created_at: Timestamp,
    /// Whether this row belongs to the token that made the request.
    pub is_current: bool,
}

impl SessionSummary {
    pub fn from_session(session: &ActiveSession, current_token_hash: Option<&str>) -> Self {
        Self {
            id: session.id,
            device_info: session.device_info.clone(),
            ip_address: session.ip_address.clone(),
            user_agent: session.user_agent.clone(),
            last_activity: session.last_activity,
            created_at: session.created_at,
            is_current: current_token_hash == Some(session.token_hash.as_str()),
        }
    }
}
