//! Session quota manager.
//!
//! Tracks which login sessions of a user are active (heartbeat within the
//! trailing 24 hours), enforces the per-user `max_sessions` quota when a new
//! token shows up, lets users free capacity by closing sessions, and applies
//! slot purchases that raise the quota.
//!
//! - [`store`] -- the [`SessionStore`] trait the manager is written against.
//! - [`postgres`] -- the production store backed by `igeco_db` repositories.
//! - [`memory`] -- an in-process store for tests and database-less runs.
//! - [`manager`] -- [`SessionQuotaManager`], the operations handlers call.
//!
//! Operations are plain read-modify-write sequences without transactions.
//! Two registrations racing on the same under-quota count can both be
//! admitted, so the quota is a soft limit.

pub mod manager;
pub mod memory;
pub mod postgres;
pub mod store;

use igeco_core::types::DbId;
use igeco_db::models::active_session::{ActiveSession, SessionSummary};

pub use manager::{Admission, QuotaStatus, RecordPayment, SessionQuotaManager};
pub use memory::MemorySessionStore;
pub use postgres::PgSessionStore;
pub use store::SessionStore;

use crate::auth::jwt::hash_session_token;

/// Failures of session quota operations.
///
/// Exceeding the quota is not an error; it is reported as
/// [`Admission::QuotaExceeded`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session does not exist or belongs to another user.
    #[error("Session {0} not found")]
    SessionNotFound(DbId),

    #[error("User {0} not found")]
    UserNotFound(DbId),

    #[error("Payment {0} not found")]
    PaymentNotFound(String),

    #[error("Payment {0} has already been recorded")]
    DuplicatePayment(String),

    #[error("Invalid payment: {0}")]
    InvalidPayment(String),

    /// Any persistence failure. Details are logged, not shown to clients.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for SessionError {
    fn from(err: sqlx::Error) -> Self {
        SessionError::Storage(err.to_string())
    }
}

/// Response view of `sessions`, flagging the row that belongs to `current_token`.
pub fn summarize_sessions(sessions: &[ActiveSession], current_token: &str) -> Vec<SessionSummary> {
    let current = hash_session_token(current_token);
    sessions
        .iter()
        .map(|s| SessionSummary::from_session(s, Some(current.as_str())))
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn sqlx_errors_become_storage_failures() {
        let err = SessionError::from(sqlx::Error::RowNotFound);
        assert_matches!(err, SessionError::Storage(msg) if !msg.is_empty());
    }
}
