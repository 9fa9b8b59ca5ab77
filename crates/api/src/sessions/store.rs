//! Storage seam for the session quota manager.

use async_trait::async_trait;
use igeco_core::types::{DbId, Timestamp};
use igeco_db::models::active_session::{ActiveSession, CreateActiveSession, SessionMetadata};
use igeco_db::models::session_payment::{CreateSessionPayment, SessionPayment};

use super::SessionError;

/// Persistence operations the quota manager needs.
///
/// Each method is a single atomic step; the manager composes them without a
/// surrounding transaction. Activity thresholds (`since`, `before`) are
/// computed by the caller.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// The user's session quota, or `None` if the user does not exist.
    async fn max_sessions(&self, user_id: DbId) -> Result<Option<i32>, SessionError>;

    /// Raise the user's session quota by `slots` relative to its current
    /// value. Returns the new quota, or `None` if the user does not exist.
    async fn add_max_sessions(&self, user_id: DbId, slots: i32)
        -> Result<Option<i32>, SessionError>;

    /// The row for `(user_id, token_hash)`, whatever its age.
    async fn find_session(
        &self,
        user_id: DbId,
        token_hash: &str,
    ) -> Result<Option<ActiveSession>, SessionError>;

    /// Insert a session row. An existing row for the same token is refreshed
    /// instead of duplicated.
    async fn insert_session(
        &self,
        input: &CreateActiveSession,
    ) -> Result<ActiveSession, SessionError>;

    /// Bump `last_activity` to `now` and overwrite any metadata supplied.
    async fn touch_session(
        &self,
        session_id: DbId,
        metadata: &SessionMetadata,
        now: Timestamp,
    ) -> Result<Option<ActiveSession>, SessionError>;

    /// Number of the user's rows with `last_activity > since`.
    async fn count_active(&self, user_id: DbId, since: Timestamp) -> Result<i64, SessionError>;

    /// The user's rows with `last_activity > since`, most recent first.
    async fn list_active(
        &self,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<ActiveSession>, SessionError>;

    /// Delete one row if it belongs to `user_id`. `true` if deleted.
    async fn delete_session(&self, user_id: DbId, session_id: DbId) -> Result<bool, SessionError>;

    /// Delete every row of the user, returning how many were removed.
    async fn delete_all_sessions(&self, user_id: DbId) -> Result<u64, SessionError>;

    /// Delete the user's rows with `last_activity <= before`.
    async fn delete_stale_sessions(
        &self,
        user_id: DbId,
        before: Timestamp,
    ) -> Result<u64, SessionError>;

    /// Insert an unapplied payment record.
    ///
    /// Fails with [`SessionError::DuplicatePayment`] when the provider id is
    /// already recorded.
    async fn insert_payment(
        &self,
        input: &CreateSessionPayment,
    ) -> Result<SessionPayment, SessionError>;

    async fn find_payment(&self, payment_id: &str) -> Result<Option<SessionPayment>, SessionError>;

    /// Mark a record `COMPLETED` + applied. `None` if missing or already applied.
    async fn mark_payment_applied(
        &self,
        id: DbId,
        completed_at: Timestamp,
    ) -> Result<Option<SessionPayment>, SessionError>;

    /// Record the quota values a purchase was actually applied with.
    async fn set_payment_limits(
        &self,
        id: DbId,
        previous_limit: i32,
        new_limit: i32,
    ) -> Result<Option<SessionPayment>, SessionError>;

    /// A user's purchases, newest first.
    async fn list_payments(&self, user_id: DbId) -> Result<Vec<SessionPayment>, SessionError>;
}
