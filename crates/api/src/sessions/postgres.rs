//! [`SessionStore`] backed by PostgreSQL through the `igeco_db` repositories.

use async_trait::async_trait;
use igeco_core::types::{DbId, Timestamp};
use igeco_db::models::active_session::{ActiveSession, CreateActiveSession, SessionMetadata};
use igeco_db::models::session_payment::{CreateSessionPayment, SessionPayment};
use igeco_db::repositories::{ActiveSessionRepo, SessionPaymentRepo, UserRepo};
use igeco_db::DbPool;

use super::store::SessionStore;
use super::SessionError;

/// PostgreSQL unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// Production session store. Cheap to clone (the pool is reference-counted).
#[derive(Clone)]
pub struct PgSessionStore {
    pool: DbPool,
}

impl PgSessionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn max_sessions(&self, user_id: DbId) -> Result<Option<i32>, SessionError> {
        Ok(UserRepo::max_sessions(&self.pool, user_id).await?)
    }

    async fn add_max_sessions(
        &self,
        user_id: DbId,
        slots: i32,
    ) -> Result<Option<i32>, SessionError> {
        Ok(UserRepo::add_max_sessions(&self.pool, user_id, slots).await?)
    }

    async fn find_session(
        &self,
        user_id: DbId,
        token_hash: &str,
    ) -> Result<Option<ActiveSession>, SessionError> {
        Ok(ActiveSessionRepo::find_by_token(&self.pool, user_id, token_hash).await?)
    }

    async fn insert_session(
        &self,
        input: &CreateActiveSession,
    ) -> Result<ActiveSession, SessionError> {
        Ok(ActiveSessionRepo::create(&self.pool, input).await?)
    }

    async fn touch_session(
        &self,
        session_id: DbId,
        metadata: &SessionMetadata,
        now: Timestamp,
    ) -> Result<Option<ActiveSession>, SessionError> {
        Ok(ActiveSessionRepo::touch(&self.pool, session_id, metadata, now).await?)
    }

    async fn count_active(&self, user_id: DbId, since: Timestamp) -> Result<i64, SessionError> {
        Ok(ActiveSessionRepo::count_active(&self.pool, user_id, since).await?)
    }

    async fn list_active(
        &self,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<ActiveSession>, SessionError> {
        Ok(ActiveSessionRepo::list_active(&self.pool, user_id, since).await?)
    }

    async fn delete_session(&self, user_id: DbId, session_id: DbId) -> Result<bool, SessionError> {
        Ok(ActiveSessionRepo::delete_for_user(&self.pool, user_id, session_id).await?)
    }

    async fn delete_all_sessions(&self, user_id: DbId) -> Result<u64, SessionError> {
        Ok(ActiveSessionRepo::delete_all_for_user(&self.pool, user_id).await?)
    }

    async fn delete_stale_sessions(
        &self,
        user_id: DbId,
        before: Timestamp,
    ) -> Result<u64, SessionError> {
        Ok(ActiveSessionRepo::delete_stale_for_user(&self.pool, user_id, before).await?)
    }

    async fn insert_payment(
        &self,
        input: &CreateSessionPayment,
    ) -> Result<SessionPayment, SessionError> {
        match SessionPaymentRepo::create(&self.pool, input).await {
            Ok(payment) => Ok(payment),
            Err(sqlx::Error::Database(db_err))
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                Err(SessionError::DuplicatePayment(input.payment_id.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_payment(&self, payment_id: &str) -> Result<Option<SessionPayment>, SessionError> {
        Ok(SessionPaymentRepo::find_by_payment_id(&self.pool, payment_id).await?)
    }

    async fn mark_payment_applied(
        &self,
        id: DbId,
        completed_at: Timestamp,
    ) -> Result<Option<SessionPayment>, SessionError> {
        Ok(SessionPaymentRepo::mark_applied(&self.pool, id, completed_at).await?)
    }

    async fn set_payment_limits(
        &self,
        id: DbId,
        previous_limit: i32,
        new_limit: i32,
    ) -> Result<Option<SessionPayment>, SessionError> {
        Ok(SessionPaymentRepo::set_limits(&self.pool, id, previous_limit, new_limit).await?)
    }

    async fn list_payments(&self, user_id: DbId) -> Result<Vec<SessionPayment>, SessionError> {
        Ok(SessionPaymentRepo::list_for_user(&self.pool, user_id).await?)
    }
}
