//! In-process [`SessionStore`].
//!
//! Used by the test suites and for running the server without PostgreSQL.
//! Semantics match [`super::PgSessionStore`]: unique `(user, token)` rows,
//! unique provider payment ids, and the same activity comparisons.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use igeco_core::payments::PAYMENT_COMPLETED;
use igeco_core::types::{DbId, Timestamp};
use igeco_db::models::active_session::{ActiveSession, CreateActiveSession, SessionMetadata};
use igeco_db::models::session_payment::{CreateSessionPayment, SessionPayment};
use tokio::sync::RwLock;

use super::store::SessionStore;
use super::SessionError;

#[derive(Default)]
pub struct MemorySessionStore {
    /// `user_id -> max_sessions`
    users: RwLock<HashMap<DbId, i32>>,
    sessions: RwLock<HashMap<DbId, ActiveSession>>,
    payments: RwLock<HashMap<DbId, SessionPayment>>,
    next_id: AtomicI64,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with the given quota (replacing any previous quota).
    pub async fn add_user(&self, user_id: DbId, max_sessions: i32) {
        self.users.write().await.insert(user_id, max_sessions);
    }

    fn allocate_id(&self) -> DbId {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

fn apply_metadata(session: &mut ActiveSession, metadata: &SessionMetadata) {
    if let Some(device_info) = &metadata.device_info {
        session.device_info = Some(device_info.clone());
    }
    if let Some(ip_address) = &metadata.ip_address {
        session.ip_address = Some(ip_address.clone());
    }
    if let Some(user_agent) = &metadata.user_agent {
        session.user_agent = Some(user_agent.clone());
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn max_sessions(&self, user_id: DbId) -> Result<Option<i32>, SessionError> {
        Ok(self.users.read().await.get(&user_id).copied())
    }

    async fn add_max_sessions(
        &self,
        user_id: DbId,
        slots: i32,
    ) -> Result<Option<i32>, SessionError> {
        let mut users = self.users.write().await;
        let Some(max) = users.get_mut(&user_id) else {
            return Ok(None);
        };
        *max = max
            .checked_add(slots)
            .ok_or_else(|| SessionError::InvalidPayment("Session quota overflow".into()))?;
        Ok(Some(*max))
    }

    async fn find_session(
        &self,
        user_id: DbId,
        token_hash: &str,
    ) -> Result<Option<ActiveSession>, SessionError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .find(|s| s.user_id == user_id && s.token_hash == token_hash)
            .cloned())
    }

    async fn insert_session(
        &self,
        input: &CreateActiveSession,
    ) -> Result<ActiveSession, SessionError> {
        let mut sessions = self.sessions.write().await;

        if let Some(existing) = sessions
            .values_mut()
            .find(|s| s.user_id == input.user_id && s.token_hash == input.token_hash)
        {
            apply_metadata(existing, &input.metadata);
            existing.last_activity = input.now;
            return Ok(existing.clone());
        }

        let session = ActiveSession {
            id: self.allocate_id(),
            user_id: input.user_id,
            token_hash: input.token_hash.clone(),
            device_info: input.metadata.device_info.clone(),
            ip_address: input.metadata.ip_address.clone(),
            user_agent: input.metadata.user_agent.clone(),
            last_activity: input.now,
            created_at: input.now,
        };
        sessions.insert(session.id, session.clone());
        Ok(session)
    }

    async fn touch_session(
        &self,
        session_id: DbId,
        metadata: &SessionMetadata,
        now: Timestamp,
    ) -> Result<Option<ActiveSession>, SessionError> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.get_mut(&session_id).map(|session| {
            apply_metadata(session, metadata);
            session.last_activity = now;
            session.clone()
        }))
    }

    async fn count_active(&self, user_id: DbId, since: Timestamp) -> Result<i64, SessionError> {
        let sessions = self.sessions.read().await;
        let count = sessions
            .values()
            .filter(|s| s.user_id == user_id && s.last_activity > since)
            .count();
        Ok(count as i64)
    }

    async fn list_active(
        &self,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<ActiveSession>, SessionError> {
        let sessions = self.sessions.read().await;
        let mut active: Vec<ActiveSession> = sessions
            .values()
            .filter(|s| s.user_id == user_id && s.last_activity > since)
            .cloned()
            .collect();
        active.sort_by(|a, b| {
            b.last_activity
                .cmp(&a.last_activity)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(active)
    }

    async fn delete_session(&self, user_id: DbId, session_id: DbId) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.write().await;
        let owned = sessions
            .get(&session_id)
            .is_some_and(|s| s.user_id == user_id);
        if owned {
            sessions.remove(&session_id);
        }
        Ok(owned)
    }

    async fn delete_all_sessions(&self, user_id: DbId) -> Result<u64, SessionError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.user_id != user_id);
        Ok((before - sessions.len()) as u64)
    }

    async fn delete_stale_sessions(
        &self,
        user_id: DbId,
        before: Timestamp,
    ) -> Result<u64, SessionError> {
        let mut sessions = self.sessions.write().await;
        let len = sessions.len();
        sessions.retain(|_, s| !(s.user_id == user_id && s.last_activity <= before));
        Ok((len - sessions.len()) as u64)
    }

    async fn insert_payment(
        &self,
        input: &CreateSessionPayment,
    ) -> Result<SessionPayment, SessionError> {
        let mut payments = self.payments.write().await;
        if payments.values().any(|p| p.payment_id == input.payment_id) {
            return Err(SessionError::DuplicatePayment(input.payment_id.clone()));
        }

        let payment = SessionPayment {
            id: self.allocate_id(),
            user_id: input.user_id,
            payment_id: input.payment_id.clone(),
            slots: input.slots,
            amount_cents: input.amount_cents,
            currency: input.currency.clone(),
            status: input.status.clone(),
            previous_limit: input.previous_limit,
            new_limit: input.new_limit,
            applied: false,
            completed_at: None,
            created_at: chrono::Utc::now(),
        };
        payments.insert(payment.id, payment.clone());
        Ok(payment)
    }

    async fn find_payment(&self, payment_id: &str) -> Result<Option<SessionPayment>, SessionError> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .find(|p| p.payment_id == payment_id)
            .cloned())
    }

    async fn mark_payment_applied(
        &self,
        id: DbId,
        completed_at: Timestamp,
    ) -> Result<Option<SessionPayment>, SessionError> {
        let mut payments = self.payments.write().await;
        Ok(payments
            .get_mut(&id)
            .filter(|p| !p.applied)
            .map(|payment| {
                payment.status = PAYMENT_COMPLETED.to_string();
                payment.applied = true;
                payment.completed_at = Some(completed_at);
                payment.clone()
            }))
    }

    async fn set_payment_limits(
        &self,
        id: DbId,
        previous_limit: i32,
        new_limit: i32,
    ) -> Result<Option<SessionPayment>, SessionError> {
        let mut payments = self.payments.write().await;
        Ok(payments.get_mut(&id).map(|payment| {
            payment.previous_limit = previous_limit;
            payment.new_limit = new_limit;
            payment.clone()
        }))
    }

    async fn list_payments(&self, user_id: DbId) -> Result<Vec<SessionPayment>, SessionError> {
        let payments = self.payments.read().await;
        let mut listed: Vec<SessionPayment> = payments
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(listed)
    }
}
