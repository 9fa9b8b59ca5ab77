//! [`SessionQuotaManager`]: the operations the HTTP layer invokes.

use std::sync::Arc;

use chrono::Utc;
use igeco_core::error::CoreError;
use igeco_core::payments;
use igeco_core::session_quota::{self, active_since};
use igeco_core::types::DbId;
use igeco_db::models::active_session::{ActiveSession, CreateActiveSession, SessionMetadata};
use igeco_db::models::session_payment::{CreateSessionPayment, SessionPayment};
use serde::Serialize;

use super::store::SessionStore;
use super::SessionError;
use crate::auth::jwt::hash_session_token;

/// Result of [`SessionQuotaManager::register_or_refresh`].
#[derive(Debug)]
pub enum Admission {
    /// The token already had a row; its activity was bumped.
    Refreshed(ActiveSession),
    /// A new row was inserted for the token.
    Created(ActiveSession),
    /// The user is at quota. `sessions` lists every active session so the
    /// caller can offer to close one.
    QuotaExceeded {
        max_sessions: i32,
        sessions: Vec<ActiveSession>,
    },
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        !matches!(self, Admission::QuotaExceeded { .. })
    }
}

/// Answer to the periodic client poll.
#[derive(Debug, Clone, Serialize)]
pub struct QuotaStatus {
    pub count: i64,
    pub max_sessions: i32,
    pub allowed: bool,
}

/// A slot purchase as reported by the payment flow.
#[derive(Debug, Clone)]
pub struct RecordPayment {
    pub payment_id: String,
    pub slots: i32,
    /// Decimal amount as reported by the provider, e.g. `"20.00"`.
    pub amount_paid: String,
    pub currency: String,
    pub status: String,
}

pub struct SessionQuotaManager {
    store: Arc<dyn SessionStore>,
}

impl SessionQuotaManager {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    /// Refresh the session for `token`, or open a new one if quota allows.
    ///
    /// A token that already has a row is always admitted, even if the row had
    /// aged out of the activity window. New tokens are admitted while the
    /// active count (taken before the insert) is below `max_sessions`, or
    /// when the quota is unlimited.
    pub async fn register_or_refresh(
        &self,
        user_id: DbId,
        token: &str,
        metadata: SessionMetadata,
    ) -> Result<Admission, SessionError> {
        let token_hash = hash_session_token(token);
        let now = Utc::now();

        if let Some(existing) = self.store.find_session(user_id, &token_hash).await? {
            if let Some(session) = self.store.touch_session(existing.id, &metadata, now).await? {
                tracing::debug!(user_id, session_id = session.id, "Session refreshed");
                return Ok(Admission::Refreshed(session));
            }
            // Closed between the lookup and the update; treat as a new token.
        }

        let max_sessions = self
            .store
            .max_sessions(user_id)
            .await?
            .ok_or(SessionError::UserNotFound(user_id))?;

        self.cleanup_expired_sessions(user_id).await;

        let since = active_since(now);
        let active = self.store.count_active(user_id, since).await?;

        if !session_quota::has_free_slot(active, max_sessions) {
            let sessions = self.store.list_active(user_id, since).await?;
            tracing::info!(
                user_id,
                active,
                max_sessions,
                "Session quota reached, new session refused"
            );
            return Ok(Admission::QuotaExceeded {
                max_sessions,
                sessions,
            });
        }

        let session = self
            .store
            .insert_session(&CreateActiveSession {
                user_id,
                token_hash,
                metadata,
                now,
            })
            .await?;
        tracing::info!(user_id, session_id = session.id, "Session opened");
        Ok(Admission::Created(session))
    }

    /// Number of sessions whose last activity is within the 24-hour window.
    pub async fn count_active_sessions(&self, user_id: DbId) -> Result<i64, SessionError> {
        self.store
            .count_active(user_id, active_since(Utc::now()))
            .await
    }

    /// Whether the current active count is within `max_sessions` (inclusive).
    pub async fn is_admissible(
        &self,
        user_id: DbId,
        max_sessions: i32,
    ) -> Result<bool, SessionError> {
        let count = self.count_active_sessions(user_id).await?;
        Ok(session_quota::is_admissible(count, max_sessions))
    }

    /// Count, stored quota and [`Self::is_admissible`] verdict in one call.
    pub async fn quota_status(&self, user_id: DbId) -> Result<QuotaStatus, SessionError> {
        let max_sessions = self
            .store
            .max_sessions(user_id)
            .await?
            .ok_or(SessionError::UserNotFound(user_id))?;
        let count = self.count_active_sessions(user_id).await?;
        Ok(QuotaStatus {
            count,
            max_sessions,
            allowed: session_quota::is_admissible(count, max_sessions),
        })
    }

    /// Active sessions, most recently used first.
    pub async fn list_active_sessions(
        &self,
        user_id: DbId,
    ) -> Result<Vec<ActiveSession>, SessionError> {
        self.store
            .list_active(user_id, active_since(Utc::now()))
            .await
    }

    /// Close one of the user's sessions.
    ///
    /// Sessions of other users are reported as not found and left alone.
    pub async fn close_session(&self, user_id: DbId, session_id: DbId) -> Result<(), SessionError> {
        if self.store.delete_session(user_id, session_id).await? {
            tracing::info!(user_id, session_id, "Session closed");
            Ok(())
        } else {
            Err(SessionError::SessionNotFound(session_id))
        }
    }

    /// Close every session of the user. Returns how many rows were removed.
    pub async fn close_all_sessions(&self, user_id: DbId) -> Result<u64, SessionError> {
        let closed = self.store.delete_all_sessions(user_id).await?;
        tracing::info!(user_id, closed, "All sessions closed");
        Ok(closed)
    }

    /// Delete rows that have left the activity window. Advisory: failures are
    /// logged and otherwise ignored.
    pub async fn cleanup_expired_sessions(&self, user_id: DbId) {
        match self
            .store
            .delete_stale_sessions(user_id, active_since(Utc::now()))
            .await
        {
            Ok(0) => {}
            Ok(removed) => tracing::debug!(user_id, removed, "Stale sessions removed"),
            Err(err) => tracing::warn!(user_id, error = %err, "Stale session cleanup failed"),
        }
    }

    // -----------------------------------------------------------------------
    // Slot purchases
    // -----------------------------------------------------------------------

    /// Record a slot purchase.
    ///
    /// The record captures the quota before and after the purchase; applying
    /// it rewrites both to the values the quota actually moved between. Only
    /// a `COMPLETED` purchase raises `max_sessions`; anything else is stored
    /// unapplied until [`Self::confirm_payment`].
    pub async fn record_payment(
        &self,
        user_id: DbId,
        input: RecordPayment,
    ) -> Result<SessionPayment, SessionError> {
        let status = payments::normalize_status(&input.status).map_err(invalid_payment)?;
        payments::validate_slots(input.slots).map_err(invalid_payment)?;
        let currency = payments::normalize_currency(&input.currency).map_err(invalid_payment)?;
        let amount_cents =
            payments::parse_amount_cents(&input.amount_paid).map_err(invalid_payment)?;
        if input.payment_id.trim().is_empty() {
            return Err(SessionError::InvalidPayment("Payment id is required".into()));
        }

        if self.store.find_payment(&input.payment_id).await?.is_some() {
            return Err(SessionError::DuplicatePayment(input.payment_id));
        }

        let previous_limit = self
            .store
            .max_sessions(user_id)
            .await?
            .ok_or(SessionError::UserNotFound(user_id))?;
        let new_limit =
            session_quota::raised_limit(previous_limit, input.slots).map_err(invalid_payment)?;

        let payment = self
            .store
            .insert_payment(&CreateSessionPayment {
                user_id,
                payment_id: input.payment_id,
                slots: input.slots,
                amount_cents,
                currency,
                status,
                previous_limit,
                new_limit,
            })
            .await?;
        tracing::info!(
            user_id,
            payment_id = %payment.payment_id,
            status = %payment.status,
            slots = payment.slots,
            "Session payment recorded"
        );

        if payments::is_completed(&payment.status) {
            return self.apply_payment(payment).await;
        }
        Ok(payment)
    }

    /// Apply a previously recorded purchase once the provider confirms it.
    ///
    /// The slots are added to the quota as it stands at confirmation, so
    /// purchases and admin changes made in the meantime are kept.
    ///
    /// Already-applied records are returned unchanged. Records that ended in
    /// a non-completed terminal status cannot be confirmed.
    pub async fn confirm_payment(&self, payment_id: &str) -> Result<SessionPayment, SessionError> {
        let payment = self
            .store
            .find_payment(payment_id)
            .await?
            .ok_or_else(|| SessionError::PaymentNotFound(payment_id.to_string()))?;

        if payment.applied {
            return Ok(payment);
        }
        if !payments::is_pending(&payment.status) && !payments::is_completed(&payment.status) {
            return Err(SessionError::InvalidPayment(format!(
                "Payment {payment_id} ended with status {} and cannot be confirmed",
                payment.status
            )));
        }

        self.apply_payment(payment).await
    }

    /// A user's purchases, newest first.
    pub async fn list_payments(&self, user_id: DbId) -> Result<Vec<SessionPayment>, SessionError> {
        self.store.list_payments(user_id).await
    }

    /// Raise the quota by the purchased slots, relative to the quota at the
    /// moment of applying.
    ///
    /// The record is claimed first; only the caller that flips `applied`
    /// raises the quota.
    async fn apply_payment(&self, payment: SessionPayment) -> Result<SessionPayment, SessionError> {
        let Some(claimed) = self.store.mark_payment_applied(payment.id, Utc::now()).await? else {
            // Applied concurrently by another confirmation.
            return self
                .store
                .find_payment(&payment.payment_id)
                .await?
                .ok_or(SessionError::PaymentNotFound(payment.payment_id));
        };

        let new_limit = self
            .store
            .add_max_sessions(claimed.user_id, claimed.slots)
            .await?
            .ok_or(SessionError::UserNotFound(claimed.user_id))?;
        let previous_limit = new_limit - claimed.slots;

        let applied = self
            .store
            .set_payment_limits(claimed.id, previous_limit, new_limit)
            .await?
            .ok_or_else(|| SessionError::PaymentNotFound(claimed.payment_id.clone()))?;
        tracing::info!(
            user_id = applied.user_id,
            payment_id = %applied.payment_id,
            previous_limit,
            new_limit,
            "Session quota raised"
        );
        Ok(applied)
    }
}

fn invalid_payment(err: CoreError) -> SessionError {
    match err {
        CoreError::Validation(msg) => SessionError::InvalidPayment(msg),
        other => SessionError::InvalidPayment(other.to_string()),
    }
}
