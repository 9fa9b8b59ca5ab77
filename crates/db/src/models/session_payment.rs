//! Session-slot purchase audit record.

use igeco_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `session_payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionPayment {
    pub id: DbId,
    pub user_id: DbId,
    /// Identifier assigned by the payment provider.
    pub payment_id: String,
    pub slots: i32,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    /// `max_sessions` at the time the purchase was recorded.
    pub previous_limit: i32,
    /// `previous_limit + slots`; becomes `max_sessions` once applied.
    pub new_limit: i32,
    pub applied: bool,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for inserting a payment record. Records are always inserted
/// unapplied; completion is a separate update.
#[derive(Debug, Clone)]
pub struct CreateSessionPayment {
    pub user_id: DbId,
    pub payment_id: String,
    pub slots: i32,
    pub amount_cents: i64,
    pub currency: String,
    pub status: String,
    pub previous_limit: i32,
    pub new_limit: i32,
}
