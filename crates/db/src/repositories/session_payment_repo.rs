//! Repository for the `session_payments` table.

use igeco_core::payments::PAYMENT_COMPLETED;
use igeco_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::session_payment::{CreateSessionPayment, SessionPayment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, payment_id, slots, amount_cents, currency, status, \
                        previous_limit, new_limit, applied, completed_at, created_at";

/// Provides insert/lookup/completion for slot purchases.
pub struct SessionPaymentRepo;

impl SessionPaymentRepo {
    /// Insert an unapplied payment record, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSessionPayment,
    ) -> Result<SessionPayment, sqlx::Error> {
        let query = format!(
            "INSERT INTO session_payments
                (user_id, payment_id, slots, amount_cents, currency, status, previous_limit, new_limit)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionPayment>(&query)
            .bind(input.user_id)
            .bind(&input.payment_id)
            .bind(input.slots)
            .bind(input.amount_cents)
            .bind(&input.currency)
            .bind(&input.status)
            .bind(input.previous_limit)
            .bind(input.new_limit)
            .fetch_one(pool)
            .await
    }

    /// Find a record by the provider's payment id.
    pub async fn find_by_payment_id(
        pool: &PgPool,
        payment_id: &str,
    ) -> Result<Option<SessionPayment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM session_payments WHERE payment_id = $1");
        sqlx::query_as::<_, SessionPayment>(&query)
            .bind(payment_id)
            .fetch_optional(pool)
            .await
    }

    /// Mark a record `COMPLETED` and applied.
    ///
    /// Returns `None` if the row does not exist or was already applied.
    pub async fn mark_applied(
        pool: &PgPool,
        id: DbId,
        completed_at: Timestamp,
    ) -> Result<Option<SessionPayment>, sqlx::Error> {
        let query = format!(
            "UPDATE session_payments SET
                status = $2,
                applied = true,
                completed_at = $3
             WHERE id = $1 AND applied = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionPayment>(&query)
            .bind(id)
            .bind(PAYMENT_COMPLETED)
            .bind(completed_at)
            .fetch_optional(pool)
            .await
    }

    /// Overwrite the recorded before/after quota of a purchase.
    pub async fn set_limits(
        pool: &PgPool,
        id: DbId,
        previous_limit: i32,
        new_limit: i32,
    ) -> Result<Option<SessionPayment>, sqlx::Error> {
        let query = format!(
            "UPDATE session_payments SET previous_limit = $2, new_limit = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionPayment>(&query)
            .bind(id)
            .bind(previous_limit)
            .bind(new_limit)
            .fetch_optional(pool)
            .await
    }

    /// List a user's purchases, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<SessionPayment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM session_payments
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, SessionPayment>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
