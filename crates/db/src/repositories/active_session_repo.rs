//! Repository for the `active_sessions` table.
//!
//! Activity thresholds are passed in by the caller so every query measures
//! the 24-hour window from the same instant.

use igeco_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::active_session::{ActiveSession, CreateActiveSession, SessionMetadata};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, token_hash, device_info, ip_address, user_agent, \
                        last_activity, created_at";

/// Provides CRUD operations for active sessions.
pub struct ActiveSessionRepo;

impl ActiveSessionRepo {
    /// Find the session row for a user's token, regardless of age.
    pub async fn find_by_token(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
    ) -> Result<Option<ActiveSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM active_sessions
             WHERE user_id = $1 AND token_hash = $2"
        );
        sqlx::query_as::<_, ActiveSession>(&query)
            .bind(user_id)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Insert a session row.
    ///
    /// A concurrent insert for the same `(user_id, token_hash)` collapses into
    /// a refresh of the existing row instead of a duplicate.
    pub async fn create(
        pool: &PgPool,
        input: &CreateActiveSession,
    ) -> Result<ActiveSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO active_sessions
                (user_id, token_hash, device_info, ip_address, user_agent, last_activity, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             ON CONFLICT ON CONSTRAINT uq_active_sessions_user_token DO UPDATE SET
                device_info = COALESCE(EXCLUDED.device_info, active_sessions.device_info),
                ip_address = COALESCE(EXCLUDED.ip_address, active_sessions.ip_address),
                user_agent = COALESCE(EXCLUDED.user_agent, active_sessions.user_agent),
                last_activity = EXCLUDED.last_activity
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActiveSession>(&query)
            .bind(input.user_id)
            .bind(&input.token_hash)
            .bind(&input.metadata.device_info)
            .bind(&input.metadata.ip_address)
            .bind(&input.metadata.user_agent)
            .bind(input.now)
            .fetch_one(pool)
            .await
    }

    /// Bump `last_activity` and refresh any metadata supplied.
    ///
    /// Returns the updated row, or `None` if it was deleted meanwhile.
    pub async fn touch(
        pool: &PgPool,
        id: DbId,
        metadata: &SessionMetadata,
        now: Timestamp,
    ) -> Result<Option<ActiveSession>, sqlx::Error> {
        let query = format!(
            "UPDATE active_sessions SET
                device_info = COALESCE($2, device_info),
                ip_address = COALESCE($3, ip_address),
                user_agent = COALESCE($4, user_agent),
                last_activity = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActiveSession>(&query)
            .bind(id)
            .bind(&metadata.device_info)
            .bind(&metadata.ip_address)
            .bind(&metadata.user_agent)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Count the user's sessions with `last_activity` strictly after `since`.
    pub async fn count_active(
        pool: &PgPool,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM active_sessions WHERE user_id = $1 AND last_activity > $2",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// List the user's sessions with `last_activity` strictly after `since`,
    /// most recently used first.
    pub async fn list_active(
        pool: &PgPool,
        user_id: DbId,
        since: Timestamp,
    ) -> Result<Vec<ActiveSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM active_sessions
             WHERE user_id = $1 AND last_activity > $2
             ORDER BY last_activity DESC, id DESC"
        );
        sqlx::query_as::<_, ActiveSession>(&query)
            .bind(user_id)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Delete one session, but only if it belongs to `user_id`.
    /// Returns `true` if a row was deleted.
    pub async fn delete_for_user(
        pool: &PgPool,
        user_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM active_sessions WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every session of a user. Returns the count of deleted rows.
    pub async fn delete_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM active_sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete the user's sessions last seen at or before `before`.
    /// Returns the count of deleted rows.
    pub async fn delete_stale_for_user(
        pool: &PgPool,
        user_id: DbId,
        before: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM active_sessions WHERE user_id = $1 AND last_activity <= $2")
                .bind(user_id)
                .bind(before)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
