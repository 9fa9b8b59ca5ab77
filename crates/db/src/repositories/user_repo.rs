//! Repository for the `users` table.

use igeco_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateQuotas, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, role, full_name, company, phone, \
                        max_sessions, max_exhibitors, is_active, last_login_at, created_at, updated_at";

/// Provides user lookups and quota updates.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, role, max_sessions)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.role)
            .bind(input.max_sessions)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Read only the session quota. `None` if the user does not exist.
    pub async fn max_sessions(pool: &PgPool, id: DbId) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT max_sessions FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(max,)| max))
    }

    /// Raise the session quota by `slots` in place, returning the new value.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn add_max_sessions(
        pool: &PgPool,
        id: DbId,
        slots: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            "UPDATE users SET max_sessions = max_sessions + $2 WHERE id = $1
             RETURNING max_sessions",
        )
        .bind(id)
        .bind(slots)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(max,)| max))
    }

    /// Update quotas. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_quotas(
        pool: &PgPool,
        id: DbId,
        input: &UpdateQuotas,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                max_sessions = COALESCE($2, max_sessions),
                max_exhibitors = COALESCE($3, max_exhibitors)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(input.max_sessions)
            .bind(input.max_exhibitors)
            .fetch_optional(pool)
            .await
    }

    /// Stamp `last_login_at` after a successful password check.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
