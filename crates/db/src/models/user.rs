//! User entity model and DTOs.

use igeco_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub full_name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    /// Concurrent-session quota. `0` means unlimited.
    pub max_sessions: i32,
    pub max_exhibitors: i32,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub full_name: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub max_sessions: i32,
    pub max_exhibitors: i32,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            full_name: user.full_name,
            company: user.company,
            phone: user.phone,
            max_sessions: user.max_sessions,
            max_exhibitors: user.max_exhibitors,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub max_sessions: i32,
}

/// DTO for the admin quota update. `None` fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateQuotas {
    pub max_sessions: Option<i32>,
    pub max_exhibitors: Option<i32>,
}
