//! Handlers for the `/auth` resource (login, logout).

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use igeco_core::error::CoreError;
use igeco_db::models::active_session::SessionSummary;
use igeco_db::models::user::UserResponse;
use igeco_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_input;
use crate::auth::cookie::{auth_cookie, expired_auth_cookie};
use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::client::ClientInfo;
use crate::sessions::{summarize_sessions, Admission};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 100))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Optional client-chosen label for the new session.
    #[validate(length(max = 255))]
    pub device_info: Option<String>,
}

/// Successful authentication response.
///
/// `admitted == false` means the session quota is full. The token is still
/// returned so the client can close one of `sessions_to_close` and retry.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
    pub admitted: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sessions_to_close: Vec<SessionSummary>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/login
///
/// Verify username + password, issue a token (also set as an HttpOnly
/// cookie) and register the session against the user's quota.
pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    validate_input(&input)?;

    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Login rejected: bad password");
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let access_token =
        generate_access_token(user.id, &user.role, user.max_sessions, &state.config.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let metadata = client.with_device_info(input.device_info);
    let admission = state
        .sessions
        .register_or_refresh(user.id, &access_token, metadata)
        .await?;

    let sessions_to_close = match &admission {
        Admission::QuotaExceeded { sessions, .. } => {
            summarize_sessions(sessions, &access_token)
        }
        Admission::Created(_) | Admission::Refreshed(_) => Vec::new(),
    };
    tracing::info!(
        user_id = user.id,
        admitted = admission.is_admitted(),
        "User logged in"
    );

    let expires_in = state.config.jwt.expires_in_secs();
    let cookie = auth_cookie(
        &state.config.auth_cookie_name,
        &access_token,
        expires_in,
        state.config.auth_cookie_secure,
    );

    Ok((
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            access_token,
            expires_in,
            user: user.into(),
            admitted: admission.is_admitted(),
            sessions_to_close,
        }),
    ))
}

/// POST /api/v1/auth/logout
///
/// Close every session of the caller and expire the auth cookie.
/// Returns 204 No Content.
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    state.sessions.close_all_sessions(auth_user.user_id).await?;
    Ok((
        StatusCode::NO_CONTENT,
        [(
            SET_COOKIE,
            expired_auth_cookie(
                &state.config.auth_cookie_name,
                state.config.auth_cookie_secure,
            ),
        )],
    ))
}
