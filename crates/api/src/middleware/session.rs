//! Quota-enforcing extractor for protected routes.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::auth::AuthUser;
use super::client::client_metadata;
use crate::error::AppError;
use crate::sessions::{summarize_sessions, Admission};
use crate::state::AppState;

/// An authenticated caller whose session is within quota.
///
/// Extracting this registers or refreshes the caller's session (the
/// heartbeat). When the caller's token is new and the quota is full the
/// request is rejected with 409 and the list of sessions to close.
pub struct SessionGuard(pub AuthUser);

impl FromRequestParts<AppState> for SessionGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        let metadata = client_metadata(&parts.headers);

        match state
            .sessions
            .register_or_refresh(user.user_id, &user.token, metadata)
            .await?
        {
            Admission::QuotaExceeded {
                max_sessions,
                sessions,
            } => Err(AppError::QuotaExceeded {
                max_sessions,
                sessions: summarize_sessions(&sessions, &user.token),
            }),
            Admission::Created(_) | Admission::Refreshed(_) => Ok(SessionGuard(user)),
        }
    }
}
