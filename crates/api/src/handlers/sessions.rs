//! Handlers for the `/sessions` resource: heartbeat, quota poll and the
//! "manage sessions" view.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use igeco_core::types::DbId;
use igeco_db::models::active_session::SessionSummary;
use serde::{Deserialize, Serialize};

use super::optional_json;
use crate::auth::cookie::expired_auth_cookie;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::client::ClientInfo;
use crate::response::DataResponse;
use crate::sessions::{summarize_sessions, Admission, QuotaStatus, SessionError};
use crate::state::AppState;

/// Optional body of `POST /sessions/heartbeat`.
#[derive(Debug, Default, Deserialize)]
pub struct HeartbeatRequest {
    pub device_info: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HeartbeatResponse {
    pub admitted: bool,
    /// Row id of the caller's session when admitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_sessions: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sessions_to_close: Vec<SessionSummary>,
}

#[derive(Debug, Serialize)]
pub struct CloseSessionResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CloseAllResponse {
    pub success: bool,
    pub closed: u64,
}

/// POST /api/v1/sessions/heartbeat
///
/// Register or refresh the caller's session. Over quota the response is
/// `admitted: false` with the sessions the caller may close.
pub async fn heartbeat(
    State(state): State<AppState>,
    auth_user: AuthUser,
    client: ClientInfo,
    body: Bytes,
) -> AppResult<Json<HeartbeatResponse>> {
    let input: HeartbeatRequest = optional_json(&body)?;
    let metadata = client.with_device_info(input.device_info);

    let response = match state
        .sessions
        .register_or_refresh(auth_user.user_id, &auth_user.token, metadata)
        .await?
    {
        Admission::Created(session) | Admission::Refreshed(session) => HeartbeatResponse {
            admitted: true,
            session_id: Some(session.id),
            max_sessions: None,
            sessions_to_close: Vec::new(),
        },
        Admission::QuotaExceeded {
            max_sessions,
            sessions,
        } => HeartbeatResponse {
            admitted: false,
            session_id: None,
            max_sessions: Some(max_sessions),
            sessions_to_close: summarize_sessions(&sessions, &auth_user.token),
        },
    };

    Ok(Json(response))
}

/// GET /api/v1/sessions/count
///
/// The periodic client poll: active count, stored quota and whether the
/// count is within it.
pub async fn count(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<QuotaStatus>> {
    let status = state.sessions.quota_status(auth_user.user_id).await?;
    Ok(Json(status))
}

/// GET /api/v1/sessions
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<SessionSummary>>>> {
    let sessions = state
        .sessions
        .list_active_sessions(auth_user.user_id)
        .await?;
    Ok(Json(DataResponse {
        data: summarize_sessions(&sessions, &auth_user.token),
    }))
}

/// DELETE /api/v1/sessions/{id}
///
/// Close one of the caller's sessions. Another user's session id answers
/// 404 exactly like a missing one.
pub async fn close(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(session_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    match state
        .sessions
        .close_session(auth_user.user_id, session_id)
        .await
    {
        Ok(()) => Ok((
            StatusCode::OK,
            Json(CloseSessionResponse {
                success: true,
                error: None,
            }),
        )),
        Err(SessionError::SessionNotFound(_)) => Ok((
            StatusCode::NOT_FOUND,
            Json(CloseSessionResponse {
                success: false,
                error: Some("Session not found".into()),
            }),
        )),
        Err(err) => Err(err.into()),
    }
}

/// DELETE /api/v1/sessions
///
/// Close every session of the caller, including the current one, and
/// expire the auth cookie.
pub async fn close_all(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let closed = state
        .sessions
        .close_all_sessions(auth_user.user_id)
        .await?;
    Ok((
        [(
            SET_COOKIE,
            expired_auth_cookie(
                &state.config.auth_cookie_name,
                state.config.auth_cookie_secure,
            ),
        )],
        Json(CloseAllResponse {
            success: true,
            closed,
        }),
    ))
}
