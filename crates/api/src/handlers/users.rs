//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::Json;
use igeco_core::error::CoreError;
use igeco_db::models::user::UserResponse;
use igeco_db::repositories::UserRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::session::SessionGuard;
use crate::response::DataResponse;
use crate::sessions::QuotaStatus;
use crate::state::AppState;

/// Profile plus current session usage.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserResponse,
    pub sessions: QuotaStatus,
}

/// GET /api/v1/users/me
///
/// Guarded by [`SessionGuard`], so a caller whose token would exceed the
/// quota gets 409 instead of the profile.
pub async fn me(
    State(state): State<AppState>,
    SessionGuard(auth_user): SessionGuard,
) -> AppResult<Json<DataResponse<MeResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", auth_user.user_id)))?;
    let sessions = state.sessions.quota_status(auth_user.user_id).await?;

    Ok(Json(DataResponse {
        data: MeResponse {
            user: user.into(),
            sessions,
        },
    }))
}
