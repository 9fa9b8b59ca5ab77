//! Handlers for the `/admin` resource.
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::Json;
use igeco_core::error::CoreError;
use igeco_core::session_quota::{validate_max_sessions, MAX_ASSIGNABLE_SESSIONS};
use igeco_core::types::DbId;
use igeco_db::models::user::{UpdateQuotas, UserResponse};
use igeco_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use super::validate_input;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /admin/users/{id}/quotas`. Omitted fields keep
/// their current value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuotasRequest {
    /// `0` means unlimited.
    pub max_sessions: Option<i32>,
    #[validate(range(min = 0))]
    pub max_exhibitors: Option<i32>,
}

/// PUT /api/v1/admin/users/{id}/quotas
pub async fn update_quotas(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<DbId>,
    Json(input): Json<UpdateQuotasRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    validate_input(&input)?;
    if let Some(max_sessions) = input.max_sessions {
        validate_max_sessions(max_sessions)?;
    }
    if input.max_sessions.is_none() && input.max_exhibitors.is_none() {
        return Err(AppError::BadRequest(format!(
            "Provide max_sessions (0..={MAX_ASSIGNABLE_SESSIONS}) and/or max_exhibitors"
        )));
    }

    let update = UpdateQuotas {
        max_sessions: input.max_sessions,
        max_exhibitors: input.max_exhibitors,
    };
    let user = UserRepo::update_quotas(&state.pool, user_id, &update)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("User", user_id)))?;

    tracing::info!(
        admin_id = admin.user_id,
        user_id,
        max_sessions = user.max_sessions,
        max_exhibitors = user.max_exhibitors,
        "User quotas updated"
    );
    Ok(Json(DataResponse { data: user.into() }))
}
