//! Handlers for session-slot purchases under `/sessions/payments`.
//!
//! The payment provider is verified upstream; these endpoints only record
//! the outcome and apply it to the quota.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use igeco_db::models::session_payment::SessionPayment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_input;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::sessions::RecordPayment;
use crate::state::AppState;

/// Request body for `POST /sessions/payments`.
#[derive(Debug, Deserialize, Validate)]
pub struct RecordPaymentRequest {
    #[validate(length(min = 1, max = 128))]
    pub payment_id: String,
    /// Range-checked against `MAX_SLOTS_PER_PURCHASE` by the manager.
    pub slots: i32,
    /// Decimal string, e.g. `"20.00"`.
    #[validate(length(min = 1, max = 32))]
    pub amount_paid: String,
    #[validate(length(min = 1, max = 8))]
    pub currency: String,
    #[validate(length(min = 1, max = 32))]
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub success: bool,
    pub payment: SessionPayment,
}

/// POST /api/v1/sessions/payments
///
/// Record a purchase for the caller. A `COMPLETED` purchase raises the quota
/// immediately; other statuses are stored for later confirmation.
pub async fn record(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<RecordPaymentRequest>,
) -> AppResult<(StatusCode, Json<PaymentResponse>)> {
    validate_input(&input)?;

    let payment = state
        .sessions
        .record_payment(
            auth_user.user_id,
            RecordPayment {
                payment_id: input.payment_id,
                slots: input.slots,
                amount_paid: input.amount_paid,
                currency: input.currency,
                status: input.status,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PaymentResponse {
            success: true,
            payment,
        }),
    ))
}

/// GET /api/v1/sessions/payments
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<SessionPayment>>>> {
    let payments = state.sessions.list_payments(auth_user.user_id).await?;
    Ok(Json(DataResponse { data: payments }))
}

/// POST /api/v1/sessions/payments/{payment_id}/confirm
///
/// Provider confirmation of a pending purchase. Admin only; confirming an
/// applied purchase again returns it unchanged.
pub async fn confirm(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(payment_id): Path<String>,
) -> AppResult<Json<PaymentResponse>> {
    let payment = state.sessions.confirm_payment(&payment_id).await?;
    tracing::info!(
        admin_id = admin.user_id,
        payment_id = %payment.payment_id,
        "Session payment confirmed"
    );
    Ok(Json(PaymentResponse {
        success: true,
        payment,
    }))
}
