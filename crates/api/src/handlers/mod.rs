pub mod admin;
pub mod auth;
pub mod payments;
pub mod sessions;
pub mod users;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// Parse a JSON body that clients may omit entirely.
pub(crate) fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}

/// Run `validator` rules on a request body.
pub(crate) fn validate_input<T: validator::Validate>(input: &T) -> AppResult<()> {
    input.validate().map_err(|e| {
        AppError::Core(igeco_core::error::CoreError::Validation(e.to_string()))
    })
}
