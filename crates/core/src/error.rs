//! Domain error type shared by every crate in the workspace.

/// Errors raised by domain rules.
///
/// The API layer maps each variant to an HTTP status; see
/// `igeco_api::error::AppError`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The referenced entity does not exist (or is not visible to the caller).
    ///
    /// `id` is a string so external identifiers (payment ids) fit as well.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Missing or invalid credential. Callers must re-authenticate.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`] with any displayable id.
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}
