use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::error::ApiError;

/// Error types for turf operations
#[derive(Debug, thiserror::Error)]
pub enum TurfError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Turf {0} not found")]
    NotFound(Uuid),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid operating hours: {0}")]
    InvalidHours(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<TurfError> for ApiError {
    fn from(err: TurfError) -> Self {
        match err {
            TurfError::DatabaseError(e) => ApiError::DatabaseError(e),
            TurfError::NotFound(id) => ApiError::not_found("Turf", id),
            TurfError::Forbidden(msg) => ApiError::Forbidden(msg),
            TurfError::InvalidHours(msg) => ApiError::BadRequest {
                code: "INVALID_HOURS",
                message: msg,
            },
            TurfError::ValidationError(msg) => ApiError::BadRequest {
                code: "VALIDATION_ERROR",
                message: msg,
            },
        }
    }
}

impl IntoResponse for TurfError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
