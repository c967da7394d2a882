use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::error::ApiError;
use crate::turfs::TurfError;

/// Error types for settings operations
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Turf {0} not found")]
    TurfNotFound(Uuid),

    #[error("Setting {key} not found for turf {turf_id}")]
    NotFound { turf_id: Uuid, key: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

impl From<TurfError> for SettingsError {
    fn from(err: TurfError) -> Self {
        match err {
            TurfError::DatabaseError(e) => SettingsError::DatabaseError(e),
            TurfError::NotFound(id) => SettingsError::TurfNotFound(id),
            TurfError::Forbidden(msg) => SettingsError::Forbidden(msg),
            other => SettingsError::InvalidValue(other.to_string()),
        }
    }
}

impl From<SettingsError> for ApiError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::DatabaseError(e) => ApiError::DatabaseError(e),
            SettingsError::TurfNotFound(id) => ApiError::not_found("Turf", id),
            SettingsError::NotFound { turf_id, key } => ApiError::NotFound {
                resource: "Setting".to_string(),
                id: format!("{}/{}", turf_id, key),
            },
            SettingsError::Forbidden(msg) => ApiError::Forbidden(msg),
            SettingsError::InvalidValue(msg) => ApiError::BadRequest {
                code: "INVALID_SETTING",
                message: msg,
            },
        }
    }
}

impl IntoResponse for SettingsError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
