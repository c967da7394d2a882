// Error handling module for the Turf Booking API
// Provides centralized error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};
use utoipa::ToSchema;

/// Main error type for the API
/// All module errors convert into this type before becoming a response
///
/// Each variant maps to a specific HTTP status code and a stable
/// machine-readable `error_code`.
#[derive(Debug)]
pub enum ApiError {
    /// Validation errors from request validation
    /// Maps to HTTP 400 Bad Request
    ValidationError(validator::ValidationErrors),

    /// Domain rule rejected the request (duration, hours, rating, interval)
    /// Maps to HTTP 400 Bad Request
    BadRequest { code: &'static str, message: String },

    /// Resource not found by ID
    /// Maps to HTTP 404 Not Found
    NotFound { resource: String, id: String },

    /// Something the request depends on is absent (e.g. an unset rate)
    /// Maps to HTTP 404 Not Found with the message passed through
    Missing { code: &'static str, message: String },

    /// State conflict (overlapping slot, duplicate review, already cancelled)
    /// Maps to HTTP 409 Conflict
    Conflict { code: &'static str, message: String },

    /// Bookings are switched off for a turf
    /// Maps to HTTP 503 Service Unavailable
    Unavailable { message: String },

    /// Database operation errors
    /// Maps to HTTP 500 Internal Server Error
    /// Sensitive details are filtered from client responses
    DatabaseError(sqlx::Error),

    /// Internal server errors
    /// Maps to HTTP 500 Internal Server Error
    InternalError(String),

    /// Authentication failures
    /// Maps to HTTP 401 Unauthorized
    Unauthorized(String),

    /// Role or ownership mismatch
    /// Maps to HTTP 403 Forbidden
    Forbidden(String),
}

/// Consistent error response structure
///
/// Every error leaving the API has this shape. `error_code` is the stable
/// machine-readable kind, `message` is safe to show to end users.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "VALIDATION_ERROR", "SLOT_TAKEN")
    pub error_code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional details (e.g., field-level validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// RFC 3339 timestamp of when the error occurred
    pub timestamp: String,
}

impl ErrorResponse {
    fn new(error_code: &str, message: String) -> Self {
        Self {
            error_code: error_code.to_string(),
            message,
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = self.to_error_response();
        (status, Json(error_response)).into_response()
    }
}

impl ApiError {
    /// Shorthand for a 404 on a typed id
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    /// Convert ApiError to HTTP status code and ErrorResponse
    ///
    /// Logging follows severity:
    /// - error!: storage and internal failures (500-level)
    /// - warn!: conflicts and access violations
    /// - debug!: expected client errors (validation, not found)
    pub(crate) fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);

                let mut response =
                    ErrorResponse::new("VALIDATION_ERROR", "Request validation failed".to_string());
                response.details =
                    Some(serde_json::to_value(errors).unwrap_or(serde_json::json!({})));
                (StatusCode::BAD_REQUEST, response)
            }
            ApiError::BadRequest { code, message } => {
                debug!("Bad request ({}): {}", code, message);
                (StatusCode::BAD_REQUEST, ErrorResponse::new(code, message.clone()))
            }
            ApiError::NotFound { resource, id } => {
                debug!("Resource not found: {} with id {}", resource, id);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("NOT_FOUND", format!("{} with id {} not found", resource, id)),
                )
            }
            ApiError::Missing { code, message } => {
                debug!("Missing ({}): {}", code, message);
                (StatusCode::NOT_FOUND, ErrorResponse::new(code, message.clone()))
            }
            ApiError::Conflict { code, message } => {
                warn!("Conflict error ({}): {}", code, message);
                (StatusCode::CONFLICT, ErrorResponse::new(code, message.clone()))
            }
            ApiError::Unavailable { message } => {
                debug!("Bookings unavailable: {}", message);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorResponse::new("BOOKINGS_DISABLED", message.clone()),
                )
            }
            ApiError::DatabaseError(db_error) => {
                // Full error stays in the logs only
                error!("Database error: {:?}", db_error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("DATABASE_ERROR", "A database error occurred".to_string()),
                )
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "INTERNAL_ERROR",
                        "An internal server error occurred".to_string(),
                    ),
                )
            }
            ApiError::Unauthorized(message) => {
                warn!("Unauthorized access attempt: {}", message);
                (StatusCode::UNAUTHORIZED, ErrorResponse::new("UNAUTHORIZED", message.clone()))
            }
            ApiError::Forbidden(message) => {
                warn!("Forbidden access attempt: {}", message);
                (StatusCode::FORBIDDEN, ErrorResponse::new("FORBIDDEN", message.clone()))
            }
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Missing { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    /// Machine-readable code carried in the response body
    pub fn error_code(&self) -> &str {
        match self {
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::BadRequest { code, .. } => code,
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::Missing { code, .. } => code,
            ApiError::Conflict { code, .. } => code,
            ApiError::Unavailable { .. } => "BOOKINGS_DISABLED",
            ApiError::DatabaseError(_) => "DATABASE_ERROR",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
        }
    }
}

/// Convert sqlx errors to ApiError
impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::DatabaseError(error)
    }
}

/// Convert validator errors to ApiError
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

/// Postgres SQLSTATE for an exclusion constraint violation
pub const EXCLUSION_VIOLATION: &str = "23P01";

/// True when a sqlx error is an exclusion constraint violation
pub fn is_exclusion_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.code().as_deref() == Some(EXCLUSION_VIOLATION);
    }
    false
}

/// True when a sqlx error is a unique constraint violation
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        return db_err.is_unique_violation();
    }
    false
}
