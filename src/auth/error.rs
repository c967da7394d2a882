// Authentication and authorization error types

use axum::response::{IntoResponse, Response};
use std::fmt;

use crate::auth::models::Role;
use crate::error::ApiError;

/// Authentication and authorization error types
#[derive(Debug)]
pub enum AuthError {
    // Authentication errors
    ValidationError(String),
    InvalidCredentials,
    InvalidToken,
    ExpiredToken,
    MissingToken,
    EmailAlreadyExists,
    UserNotFound,
    DatabaseError(sqlx::Error),
    PasswordHashError,
    InvalidPasswordFormat(String),
    TokenGenerationError(String),

    // Authorization errors
    /// User lacks the role required for the operation
    InsufficientPermissions {
        required: Role,
        actual: Role,
    },
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::ExpiredToken => write!(f, "Token has expired"),
            AuthError::MissingToken => write!(f, "Missing authentication token"),
            AuthError::EmailAlreadyExists => write!(f, "Email already exists"),
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::DatabaseError(e) => write!(f, "Database error: {}", e),
            AuthError::PasswordHashError => write!(f, "Password hashing error"),
            AuthError::InvalidPasswordFormat(msg) => write!(f, "Invalid password: {}", msg),
            AuthError::TokenGenerationError(msg) => write!(f, "Token generation error: {}", msg),
            AuthError::InsufficientPermissions { required, actual } => write!(
                f,
                "Insufficient permissions: required role '{}', but user has role '{}'",
                required, actual
            ),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::DatabaseError(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ValidationError(msg) | AuthError::InvalidPasswordFormat(msg) => {
                ApiError::BadRequest {
                    code: "VALIDATION_ERROR",
                    message: msg,
                }
            }
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::ExpiredToken
            | AuthError::MissingToken => ApiError::Unauthorized(err.to_string()),
            AuthError::EmailAlreadyExists => ApiError::Conflict {
                code: "EMAIL_EXISTS",
                message: err.to_string(),
            },
            AuthError::UserNotFound => ApiError::NotFound {
                resource: "User".to_string(),
                id: "current".to_string(),
            },
            AuthError::DatabaseError(e) => ApiError::DatabaseError(e),
            AuthError::PasswordHashError | AuthError::TokenGenerationError(_) => {
                ApiError::InternalError(err.to_string())
            }
            AuthError::InsufficientPermissions { required, .. } => ApiError::Forbidden(format!(
                "Insufficient permissions: required role '{}'",
                required
            )),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
