use axum::response::{IntoResponse, Response};
use std::fmt;
use uuid::Uuid;

use crate::bookings::BookingStatus;
use crate::error::ApiError;

/// Errors raised by the review eligibility gate and review queries
#[derive(Debug)]
pub enum ReviewError {
    /// Rating outside 1..=5
    InvalidRating(i32),

    BookingNotFound(Uuid),

    /// No review exists for the booking
    NotFound(Uuid),

    /// The booking belongs to someone else
    Forbidden,

    /// The booked slot has not ended yet
    NotYetCompleted,

    /// Booking status does not allow reviews
    InvalidState(BookingStatus),

    /// The user already reviewed this booking
    AlreadyReviewed,

    ValidationError(String),

    DatabaseError(sqlx::Error),
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewError::InvalidRating(rating) => {
                write!(f, "Rating must be a whole number from 1 to 5, got {}", rating)
            }
            ReviewError::BookingNotFound(id) => write!(f, "Booking {} not found", id),
            ReviewError::NotFound(id) => write!(f, "No review found for booking {}", id),
            ReviewError::Forbidden => write!(f, "You can only review your own bookings"),
            ReviewError::NotYetCompleted => {
                write!(f, "A booking can only be reviewed after its slot has ended")
            }
            ReviewError::InvalidState(status) => {
                write!(f, "A {} booking cannot be reviewed", status)
            }
            ReviewError::AlreadyReviewed => write!(f, "You have already reviewed this booking"),
            ReviewError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ReviewError::DatabaseError(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for ReviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReviewError::DatabaseError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for ReviewError {
    fn from(err: sqlx::Error) -> Self {
        ReviewError::DatabaseError(err)
    }
}

impl From<ReviewError> for ApiError {
    fn from(err: ReviewError) -> Self {
        let message = err.to_string();
        match err {
            ReviewError::InvalidRating(_) => ApiError::BadRequest {
                code: "INVALID_RATING",
                message,
            },
            ReviewError::BookingNotFound(id) => ApiError::not_found("Booking", id),
            ReviewError::NotFound(id) => ApiError::not_found("Review for booking", id),
            ReviewError::Forbidden => ApiError::Forbidden(message),
            ReviewError::NotYetCompleted => ApiError::BadRequest {
                code: "NOT_YET_COMPLETED",
                message,
            },
            ReviewError::InvalidState(_) => ApiError::BadRequest {
                code: "INVALID_STATE",
                message,
            },
            ReviewError::AlreadyReviewed => ApiError::Conflict {
                code: "ALREADY_REVIEWED",
                message,
            },
            ReviewError::ValidationError(msg) => ApiError::BadRequest {
                code: "VALIDATION_ERROR",
                message: msg,
            },
            ReviewError::DatabaseError(e) => ApiError::DatabaseError(e),
        }
    }
}

impl IntoResponse for ReviewError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
