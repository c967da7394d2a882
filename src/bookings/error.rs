use axum::response::{IntoResponse, Response};
use chrono::NaiveTime;
use uuid::Uuid;

use crate::error::ApiError;
use crate::pricing::PricingError;
use crate::settings::SettingsError;
use crate::turfs::TurfStatus;

/// Error types for booking operations
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Booking {0} not found")]
    NotFound(Uuid),

    #[error("Turf {0} not found")]
    TurfNotFound(Uuid),

    #[error("User {0} not found")]
    UserNotFound(i32),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Booking must last at least {min_hours} hour(s)")]
    DurationTooShort { min_hours: f64 },

    #[error("Booking must not last more than {max_hours} hour(s)")]
    DurationTooLong { max_hours: f64 },

    #[error("{0}")]
    OutsideBookingWindow(String),

    #[error("Booking must be within operating hours {opening} to {closing}")]
    OutOfHours { opening: NaiveTime, closing: NaiveTime },

    #[error("Turf is not accepting bookings (status: {0})")]
    TurfNotActive(TurfStatus),

    #[error("{0}")]
    BookingsDisabled(String),

    #[error("The requested slot overlaps an existing booking")]
    SlotTaken,

    #[error("{0}")]
    PricingNotConfigured(String),

    #[error("Booking is already cancelled")]
    AlreadyCancelled,

    #[error("Bookings can only be cancelled at least {threshold_hours} hour(s) before start")]
    CancellationWindowClosed { threshold_hours: f64 },

    #[error("{0}")]
    InvalidTransition(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<PricingError> for BookingError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::DatabaseError(e) => BookingError::DatabaseError(e),
            PricingError::TurfNotFound(id) => BookingError::TurfNotFound(id),
            PricingError::Forbidden(msg) => BookingError::Forbidden(msg),
            e @ PricingError::NotConfigured { .. } => BookingError::PricingNotConfigured(e.to_string()),
            PricingError::InvalidPrice(msg) => BookingError::ValidationError(msg),
        }
    }
}

impl From<SettingsError> for BookingError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::DatabaseError(e) => BookingError::DatabaseError(e),
            SettingsError::TurfNotFound(id) => BookingError::TurfNotFound(id),
            SettingsError::Forbidden(msg) => BookingError::Forbidden(msg),
            other => BookingError::ValidationError(other.to_string()),
        }
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        let message = err.to_string();
        match err {
            BookingError::DatabaseError(e) => ApiError::DatabaseError(e),
            BookingError::NotFound(id) => ApiError::not_found("Booking", id),
            BookingError::TurfNotFound(id) => ApiError::not_found("Turf", id),
            BookingError::UserNotFound(id) => ApiError::not_found("User", id),
            BookingError::Forbidden(msg) => ApiError::Forbidden(msg),
            BookingError::PricingNotConfigured(msg) => ApiError::Missing {
                code: "PRICING_NOT_CONFIGURED",
                message: msg,
            },
            BookingError::BookingsDisabled(msg) => ApiError::Unavailable { message: msg },
            BookingError::SlotTaken => ApiError::Conflict {
                code: "SLOT_TAKEN",
                message,
            },
            BookingError::AlreadyCancelled => ApiError::Conflict {
                code: "ALREADY_CANCELLED",
                message,
            },
            BookingError::InvalidInterval(_) => ApiError::BadRequest {
                code: "INVALID_INTERVAL",
                message,
            },
            BookingError::DurationTooShort { .. } => ApiError::BadRequest {
                code: "DURATION_TOO_SHORT",
                message,
            },
            BookingError::DurationTooLong { .. } => ApiError::BadRequest {
                code: "DURATION_TOO_LONG",
                message,
            },
            BookingError::OutsideBookingWindow(_) => ApiError::BadRequest {
                code: "OUTSIDE_BOOKING_WINDOW",
                message,
            },
            BookingError::OutOfHours { .. } => ApiError::BadRequest {
                code: "OUT_OF_HOURS",
                message,
            },
            BookingError::TurfNotActive(_) => ApiError::BadRequest {
                code: "TURF_NOT_ACTIVE",
                message,
            },
            BookingError::CancellationWindowClosed { .. } => ApiError::BadRequest {
                code: "CANCELLATION_WINDOW_CLOSED",
                message,
            },
            BookingError::InvalidTransition(_) => ApiError::BadRequest {
                code: "INVALID_TRANSITION",
                message,
            },
            BookingError::ValidationError(msg) => ApiError::BadRequest {
                code: "VALIDATION_ERROR",
                message: msg,
            },
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
