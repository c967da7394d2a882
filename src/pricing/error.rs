use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::error::ApiError;
use crate::pricing::{DayType, TimeSlot};
use crate::turfs::TurfError;

/// Error types for pricing operations
#[derive(Debug, thiserror::Error)]
pub enum PricingError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Turf {0} not found")]
    TurfNotFound(Uuid),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("No {day_type} {time_slot} price configured for turf {turf_id}")]
    NotConfigured {
        turf_id: Uuid,
        day_type: DayType,
        time_slot: TimeSlot,
    },

    #[error("Invalid price: {0}")]
    InvalidPrice(String),
}

impl From<TurfError> for PricingError {
    fn from(err: TurfError) -> Self {
        match err {
            TurfError::DatabaseError(e) => PricingError::DatabaseError(e),
            TurfError::NotFound(id) => PricingError::TurfNotFound(id),
            TurfError::Forbidden(msg) => PricingError::Forbidden(msg),
            other => PricingError::InvalidPrice(other.to_string()),
        }
    }
}

impl From<PricingError> for ApiError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::DatabaseError(e) => ApiError::DatabaseError(e),
            PricingError::TurfNotFound(id) => ApiError::not_found("Turf", id),
            PricingError::Forbidden(msg) => ApiError::Forbidden(msg),
            e @ PricingError::NotConfigured { .. } => ApiError::Missing {
                code: "PRICING_NOT_CONFIGURED",
                message: e.to_string(),
            },
            PricingError::InvalidPrice(msg) => ApiError::BadRequest {
                code: "INVALID_PRICE",
                message: msg,
            },
        }
    }
}

impl IntoResponse for PricingError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
