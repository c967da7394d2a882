use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Database model for a review
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub booking_id: Uuid,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request to review a finished booking
///
/// `rating` is range-checked by the service so an out-of-range value is
/// reported as an invalid rating rather than a generic validation failure.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReviewRequest {
    pub booking_id: Uuid,
    pub rating: i32,
    #[validate(length(max = 2000, message = "Comment must not exceed 2000 characters"))]
    pub comment: Option<String>,
}

/// Count of reviews with a given star value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RatingBucket {
    pub rating: i16,
    pub count: i64,
}

/// Aggregate rating figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReviewStats {
    /// Mean rating rounded to 2 decimal places, 0 when there are no reviews
    pub average_rating: f64,
    pub total_reviews: i64,
    /// One entry per star value, 5 down to 1
    pub distribution: Vec<RatingBucket>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ReviewStatsQuery {
    /// Restrict to reviews of bookings on this turf
    pub turf_id: Option<Uuid>,
}
