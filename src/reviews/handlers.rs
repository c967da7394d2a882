// HTTP handlers for review endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::reviews::{CreateReviewRequest, Review, ReviewStats, ReviewStatsQuery};
use crate::AppState;

/// Review a finished booking
#[utoipa::path(
    post,
    path = "/api/reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid rating, slot not ended or booking not reviewable", body = crate::error::ErrorResponse),
        (status = 403, description = "Booking belongs to another user", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Already reviewed", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "reviews"
)]
pub async fn create_review_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    request.validate()?;
    let review = state
        .review_service
        .create_review(user.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// List all reviews
#[utoipa::path(
    get,
    path = "/api/reviews",
    responses(
        (status = 200, description = "All reviews, newest first", body = Vec<Review>)
    ),
    tag = "reviews"
)]
pub async fn list_reviews_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = state.review_service.list_all().await?;
    Ok(Json(reviews))
}

/// List the caller's reviews
#[utoipa::path(
    get,
    path = "/api/reviews/me",
    responses(
        (status = 200, description = "Caller's reviews", body = Vec<Review>)
    ),
    security(("bearer_auth" = [])),
    tag = "reviews"
)]
pub async fn my_reviews_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = state.review_service.list_for_user(user.user_id).await?;
    Ok(Json(reviews))
}

/// Rating average and histogram
#[utoipa::path(
    get,
    path = "/api/reviews/stats",
    params(ReviewStatsQuery),
    responses(
        (status = 200, description = "Rating statistics", body = ReviewStats)
    ),
    tag = "reviews"
)]
pub async fn review_stats_handler(
    State(state): State<AppState>,
    Query(query): Query<ReviewStatsQuery>,
) -> Result<Json<ReviewStats>, ApiError> {
    let stats = state.review_service.stats(query.turf_id).await?;
    Ok(Json(stats))
}

/// Review attached to a booking
#[utoipa::path(
    get,
    path = "/api/reviews/booking/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Review", body = Review),
        (status = 404, description = "No review for this booking", body = crate::error::ErrorResponse)
    ),
    tag = "reviews"
)]
pub async fn booking_review_handler(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Review>, ApiError> {
    let review = state.review_service.get_for_booking(booking_id).await?;
    Ok(Json(review))
}
