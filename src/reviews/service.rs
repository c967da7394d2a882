use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::bookings::{BookingError, BookingRepository};
use crate::reviews::{
    CreateReviewRequest, RatingCalculator, Review, ReviewError, ReviewGate, ReviewRepository,
    ReviewStats,
};
use crate::stats::StatsService;

/// Service layer for review business logic
#[derive(Clone)]
pub struct ReviewService {
    repository: ReviewRepository,
    booking_repo: BookingRepository,
    stats: Arc<StatsService>,
}

impl ReviewService {
    /// Create a new ReviewService
    pub fn new(
        repository: ReviewRepository,
        booking_repo: BookingRepository,
        stats: Arc<StatsService>,
    ) -> Self {
        Self {
            repository,
            booking_repo,
            stats,
        }
    }

    /// Review a finished booking
    ///
    /// This method:
    /// 1. Checks the rating is 1 to 5
    /// 2. Loads the booking
    /// 3. Runs the eligibility gate (holder, slot ended, active or completed)
    /// 4. Rejects a second review by the same user
    /// 5. Stores the review
    pub async fn create_review(
        &self,
        user_id: i32,
        request: CreateReviewRequest,
    ) -> Result<Review, ReviewError> {
        let rating = ReviewGate::validate_rating(request.rating)?;

        let booking = self
            .booking_repo
            .find_by_id(request.booking_id)
            .await
            .map_err(booking_error)?
            .ok_or(ReviewError::BookingNotFound(request.booking_id))?;

        ReviewGate::check_eligibility(&booking, user_id, Utc::now())?;

        if self.repository.exists_for(user_id, booking.id).await? {
            return Err(ReviewError::AlreadyReviewed);
        }

        let comment = request
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        let review = self
            .repository
            .create(user_id, booking.id, rating, comment)
            .await?;

        if let Some(owner_id) = self
            .booking_repo
            .find_turf_owner(booking.turf_id)
            .await
            .map_err(booking_error)?
        {
            self.stats.invalidate(owner_id).await;
        }

        info!("User {} reviewed booking {} ({} stars)", user_id, booking.id, rating);
        Ok(review)
    }

    pub async fn list_all(&self) -> Result<Vec<Review>, ReviewError> {
        self.repository.list_all().await
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<Review>, ReviewError> {
        self.repository.list_by_user(user_id).await
    }

    pub async fn get_for_booking(&self, booking_id: Uuid) -> Result<Review, ReviewError> {
        self.repository
            .find_by_booking(booking_id)
            .await?
            .ok_or(ReviewError::NotFound(booking_id))
    }

    /// Average rating and histogram, across all turfs or for one
    pub async fn stats(&self, turf_id: Option<Uuid>) -> Result<ReviewStats, ReviewError> {
        let counts = self.repository.rating_counts(turf_id).await?;
        Ok(RatingCalculator::summarize(&counts))
    }
}

fn booking_error(err: BookingError) -> ReviewError {
    match err {
        BookingError::DatabaseError(e) => ReviewError::DatabaseError(e),
        BookingError::NotFound(id) => ReviewError::BookingNotFound(id),
        other => ReviewError::ValidationError(other.to_string()),
    }
}
