use sqlx::PgPool;
use uuid::Uuid;

use crate::error::is_unique_violation;
use crate::reviews::{Review, ReviewError};

/// Repository for database operations on reviews
#[derive(Clone)]
pub struct ReviewRepository {
    pool: PgPool,
}

impl ReviewRepository {
    /// Create a new ReviewRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new review
    ///
    /// A concurrent duplicate that slips past the pre-check hits the
    /// (user_id, booking_id) unique constraint and becomes `AlreadyReviewed`.
    pub async fn create(
        &self,
        user_id: i32,
        booking_id: Uuid,
        rating: i16,
        comment: Option<String>,
    ) -> Result<Review, ReviewError> {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (user_id, booking_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, booking_id, rating, comment, created_at
            "#,
        )
        .bind(user_id)
        .bind(booking_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ReviewError::AlreadyReviewed
            } else {
                ReviewError::DatabaseError(e)
            }
        })
    }

    /// Whether the user already reviewed the booking
    pub async fn exists_for(&self, user_id: i32, booking_id: Uuid) -> Result<bool, ReviewError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM reviews WHERE user_id = $1 AND booking_id = $2)",
        )
        .bind(user_id)
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// All reviews, newest first
    pub async fn list_all(&self) -> Result<Vec<Review>, ReviewError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, user_id, booking_id, rating, comment, created_at
            FROM reviews
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    /// Reviews written by a user, newest first
    pub async fn list_by_user(&self, user_id: i32) -> Result<Vec<Review>, ReviewError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, user_id, booking_id, rating, comment, created_at
            FROM reviews
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    pub async fn find_by_booking(&self, booking_id: Uuid) -> Result<Option<Review>, ReviewError> {
        let review = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, user_id, booking_id, rating, comment, created_at
            FROM reviews
            WHERE booking_id = $1
            ORDER BY created_at
            LIMIT 1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(review)
    }

    /// (rating, count) pairs, optionally limited to one turf's bookings
    pub async fn rating_counts(&self, turf_id: Option<Uuid>) -> Result<Vec<(i16, i64)>, ReviewError> {
        let counts = sqlx::query_as::<_, (i16, i64)>(
            r#"
            SELECT r.rating, COUNT(*)
            FROM reviews r
            JOIN bookings b ON b.id = r.booking_id
            WHERE ($1::uuid IS NULL OR b.turf_id = $1)
            GROUP BY r.rating
            "#,
        )
        .bind(turf_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
