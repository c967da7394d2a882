// Availability Checker
//
// Two half-open intervals [a, b) and [c, d) overlap when a < d and c < b.
// Only bookings in an occupying status are considered. The check used for
// creation runs inside the inserting transaction, behind a per turf and
// date advisory lock; the exclusion constraint on `bookings` backs it up.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::bookings::{BookingStatus, OCCUPYING_STATUSES};
use crate::metrics::PerformanceMetrics;

#[derive(Clone)]
pub struct AvailabilityChecker {
    pool: PgPool,
    metrics: PerformanceMetrics,
}

impl AvailabilityChecker {
    pub fn new(pool: PgPool, metrics: PerformanceMetrics) -> Self {
        Self { pool, metrics }
    }

    /// Whether [start, end) on `date` collides with an occupying booking
    ///
    /// This read is advisory. Creation repeats it under the slot lock.
    pub async fn has_overlap(
        &self,
        turf_id: Uuid,
        date: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let _timer = self.metrics.start_overlap_check();
        let mut conn = self.pool.acquire().await?;
        Self::has_overlap_on(&mut *conn, turf_id, date, start, end).await
    }

    /// Same check on a caller-supplied connection or transaction
    pub async fn has_overlap_on(
        conn: &mut PgConnection,
        turf_id: Uuid,
        date: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM bookings
                WHERE turf_id = $1
                  AND booking_date = $2
                  AND status = ANY($5)
                  AND start_time < $4
                  AND end_time > $3
            )
            "#,
        )
        .bind(turf_id)
        .bind(date)
        .bind(start)
        .bind(end)
        .bind(occupying_status_names())
        .fetch_one(conn)
        .await
    }
}

fn occupying_status_names() -> Vec<&'static str> {
    OCCUPYING_STATUSES.iter().map(BookingStatus::as_str).collect()
}
