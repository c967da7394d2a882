use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::bookings::{
    AdminBookingQuery, AvailabilityChecker, Booking, BookingError, BookingStatus, NewBooking,
    UserBookingQuery,
};
use crate::error::is_exclusion_violation;

const BOOKING_COLUMNS: &str = "b.id, b.turf_id, b.user_id, b.booking_date, b.start_time, \
     b.end_time, b.price, b.status, b.created_by, b.created_by_name, b.cancelled_at, \
     b.cancellation_reason, b.created_at, b.updated_at";

/// Status as reported to clients: a confirmed booking in progress is active
const EFFECTIVE_STATUS: &str = "CASE WHEN b.status = 'confirmed' AND b.start_time <= NOW() \
     AND b.end_time > NOW() THEN 'active' ELSE b.status END";

/// Repository for booking operations
#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a booking if its slot is still free
    ///
    /// A transaction-scoped advisory lock on (turf, date) serialises
    /// concurrent creations for the same day, so the overlap check and the
    /// insert are atomic with respect to each other. A write that still
    /// slips past is rejected by the exclusion constraint and reported as
    /// `SlotTaken`.
    pub async fn create_if_free(&self, new: NewBooking) -> Result<Booking, BookingError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(format!("booking:{}:{}", new.turf_id, new.booking_date))
            .execute(&mut *tx)
            .await?;

        if AvailabilityChecker::has_overlap_on(
            &mut *tx,
            new.turf_id,
            new.booking_date,
            new.start_time,
            new.end_time,
        )
        .await?
        {
            debug!(
                "Slot {} - {} on turf {} already taken",
                new.start_time, new.end_time, new.turf_id
            );
            return Err(BookingError::SlotTaken);
        }

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, turf_id, user_id, booking_date, start_time, end_time,
                                  price, status, created_by, created_by_name)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, turf_id, user_id, booking_date, start_time, end_time, price, status,
                      created_by, created_by_name, cancelled_at, cancellation_reason,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.turf_id)
        .bind(new.user_id)
        .bind(new.booking_date)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.price)
        .bind(new.status)
        .bind(new.created_by)
        .bind(&new.created_by_name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_exclusion_violation(&e) {
                BookingError::SlotTaken
            } else {
                BookingError::DatabaseError(e)
            }
        })?;

        tx.commit().await?;
        Ok(booking)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, BookingError> {
        let sql = format!("SELECT {} FROM bookings b WHERE b.id = $1", BOOKING_COLUMNS);
        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    /// Lock a booking row for the rest of the transaction
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Booking>, BookingError> {
        let sql = format!(
            "SELECT {} FROM bookings b WHERE b.id = $1 FOR UPDATE",
            BOOKING_COLUMNS
        );
        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(booking)
    }

    pub async fn set_status(
        conn: &mut PgConnection,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, BookingError> {
        let sql = format!(
            r#"
            UPDATE bookings b
            SET status = $2, updated_at = NOW()
            WHERE b.id = $1
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        );
        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(conn)
            .await?
            .ok_or(BookingError::NotFound(id))?;

        Ok(booking)
    }

    /// Cancel a booking, stamping `cancelled_at` and the optional reason
    pub async fn mark_cancelled(
        conn: &mut PgConnection,
        id: Uuid,
        reason: Option<&str>,
    ) -> Result<Booking, BookingError> {
        let sql = format!(
            r#"
            UPDATE bookings b
            SET status = 'cancelled',
                cancelled_at = NOW(),
                cancellation_reason = $2,
                updated_at = NOW()
            WHERE b.id = $1 AND b.status <> 'cancelled'
            RETURNING {}
            "#,
            BOOKING_COLUMNS
        );
        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .bind(reason)
            .fetch_optional(conn)
            .await?
            .ok_or(BookingError::AlreadyCancelled)?;

        Ok(booking)
    }

    /// Owner of the turf a booking belongs to
    pub async fn find_turf_owner(&self, turf_id: Uuid) -> Result<Option<i32>, BookingError> {
        let owner = sqlx::query_scalar::<_, i32>("SELECT owner_id FROM turfs WHERE id = $1")
            .bind(turf_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }

    /// A user's bookings, newest slot first
    pub async fn list_for_user(
        &self,
        user_id: i32,
        query: &UserBookingQuery,
    ) -> Result<Vec<Booking>, BookingError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM bookings b
            WHERE b.user_id = $1
              AND ($2::text IS NULL OR {} = $2)
              AND ($3::uuid IS NULL OR b.turf_id = $3)
            ORDER BY b.start_time DESC
            "#,
            BOOKING_COLUMNS, EFFECTIVE_STATUS
        );
        let bookings = sqlx::query_as::<_, Booking>(&sql)
            .bind(user_id)
            .bind(query.status)
            .bind(query.turf_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }

    /// Bookings on every turf the admin owns
    pub async fn list_for_owner(
        &self,
        owner_id: i32,
        query: &AdminBookingQuery,
    ) -> Result<Vec<Booking>, BookingError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM bookings b
            JOIN turfs t ON t.id = b.turf_id
            WHERE t.owner_id = $1
              AND ($2::text IS NULL OR {} = $2)
              AND ($3::uuid IS NULL OR b.turf_id = $3)
              AND ($4::date IS NULL OR b.booking_date = $4)
            ORDER BY b.start_time DESC
            "#,
            BOOKING_COLUMNS, EFFECTIVE_STATUS
        );
        let bookings = sqlx::query_as::<_, Booking>(&sql)
            .bind(owner_id)
            .bind(query.status)
            .bind(query.turf_id)
            .bind(query.date)
            .fetch_all(&self.pool)
            .await?;

        Ok(bookings)
    }
}
