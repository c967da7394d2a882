use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Booking status representing the lifecycle of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Cancelled,
    Completed,
}

/// Statuses that hold a slot on the turf
pub const OCCUPYING_STATUSES: [BookingStatus; 3] = [
    BookingStatus::Pending,
    BookingStatus::Confirmed,
    BookingStatus::Active,
];

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Active => "active",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Booking entity as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub turf_id: Uuid,
    pub user_id: i32,
    #[schema(value_type = String, example = "2025-06-07")]
    pub booking_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price: Decimal,
    pub status: BookingStatus,
    pub created_by: i32,
    /// Name of the creator at booking time
    pub created_by_name: String,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Status shown to clients
    ///
    /// A confirmed booking whose interval contains `now` is reported as
    /// active. The stored status is never changed for this.
    pub fn effective_status(&self, now: DateTime<Utc>) -> BookingStatus {
        if self.status == BookingStatus::Confirmed && self.start_time <= now && now < self.end_time {
            BookingStatus::Active
        } else {
            self.status
        }
    }
}

/// Values needed to insert a booking
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub turf_id: Uuid,
    pub user_id: i32,
    pub booking_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price: Decimal,
    pub status: BookingStatus,
    pub created_by: i32,
    pub created_by_name: String,
}

/// Request DTO for booking a slot
///
/// Times are RFC 3339 timestamps with an offset; both must fall on `date`
/// in the venue's local time.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    pub turf_id: Uuid,
    #[schema(value_type = String, example = "2025-06-07")]
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Request DTO for an admin booking on behalf of a user
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AdminCreateBookingRequest {
    #[validate(range(min = 1, message = "user_id must be positive"))]
    pub user_id: i32,
    pub turf_id: Uuid,
    #[schema(value_type = String, example = "2025-06-07")]
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CancelBookingRequest {
    #[validate(length(max = 500, message = "Reason must not exceed 500 characters"))]
    pub reason: Option<String>,
}

/// Filters for a user's own bookings
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct UserBookingQuery {
    /// Compared with the reported status, so `active` finds confirmed bookings in progress
    pub status: Option<BookingStatus>,
    pub turf_id: Option<Uuid>,
}

/// Filters for bookings on an admin's turfs
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AdminBookingQuery {
    /// Compared with the reported status
    pub status: Option<BookingStatus>,
    pub turf_id: Option<Uuid>,
    #[param(value_type = Option<String>, example = "2025-06-07")]
    pub date: Option<NaiveDate>,
}

/// Response DTO for a booking
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingResponse {
    #[serde(flatten)]
    pub booking: Booking,
    pub effective_status: BookingStatus,
}

impl BookingResponse {
    pub fn at(booking: Booking, now: DateTime<Utc>) -> Self {
        let effective_status = booking.effective_status(now);
        Self {
            booking,
            effective_status,
        }
    }
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self::at(booking, Utc::now())
    }
}
