// Review Eligibility Gate
//
// A review is accepted only for a booking the reviewer holds, whose slot
// has ended, and whose status is active or completed. Checks run in that
// order so each refusal names the first rule broken.

use chrono::{DateTime, Utc};

use crate::bookings::{Booking, BookingStatus};
use crate::reviews::ReviewError;

pub struct ReviewGate;

impl ReviewGate {
    /// Ratings are whole stars from 1 to 5
    pub fn validate_rating(rating: i32) -> Result<i16, ReviewError> {
        if (1..=5).contains(&rating) {
            Ok(rating as i16)
        } else {
            Err(ReviewError::InvalidRating(rating))
        }
    }

    pub fn check_eligibility(
        booking: &Booking,
        user_id: i32,
        now: DateTime<Utc>,
    ) -> Result<(), ReviewError> {
        if booking.user_id != user_id {
            return Err(ReviewError::Forbidden);
        }
        if booking.end_time > now {
            return Err(ReviewError::NotYetCompleted);
        }
        if !matches!(booking.status, BookingStatus::Active | BookingStatus::Completed) {
            return Err(ReviewError::InvalidState(booking.status));
        }
        Ok(())
    }
}
