// Operating-Hours Validator
//
// A booking must start no earlier than the turf opens and end no later than
// it closes, comparing minutes since local midnight in the venue offset.

use chrono::{DateTime, FixedOffset, NaiveTime, Timelike, Utc};

use crate::bookings::BookingError;

pub struct OperatingHoursValidator;

impl OperatingHoursValidator {
    pub fn minutes_since_midnight(time: NaiveTime) -> u32 {
        time.hour() * 60 + time.minute()
    }

    /// Reject intervals that start before opening or end after closing
    pub fn validate(
        opening: NaiveTime,
        closing: NaiveTime,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        offset: FixedOffset,
    ) -> Result<(), BookingError> {
        let start_minutes = Self::minutes_since_midnight(start.with_timezone(&offset).time());
        let end_minutes = Self::minutes_since_midnight(end.with_timezone(&offset).time());

        if start_minutes < Self::minutes_since_midnight(opening)
            || end_minutes > Self::minutes_since_midnight(closing)
        {
            return Err(BookingError::OutOfHours { opening, closing });
        }
        Ok(())
    }
}
