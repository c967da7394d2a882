// Booking policy rules that need no storage
//
// Durations are compared as fractional hours computed from milliseconds.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};

use crate::bookings::BookingError;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Fractional hours from `from` to `to`; negative when `to` is earlier
pub fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / MILLIS_PER_HOUR
}

/// The interval must be non-empty and lie on `date` in the venue offset
pub fn validate_interval(
    date: NaiveDate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<(), BookingError> {
    if end <= start {
        return Err(BookingError::InvalidInterval(
            "end_time must be after start_time".to_string(),
        ));
    }

    let start_date = start.with_timezone(&offset).date_naive();
    let end_date = end.with_timezone(&offset).date_naive();
    if start_date != date || end_date != date {
        return Err(BookingError::InvalidInterval(format!(
            "start_time and end_time must both fall on {}",
            date
        )));
    }
    Ok(())
}

pub fn check_min_duration(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    min_hours: f64,
) -> Result<(), BookingError> {
    if hours_between(start, end) < min_hours {
        return Err(BookingError::DurationTooShort { min_hours });
    }
    Ok(())
}

pub fn check_max_duration(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    max_hours: f64,
) -> Result<(), BookingError> {
    if hours_between(start, end) > max_hours {
        return Err(BookingError::DurationTooLong { max_hours });
    }
    Ok(())
}

/// Start must be in the future and no more than `advance_days` local days ahead
pub fn check_advance_window(
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    advance_days: i64,
    offset: FixedOffset,
) -> Result<(), BookingError> {
    if start <= now {
        return Err(BookingError::OutsideBookingWindow(
            "Bookings must start in the future".to_string(),
        ));
    }

    let today = now.with_timezone(&offset).date_naive();
    let last_day = today + Duration::days(advance_days);
    if start.with_timezone(&offset).date_naive() > last_day {
        return Err(BookingError::OutsideBookingWindow(format!(
            "Bookings can be made at most {} days in advance",
            advance_days
        )));
    }
    Ok(())
}

/// A user may cancel while at least `threshold_hours` remain before the start
pub fn cancellation_allowed(start: DateTime<Utc>, now: DateTime<Utc>, threshold_hours: f64) -> bool {
    hours_between(now, start) >= threshold_hours
}
