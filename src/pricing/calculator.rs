// Pure pricing arithmetic
//
// Classification uses the local date and hour of the booking start in the
// venue offset. The price is the hourly rate times the exact duration in
// hours, rounded to two decimal places.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Timelike, Utc, Weekday};
use rust_decimal::Decimal;

use crate::pricing::{DayType, TimeSlot};

const MILLIS_PER_HOUR: i64 = 3_600_000;

pub struct PriceCalculator;

impl PriceCalculator {
    /// Saturday and Sunday are weekend days
    pub fn day_type_for(date: NaiveDate) -> DayType {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayType::Weekend,
            _ => DayType::Weekday,
        }
    }

    /// Slot containing a start hour (0..=23)
    pub fn time_slot_for(hour: u32) -> TimeSlot {
        match hour {
            6..=11 => TimeSlot::Morning,
            12..=17 => TimeSlot::Afternoon,
            _ => TimeSlot::Evening,
        }
    }

    /// Day type and slot for a start instant read in the venue offset
    pub fn classify(start: DateTime<Utc>, offset: FixedOffset) -> (DayType, TimeSlot) {
        let local = start.with_timezone(&offset);
        (
            Self::day_type_for(local.date_naive()),
            Self::time_slot_for(local.hour()),
        )
    }

    /// Exact duration in hours
    pub fn duration_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
        let millis = (end - start).num_milliseconds();
        Decimal::from(millis) / Decimal::from(MILLIS_PER_HOUR)
    }

    /// `rate` times the duration in hours, rounded to 2 decimal places
    pub fn calculate_price(rate: Decimal, start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
        (rate * Self::duration_hours(start, end)).round_dp(2)
    }
}
