// Typed view of a turf's settings consumed by the booking engine

use crate::settings::{
    Setting, ADVANCE_BOOKING_DAYS, BOOKING_DISABLED, CANCELLATION_DEADLINE_HOURS,
    DISABLED_REASON, MAX_BOOKING_HOURS,
};

pub const DEFAULT_MAX_BOOKING_HOURS: f64 = 3.0;
pub const DEFAULT_ADVANCE_BOOKING_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct BookingPolicy {
    pub booking_disabled: bool,
    pub disabled_reason: String,
    pub max_booking_hours: f64,
    pub advance_booking_days: i64,
    /// None when unset or unparsable; callers fall back to their own default
    pub cancellation_deadline_hours: Option<f64>,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            booking_disabled: false,
            disabled_reason: String::new(),
            max_booking_hours: DEFAULT_MAX_BOOKING_HOURS,
            advance_booking_days: DEFAULT_ADVANCE_BOOKING_DAYS,
            cancellation_deadline_hours: None,
        }
    }
}

impl BookingPolicy {
    /// Parse known keys, keeping defaults for anything missing or malformed
    pub fn from_settings(settings: &[Setting]) -> Self {
        let mut policy = Self::default();

        for setting in settings {
            let value = setting.value.trim();
            match setting.key.as_str() {
                BOOKING_DISABLED => {
                    policy.booking_disabled = value.eq_ignore_ascii_case("true");
                }
                DISABLED_REASON => policy.disabled_reason = value.to_string(),
                MAX_BOOKING_HOURS => {
                    if let Some(hours) = value.parse::<f64>().ok().filter(|h| h.is_finite() && *h > 0.0) {
                        policy.max_booking_hours = hours;
                    }
                }
                ADVANCE_BOOKING_DAYS => {
                    if let Some(days) = value.parse::<i64>().ok().filter(|d| *d > 0) {
                        policy.advance_booking_days = days;
                    }
                }
                CANCELLATION_DEADLINE_HOURS => {
                    policy.cancellation_deadline_hours =
                        value.parse::<f64>().ok().filter(|h| h.is_finite() && *h >= 0.0);
                }
                _ => {}
            }
        }

        policy
    }

    /// Message to show a user whose booking was refused
    pub fn disabled_message(&self) -> String {
        if self.disabled_reason.is_empty() {
            "Bookings are currently disabled for this turf".to_string()
        } else {
            self.disabled_reason.clone()
        }
    }
}
