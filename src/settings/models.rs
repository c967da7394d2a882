use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const BOOKING_DISABLED: &str = "booking_disabled";
pub const DISABLED_REASON: &str = "disabled_reason";
pub const MAX_BOOKING_HOURS: &str = "max_booking_hours";
pub const ADVANCE_BOOKING_DAYS: &str = "advance_booking_days";
pub const CANCELLATION_DEADLINE_HOURS: &str = "cancellation_deadline_hours";

/// Settings seeded for every new turf: (key, value, description)
pub const DEFAULT_SETTINGS: [(&str, &str, &str); 5] = [
    (BOOKING_DISABLED, "false", "Block new bookings from users"),
    (DISABLED_REASON, "", "Message shown while bookings are blocked"),
    (MAX_BOOKING_HOURS, "3", "Longest booking a user may make, in hours"),
    (ADVANCE_BOOKING_DAYS, "7", "How many days ahead a booking may start"),
    (
        CANCELLATION_DEADLINE_HOURS,
        "24",
        "Minimum hours before start for a user to cancel",
    ),
];

/// A per-turf key/value setting; values are stored as text
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Setting {
    pub id: i32,
    pub turf_id: Uuid,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Whether new bookings are blocked, and why
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookingStatusResponse {
    pub disabled: bool,
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateBookingStatusRequest {
    pub disabled: bool,
    #[validate(length(max = 500, message = "Reason must not exceed 500 characters"))]
    pub reason: Option<String>,
}

/// One entry of a bulk update
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SettingInput {
    pub key: String,
    pub value: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BulkUpdateSettingsRequest {
    #[validate(length(min = 1, message = "At least one setting is required"))]
    pub settings: Vec<SettingInput>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateSettingRequest {
    pub value: String,
    pub description: Option<String>,
}

/// Keys are 1 to 100 characters with no surrounding whitespace
pub fn validate_setting_key(key: &str) -> Result<(), String> {
    if key.is_empty() || key.len() > 100 || key.trim() != key {
        return Err(format!("Invalid setting key {:?}", key));
    }
    Ok(())
}

/// Check that a value parses as the type its key expects
///
/// Unknown keys are opaque and always accepted.
pub fn validate_setting_value(key: &str, value: &str) -> Result<(), String> {
    let value = value.trim();
    match key {
        BOOKING_DISABLED => value
            .parse::<bool>()
            .map(|_| ())
            .map_err(|_| format!("{} must be \"true\" or \"false\"", key)),
        MAX_BOOKING_HOURS => match value.parse::<f64>() {
            Ok(hours) if hours.is_finite() && hours > 0.0 => Ok(()),
            _ => Err(format!("{} must be a positive number", key)),
        },
        ADVANCE_BOOKING_DAYS => match value.parse::<i64>() {
            Ok(days) if days > 0 => Ok(()),
            _ => Err(format!("{} must be a positive whole number", key)),
        },
        CANCELLATION_DEADLINE_HOURS => match value.parse::<f64>() {
            Ok(hours) if hours.is_finite() && hours >= 0.0 => Ok(()),
            _ => Err(format!("{} must be a non-negative number", key)),
        },
        _ => Ok(()),
    }
}
