use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Weekday (Monday to Friday) or weekend (Saturday, Sunday)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayType::Weekday => "weekday",
            DayType::Weekend => "weekend",
        }
    }
}

impl std::fmt::Display for DayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Part of the day a booking starts in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    /// 06:00 to 12:00
    Morning,
    /// 12:00 to 18:00
    Afternoon,
    /// 18:00 to 06:00
    Evening,
}

impl TimeSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
        }
    }
}

impl std::fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hourly rate of a turf for one (day type, time slot) pair
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct PricingRow {
    pub id: i32,
    pub turf_id: Uuid,
    pub day_type: DayType,
    pub time_slot: TimeSlot,
    pub price: Decimal,
    pub updated_at: DateTime<Utc>,
}

/// One rate in an update request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceEntry {
    pub day_type: DayType,
    pub time_slot: TimeSlot,
    pub price: Decimal,
}

/// Request DTO for upserting rates
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdatePricingRequest {
    #[validate(length(min = 1, message = "At least one price is required"))]
    pub prices: Vec<PriceEntry>,
}

/// Rates seeded for every new turf
pub fn default_pricing() -> [(DayType, TimeSlot, Decimal); 6] {
    [
        (DayType::Weekday, TimeSlot::Morning, Decimal::from(500)),
        (DayType::Weekday, TimeSlot::Afternoon, Decimal::from(700)),
        (DayType::Weekday, TimeSlot::Evening, Decimal::from(1000)),
        (DayType::Weekend, TimeSlot::Morning, Decimal::from(700)),
        (DayType::Weekend, TimeSlot::Afternoon, Decimal::from(1000)),
        (DayType::Weekend, TimeSlot::Evening, Decimal::from(1500)),
    ]
}
