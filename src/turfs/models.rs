use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Operational state of a turf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TurfStatus {
    Active,
    Inactive,
    Maintenance,
}

impl TurfStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurfStatus::Active => "active",
            TurfStatus::Inactive => "inactive",
            TurfStatus::Maintenance => "maintenance",
        }
    }
}

impl Default for TurfStatus {
    fn default() -> Self {
        TurfStatus::Active
    }
}

impl std::fmt::Display for TurfStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Default opening time for new turfs
pub fn default_opening_time() -> NaiveTime {
    NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Default closing time for new turfs
pub fn default_closing_time() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Domain model representing a turf in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Turf {
    pub id: Uuid,
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub amenities: Vec<String>,
    pub status: TurfStatus,
    #[schema(value_type = String, example = "06:00:00")]
    pub opening_time: NaiveTime,
    #[schema(value_type = String, example = "23:00:00")]
    pub closing_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Turf {
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.owner_id == user_id
    }

    pub fn is_active(&self) -> bool {
        self.status == TurfStatus::Active
    }
}

/// Request DTO for creating a turf
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTurfRequest {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
    #[validate(length(min = 1, max = 120, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, max = 120, message = "State is required"))]
    pub state: String,
    #[validate(length(max = 32, message = "Phone must not exceed 32 characters"))]
    pub phone: Option<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[schema(value_type = Option<String>, example = "06:00:00")]
    pub opening_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>, example = "23:00:00")]
    pub closing_time: Option<NaiveTime>,
}

/// Request DTO for updating a turf
///
/// Only these fields can change. Owner, status, id and timestamps have
/// their own paths or are immutable.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateTurfRequest {
    #[validate(length(min = 1, max = 255, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(max = 2000, message = "Description must not exceed 2000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Address must not be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 120, message = "City must not be empty"))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 120, message = "State must not be empty"))]
    pub state: Option<String>,
    #[validate(length(max = 32, message = "Phone must not exceed 32 characters"))]
    pub phone: Option<String>,
    pub amenities: Option<Vec<String>>,
    #[schema(value_type = Option<String>)]
    pub opening_time: Option<NaiveTime>,
    #[schema(value_type = Option<String>)]
    pub closing_time: Option<NaiveTime>,
}

/// Request DTO for changing a turf's status
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateTurfStatusRequest {
    pub status: TurfStatus,
}

/// Query parameters for listing turfs
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct TurfListQuery {
    /// Defaults to `active`
    pub status: Option<TurfStatus>,
    /// Case-insensitive exact match
    pub city: Option<String>,
    /// Case-insensitive exact match
    pub state: Option<String>,
}

/// Query parameters for deleting a turf
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DeleteTurfQuery {
    /// Remove the row and everything attached to it instead of deactivating
    #[serde(default)]
    pub hard: bool,
}

/// Opening must come strictly before closing on the same day
pub fn validate_hours(opening: NaiveTime, closing: NaiveTime) -> Result<(), String> {
    if opening >= closing {
        return Err(format!(
            "Opening time {} must be before closing time {}",
            opening.format("%H:%M"),
            closing.format("%H:%M")
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_validate_hours() {
        assert!(validate_hours(t(6, 0), t(23, 0)).is_ok());
        assert!(validate_hours(t(9, 0), t(9, 0)).is_err());
        // Closing past midnight is not representable
        assert!(validate_hours(t(18, 0), t(2, 0)).is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(default_opening_time(), t(6, 0));
        assert_eq!(default_closing_time(), t(23, 0));
        assert_eq!(TurfStatus::default(), TurfStatus::Active);
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&TurfStatus::Maintenance).unwrap(), "\"maintenance\"");
        let status: TurfStatus = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(status, TurfStatus::Inactive);
    }

    #[test]
    fn test_update_request_ignores_unknown_fields() {
        // owner_id and id are not part of the whitelist and are dropped
        let request: UpdateTurfRequest =
            serde_json::from_str(r#"{"name": "North Pitch", "owner_id": 99, "id": "x"}"#).unwrap();
        assert_eq!(request.name.as_deref(), Some("North Pitch"));
        assert!(request.city.is_none());
    }
}
