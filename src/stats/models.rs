use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::stats::BucketUnit;

/// Booking counts by status, with `active` derived from confirmed bookings
/// whose slot contains the computation instant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCounts {
    pub pending: i64,
    pub confirmed: i64,
    pub active: i64,
    pub cancelled: i64,
    pub completed: i64,
}

impl StatusCounts {
    /// Fold (status, count) rows into per-status totals
    pub fn from_rows(rows: &[(String, i64)]) -> Self {
        let mut counts = Self::default();
        for (status, count) in rows {
            match status.as_str() {
                "pending" => counts.pending += count,
                "confirmed" => counts.confirmed += count,
                "active" => counts.active += count,
                "cancelled" => counts.cancelled += count,
                "completed" => counts.completed += count,
                other => tracing::warn!("Unknown booking status in stats: {}", other),
            }
        }
        counts
    }

    pub fn total(&self) -> i64 {
        self.pending + self.confirmed + self.active + self.cancelled + self.completed
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatsOverview {
    pub total_bookings: i64,
    pub bookings_by_status: StatusCounts,
    /// Distinct customers who ever booked one of the admin's turfs
    pub total_users: i64,
    /// Distinct customers with a booking created in the last 30 days
    pub recent_users: i64,
    pub total_reviews: i64,
    pub average_rating: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EarningsBucket {
    pub label: String,
    #[schema(value_type = String)]
    pub earnings: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EarningsBreakdown {
    pub unit: BucketUnit,
    #[schema(value_type = String)]
    pub total_earnings: Decimal,
    pub breakdown: Vec<EarningsBucket>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
pub struct PeakHour {
    /// Hour of day in venue time, 0 to 23
    pub hour: i32,
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct TopCustomer {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub booking_count: i64,
    #[schema(value_type = String)]
    pub total_spent: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatsInsights {
    /// Mean booked hours, rounded to 2 dp
    pub average_booking_duration: f64,
    pub peak_booking_hours: Vec<PeakHour>,
    pub top_users: Vec<TopCustomer>,
}

/// Dashboard payload for one admin's turfs
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminStats {
    pub overview: StatsOverview,
    pub last_7_days: EarningsBreakdown,
    pub current_week: EarningsBreakdown,
    pub last_5_weeks: EarningsBreakdown,
    pub this_month: EarningsBreakdown,
    pub this_year: EarningsBreakdown,
    pub insights: StatsInsights,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct StatsQuery {
    /// Skip the memoised payload and recompute
    #[serde(default)]
    pub refresh: bool,
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
