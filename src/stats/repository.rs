use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::stats::{
    round2, BucketPlan, EarningsBreakdown, EarningsBucket, PeakHour, StatsError, StatsInsights,
    StatsOverview, StatusCounts, TopCustomer,
};

/// How far back a customer counts as recent
const RECENT_USER_DAYS: i64 = 30;
const TOP_LIMIT: i64 = 5;

/// Read-only aggregate queries scoped to the turfs of one owner
#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Status counts, customers and review summary
    pub async fn overview(
        &self,
        owner_id: i32,
        now: DateTime<Utc>,
    ) -> Result<StatsOverview, StatsError> {
        let status_rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT CASE
                       WHEN b.status = 'confirmed' AND b.start_time <= $2 AND b.end_time > $2
                       THEN 'active'
                       ELSE b.status
                   END AS status,
                   COUNT(*) AS count
            FROM bookings b
            JOIN turfs t ON t.id = b.turf_id
            WHERE t.owner_id = $1
            GROUP BY 1
            "#,
        )
        .bind(owner_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        let (total_users, recent_users): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(DISTINCT b.user_id),
                   COUNT(DISTINCT b.user_id) FILTER (WHERE b.created_at >= $2)
            FROM bookings b
            JOIN turfs t ON t.id = b.turf_id
            WHERE t.owner_id = $1
            "#,
        )
        .bind(owner_id)
        .bind(now - Duration::days(RECENT_USER_DAYS))
        .fetch_one(&self.pool)
        .await?;

        let (total_reviews, average_rating): (i64, Option<f64>) = sqlx::query_as(
            r#"
            SELECT COUNT(r.id), AVG(r.rating)::FLOAT8
            FROM reviews r
            JOIN bookings b ON b.id = r.booking_id
            JOIN turfs t ON t.id = b.turf_id
            WHERE t.owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        let bookings_by_status = StatusCounts::from_rows(&status_rows);
        Ok(StatsOverview {
            total_bookings: bookings_by_status.total(),
            bookings_by_status,
            total_users,
            recent_users,
            total_reviews,
            average_rating: average_rating.map(round2).unwrap_or(0.0),
        })
    }

    /// Sum of non-cancelled booking prices per window, by creation time
    ///
    /// All windows of a plan are resolved in one round trip.
    pub async fn earnings(
        &self,
        owner_id: i32,
        plan: &BucketPlan,
    ) -> Result<EarningsBreakdown, StatsError> {
        if plan.windows.is_empty() {
            return Ok(EarningsBreakdown {
                unit: plan.unit,
                total_earnings: Decimal::ZERO,
                breakdown: Vec::new(),
            });
        }

        let sums: Vec<(i64, Decimal)> = sqlx::query_as(
            r#"
            SELECT w.idx, COALESCE(SUM(b.price), 0) AS earnings
            FROM unnest($2::timestamptz[], $3::timestamptz[]) WITH ORDINALITY AS w(start_at, end_at, idx)
            LEFT JOIN bookings b
                   ON b.created_at >= w.start_at
                  AND b.created_at < w.end_at
                  AND b.status <> 'cancelled'
                  AND b.turf_id IN (SELECT id FROM turfs WHERE owner_id = $1)
            GROUP BY w.idx
            ORDER BY w.idx
            "#,
        )
        .bind(owner_id)
        .bind(plan.starts())
        .bind(plan.ends())
        .fetch_all(&self.pool)
        .await?;

        Ok(Self::breakdown(plan, &sums))
    }

    /// Zip windows with their sums (1-based ordinal)
    fn breakdown(plan: &BucketPlan, sums: &[(i64, Decimal)]) -> EarningsBreakdown {
        let breakdown: Vec<EarningsBucket> = plan
            .windows
            .iter()
            .enumerate()
            .map(|(i, window)| EarningsBucket {
                label: window.label.clone(),
                earnings: sums
                    .iter()
                    .find(|(idx, _)| *idx == i as i64 + 1)
                    .map(|(_, sum)| *sum)
                    .unwrap_or(Decimal::ZERO),
            })
            .collect();

        EarningsBreakdown {
            unit: plan.unit,
            total_earnings: breakdown.iter().map(|b| b.earnings).sum(),
            breakdown,
        }
    }

    /// Average duration, busiest start hours and best customers
    pub async fn insights(
        &self,
        owner_id: i32,
        offset_seconds: i32,
    ) -> Result<StatsInsights, StatsError> {
        let (average,): (Option<f64>,) = sqlx::query_as(
            r#"
            SELECT AVG(EXTRACT(EPOCH FROM (b.end_time - b.start_time)) / 3600)::FLOAT8
            FROM bookings b
            JOIN turfs t ON t.id = b.turf_id
            WHERE t.owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        let peak_booking_hours = sqlx::query_as::<_, PeakHour>(
            r#"
            SELECT EXTRACT(HOUR FROM (b.start_time AT TIME ZONE 'UTC')
                                     + make_interval(secs => $2::FLOAT8))::INT4 AS hour,
                   COUNT(*) AS count
            FROM bookings b
            JOIN turfs t ON t.id = b.turf_id
            WHERE t.owner_id = $1
            GROUP BY 1
            ORDER BY count DESC, hour ASC
            LIMIT $3
            "#,
        )
        .bind(owner_id)
        .bind(offset_seconds as f64)
        .bind(TOP_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        let top_users = sqlx::query_as::<_, TopCustomer>(
            r#"
            SELECT b.user_id, u.name, u.email,
                   COUNT(*) AS booking_count,
                   SUM(b.price) AS total_spent
            FROM bookings b
            JOIN turfs t ON t.id = b.turf_id
            JOIN users u ON u.id = b.user_id
            WHERE t.owner_id = $1 AND b.status <> 'cancelled'
            GROUP BY b.user_id, u.name, u.email
            ORDER BY total_spent DESC, b.user_id ASC
            LIMIT $2
            "#,
        )
        .bind(owner_id)
        .bind(TOP_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(StatsInsights {
            average_booking_duration: average.map(round2).unwrap_or(0.0),
            peak_booking_hours,
            top_users,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{BucketUnit, EarningsWindow};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn plan(labels: &[&str]) -> BucketPlan {
        let base = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        BucketPlan {
            unit: BucketUnit::Day,
            windows: labels
                .iter()
                .enumerate()
                .map(|(i, label)| EarningsWindow {
                    label: label.to_string(),
                    start: base + Duration::days(i as i64),
                    end: base + Duration::days(i as i64 + 1),
                })
                .collect(),
        }
    }

    #[test]
    fn test_breakdown_fills_missing_windows_with_zero() {
        let plan = plan(&["Sunday", "Monday", "Tuesday"]);
        let result = StatsRepository::breakdown(&plan, &[(1, dec!(500)), (3, dec!(1200.50))]);

        assert_eq!(result.breakdown.len(), 3);
        assert_eq!(result.breakdown[0].label, "Sunday");
        assert_eq!(result.breakdown[1].earnings, Decimal::ZERO);
        assert_eq!(result.breakdown[2].earnings, dec!(1200.50));
        assert_eq!(result.total_earnings, dec!(1700.50));
    }
}
