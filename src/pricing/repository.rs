use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::pricing::{default_pricing, DayType, PriceEntry, PricingRow, TimeSlot};

/// Repository for per-turf hourly rates
#[derive(Clone)]
pub struct PricingRepository {
    pool: PgPool,
}

impl PricingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// All rates of a turf, weekday before weekend, morning to evening
    pub async fn find_for_turf(&self, turf_id: Uuid) -> Result<Vec<PricingRow>, sqlx::Error> {
        sqlx::query_as::<_, PricingRow>(
            r#"
            SELECT id, turf_id, day_type, time_slot, price, updated_at
            FROM pricing
            WHERE turf_id = $1
            ORDER BY
                CASE day_type WHEN 'weekday' THEN 0 ELSE 1 END,
                CASE time_slot WHEN 'morning' THEN 0 WHEN 'afternoon' THEN 1 ELSE 2 END
            "#,
        )
        .bind(turf_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Rate for one (day type, slot) pair
    pub async fn find_rate(
        &self,
        turf_id: Uuid,
        day_type: DayType,
        time_slot: TimeSlot,
    ) -> Result<Option<Decimal>, sqlx::Error> {
        sqlx::query_scalar::<_, Decimal>(
            "SELECT price FROM pricing WHERE turf_id = $1 AND day_type = $2 AND time_slot = $3",
        )
        .bind(turf_id)
        .bind(day_type)
        .bind(time_slot)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert or replace one rate
    pub async fn upsert(
        conn: &mut PgConnection,
        turf_id: Uuid,
        entry: &PriceEntry,
    ) -> Result<PricingRow, sqlx::Error> {
        sqlx::query_as::<_, PricingRow>(
            r#"
            INSERT INTO pricing (turf_id, day_type, time_slot, price)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (turf_id, day_type, time_slot)
            DO UPDATE SET price = EXCLUDED.price, updated_at = NOW()
            RETURNING id, turf_id, day_type, time_slot, price, updated_at
            "#,
        )
        .bind(turf_id)
        .bind(entry.day_type)
        .bind(entry.time_slot)
        .bind(entry.price)
        .fetch_one(conn)
        .await
    }

    /// Insert any of the six default rates the turf is missing
    ///
    /// Existing rows are left untouched. Returns the number of rows created.
    pub async fn insert_defaults(conn: &mut PgConnection, turf_id: Uuid) -> Result<u64, sqlx::Error> {
        let mut created = 0;
        for (day_type, time_slot, price) in default_pricing() {
            let result = sqlx::query(
                r#"
                INSERT INTO pricing (turf_id, day_type, time_slot, price)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (turf_id, day_type, time_slot) DO NOTHING
                "#,
            )
            .bind(turf_id)
            .bind(day_type)
            .bind(time_slot)
            .bind(price)
            .execute(&mut *conn)
            .await?;
            created += result.rows_affected();
        }
        Ok(created)
    }
}
