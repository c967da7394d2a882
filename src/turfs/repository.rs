use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::turfs::error::TurfError;
use crate::turfs::models::{
    CreateTurfRequest, Turf, TurfListQuery, TurfStatus, UpdateTurfRequest,
};

const TURF_COLUMNS: &str = "id, owner_id, name, description, address, city, state, phone, \
     amenities, status, opening_time, closing_time, created_at, updated_at";

/// Repository for turf operations
#[derive(Clone)]
pub struct TurfRepository {
    pool: PgPool,
}

impl TurfRepository {
    /// Create a new TurfRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a turf on an open connection or transaction
    pub async fn insert(
        conn: &mut PgConnection,
        owner_id: i32,
        request: &CreateTurfRequest,
        opening_time: chrono::NaiveTime,
        closing_time: chrono::NaiveTime,
    ) -> Result<Turf, TurfError> {
        let sql = format!(
            r#"
            INSERT INTO turfs (id, owner_id, name, description, address, city, state, phone,
                               amenities, status, opening_time, closing_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'active', $10, $11)
            RETURNING {}
            "#,
            TURF_COLUMNS
        );

        let turf = sqlx::query_as::<_, Turf>(&sql)
            .bind(Uuid::new_v4())
            .bind(owner_id)
            .bind(request.name.trim())
            .bind(&request.description)
            .bind(request.address.trim())
            .bind(request.city.trim())
            .bind(request.state.trim())
            .bind(&request.phone)
            .bind(&request.amenities)
            .bind(opening_time)
            .bind(closing_time)
            .fetch_one(conn)
            .await?;

        Ok(turf)
    }

    /// Find a turf by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Turf>, TurfError> {
        let sql = format!("SELECT {} FROM turfs WHERE id = $1", TURF_COLUMNS);
        let turf = sqlx::query_as::<_, Turf>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(turf)
    }

    /// Lock a turf row for the rest of the transaction
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Turf>, TurfError> {
        let sql = format!("SELECT {} FROM turfs WHERE id = $1 FOR UPDATE", TURF_COLUMNS);
        let turf = sqlx::query_as::<_, Turf>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(turf)
    }

    /// List turfs by status with optional case-insensitive city and state
    pub async fn list(&self, query: &TurfListQuery) -> Result<Vec<Turf>, TurfError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM turfs
            WHERE status = $1
              AND ($2::text IS NULL OR LOWER(city) = LOWER($2))
              AND ($3::text IS NULL OR LOWER(state) = LOWER($3))
            ORDER BY created_at DESC
            "#,
            TURF_COLUMNS
        );

        let turfs = sqlx::query_as::<_, Turf>(&sql)
            .bind(query.status.unwrap_or_default())
            .bind(query.city.as_deref().map(str::trim))
            .bind(query.state.as_deref().map(str::trim))
            .fetch_all(&self.pool)
            .await?;

        Ok(turfs)
    }

    /// All turfs owned by an admin, any status
    pub async fn list_by_owner(&self, owner_id: i32) -> Result<Vec<Turf>, TurfError> {
        let sql = format!(
            "SELECT {} FROM turfs WHERE owner_id = $1 ORDER BY created_at DESC",
            TURF_COLUMNS
        );
        let turfs = sqlx::query_as::<_, Turf>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(turfs)
    }

    /// Apply the whitelisted fields of an update; absent fields keep their value
    pub async fn apply_update(
        conn: &mut PgConnection,
        id: Uuid,
        request: &UpdateTurfRequest,
    ) -> Result<Turf, TurfError> {
        let sql = format!(
            r#"
            UPDATE turfs
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                address = COALESCE($4, address),
                city = COALESCE($5, city),
                state = COALESCE($6, state),
                phone = COALESCE($7, phone),
                amenities = COALESCE($8, amenities),
                opening_time = COALESCE($9, opening_time),
                closing_time = COALESCE($10, closing_time),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            TURF_COLUMNS
        );

        let turf = sqlx::query_as::<_, Turf>(&sql)
            .bind(id)
            .bind(request.name.as_deref().map(str::trim))
            .bind(&request.description)
            .bind(request.address.as_deref().map(str::trim))
            .bind(request.city.as_deref().map(str::trim))
            .bind(request.state.as_deref().map(str::trim))
            .bind(&request.phone)
            .bind(&request.amenities)
            .bind(request.opening_time)
            .bind(request.closing_time)
            .fetch_optional(conn)
            .await?
            .ok_or(TurfError::NotFound(id))?;

        Ok(turf)
    }

    pub async fn update_status(&self, id: Uuid, status: TurfStatus) -> Result<Turf, TurfError> {
        let sql = format!(
            "UPDATE turfs SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            TURF_COLUMNS
        );
        let turf = sqlx::query_as::<_, Turf>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(TurfError::NotFound(id))?;

        Ok(turf)
    }

    /// Remove a turf; bookings, pricing, settings and reviews cascade
    pub async fn delete(&self, id: Uuid) -> Result<bool, TurfError> {
        let result = sqlx::query("DELETE FROM turfs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
