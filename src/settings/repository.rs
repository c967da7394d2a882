use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::settings::{Setting, DEFAULT_SETTINGS};

/// Repository for per-turf settings
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn find_all(&self, turf_id: Uuid) -> Result<Vec<Setting>, sqlx::Error> {
        sqlx::query_as::<_, Setting>(
            r#"
            SELECT id, turf_id, key, value, description, updated_at
            FROM settings
            WHERE turf_id = $1
            ORDER BY key
            "#,
        )
        .bind(turf_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_one(&self, turf_id: Uuid, key: &str) -> Result<Option<Setting>, sqlx::Error> {
        sqlx::query_as::<_, Setting>(
            r#"
            SELECT id, turf_id, key, value, description, updated_at
            FROM settings
            WHERE turf_id = $1 AND key = $2
            "#,
        )
        .bind(turf_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await
    }

    /// Insert or replace a value; a missing description keeps the stored one
    pub async fn upsert(
        conn: &mut PgConnection,
        turf_id: Uuid,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<Setting, sqlx::Error> {
        sqlx::query_as::<_, Setting>(
            r#"
            INSERT INTO settings (turf_id, key, value, description)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (turf_id, key)
            DO UPDATE SET value = EXCLUDED.value,
                          description = COALESCE(EXCLUDED.description, settings.description),
                          updated_at = NOW()
            RETURNING id, turf_id, key, value, description, updated_at
            "#,
        )
        .bind(turf_id)
        .bind(key)
        .bind(value)
        .bind(description)
        .fetch_one(conn)
        .await
    }

    /// Insert any default setting the turf is missing, leaving existing values alone
    pub async fn insert_defaults(conn: &mut PgConnection, turf_id: Uuid) -> Result<u64, sqlx::Error> {
        let mut created = 0;
        for (key, value, description) in DEFAULT_SETTINGS {
            let result = sqlx::query(
                r#"
                INSERT INTO settings (turf_id, key, value, description)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (turf_id, key) DO NOTHING
                "#,
            )
            .bind(turf_id)
            .bind(key)
            .bind(value)
            .bind(description)
            .execute(&mut *conn)
            .await?;
            created += result.rows_affected();
        }
        Ok(created)
    }
}
