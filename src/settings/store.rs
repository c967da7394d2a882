// Settings Store
//
// Per-turf key/value configuration. Reads are public, writes require the
// turf's owner and run in a single transaction.

use tracing::info;
use uuid::Uuid;

use crate::settings::{
    validate_setting_key, validate_setting_value, BookingPolicy, BookingStatusResponse, Setting,
    SettingInput, SettingsError, SettingsRepository, BOOKING_DISABLED, DISABLED_REASON,
};
use crate::turfs::{ensure_owner, TurfRepository};

#[derive(Clone)]
pub struct SettingsStore {
    repo: SettingsRepository,
    turf_repo: TurfRepository,
}

impl SettingsStore {
    pub fn new(repo: SettingsRepository, turf_repo: TurfRepository) -> Self {
        Self { repo, turf_repo }
    }

    /// Whether user bookings are blocked for a turf, with the reason shown to users
    pub async fn is_booking_disabled(
        &self,
        turf_id: Uuid,
    ) -> Result<BookingStatusResponse, SettingsError> {
        let policy = self.policy(turf_id).await?;
        Ok(BookingStatusResponse {
            disabled: policy.booking_disabled,
            reason: policy.disabled_reason,
        })
    }

    /// Typed policy for the booking engine
    pub async fn policy(&self, turf_id: Uuid) -> Result<BookingPolicy, SettingsError> {
        let settings = self.repo.find_all(turf_id).await?;
        Ok(BookingPolicy::from_settings(&settings))
    }

    /// Set the disabled flag and reason together
    pub async fn update_booking_status(
        &self,
        turf_id: Uuid,
        admin_id: i32,
        disabled: bool,
        reason: Option<String>,
    ) -> Result<BookingStatusResponse, SettingsError> {
        self.ensure_owned(turf_id, admin_id).await?;

        let reason = reason.map(|r| r.trim().to_string()).unwrap_or_default();
        let flag = disabled.to_string();

        let mut tx = self.repo.pool().begin().await?;
        SettingsRepository::upsert(&mut *tx, turf_id, BOOKING_DISABLED, &flag, None).await?;
        SettingsRepository::upsert(&mut *tx, turf_id, DISABLED_REASON, &reason, None).await?;
        tx.commit().await?;

        info!(
            "Bookings for turf {} {} by admin {}",
            turf_id,
            if disabled { "disabled" } else { "enabled" },
            admin_id
        );
        Ok(BookingStatusResponse { disabled, reason })
    }

    pub async fn get_all(&self, turf_id: Uuid) -> Result<Vec<Setting>, SettingsError> {
        self.ensure_exists(turf_id).await?;
        Ok(self.repo.find_all(turf_id).await?)
    }

    pub async fn get_one(&self, turf_id: Uuid, key: &str) -> Result<Setting, SettingsError> {
        self.ensure_exists(turf_id).await?;
        self.repo
            .find_one(turf_id, key)
            .await?
            .ok_or_else(|| SettingsError::NotFound {
                turf_id,
                key: key.to_string(),
            })
    }

    pub async fn update_one(
        &self,
        turf_id: Uuid,
        admin_id: i32,
        key: &str,
        value: &str,
        description: Option<&str>,
    ) -> Result<Setting, SettingsError> {
        validate_setting_key(key).map_err(SettingsError::InvalidValue)?;
        validate_setting_value(key, value).map_err(SettingsError::InvalidValue)?;
        self.ensure_owned(turf_id, admin_id).await?;

        let mut conn = self.repo.pool().acquire().await?;
        let setting =
            SettingsRepository::upsert(&mut *conn, turf_id, key, value.trim(), description).await?;

        info!("Setting {} updated for turf {}", key, turf_id);
        Ok(setting)
    }

    /// Write several settings; every entry is validated before anything is written
    pub async fn bulk_update(
        &self,
        turf_id: Uuid,
        admin_id: i32,
        settings: Vec<SettingInput>,
    ) -> Result<Vec<Setting>, SettingsError> {
        for input in &settings {
            validate_setting_key(&input.key).map_err(SettingsError::InvalidValue)?;
            validate_setting_value(&input.key, &input.value).map_err(SettingsError::InvalidValue)?;
        }
        self.ensure_owned(turf_id, admin_id).await?;

        let mut tx = self.repo.pool().begin().await?;
        let mut written = Vec::with_capacity(settings.len());
        for input in &settings {
            let setting = SettingsRepository::upsert(
                &mut *tx,
                turf_id,
                &input.key,
                input.value.trim(),
                input.description.as_deref(),
            )
            .await?;
            written.push(setting);
        }
        tx.commit().await?;

        info!("{} settings updated for turf {}", written.len(), turf_id);
        Ok(written)
    }

    /// Seed any missing default setting for an owned turf
    pub async fn create_defaults(
        &self,
        turf_id: Uuid,
        admin_id: i32,
    ) -> Result<Vec<Setting>, SettingsError> {
        self.ensure_owned(turf_id, admin_id).await?;

        let mut conn = self.repo.pool().acquire().await?;
        let created = SettingsRepository::insert_defaults(&mut *conn, turf_id).await?;
        drop(conn);

        info!("Seeded {} default settings for turf {}", created, turf_id);
        Ok(self.repo.find_all(turf_id).await?)
    }

    async fn ensure_exists(&self, turf_id: Uuid) -> Result<(), SettingsError> {
        self.turf_repo
            .find_by_id(turf_id)
            .await?
            .ok_or(SettingsError::TurfNotFound(turf_id))?;
        Ok(())
    }

    async fn ensure_owned(&self, turf_id: Uuid, admin_id: i32) -> Result<(), SettingsError> {
        let turf = self
            .turf_repo
            .find_by_id(turf_id)
            .await?
            .ok_or(SettingsError::TurfNotFound(turf_id))?;
        ensure_owner(&turf, admin_id)?;
        Ok(())
    }
}
