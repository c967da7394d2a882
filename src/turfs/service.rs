use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::pricing::{PricingRepository, PricingResolver};
use crate::settings::SettingsRepository;
use crate::stats::StatsService;
use crate::turfs::{
    default_closing_time, default_opening_time, validate_hours, CreateTurfRequest, Turf,
    TurfError, TurfListQuery, TurfRepository, TurfStatus, UpdateTurfRequest,
};

/// Service for turf management
#[derive(Clone)]
pub struct TurfService {
    repo: TurfRepository,
    pricing_resolver: Arc<PricingResolver>,
    stats_service: Arc<StatsService>,
}

impl TurfService {
    pub fn new(
        repo: TurfRepository,
        pricing_resolver: Arc<PricingResolver>,
        stats_service: Arc<StatsService>,
    ) -> Self {
        Self {
            repo,
            pricing_resolver,
            stats_service,
        }
    }

    /// Create a turf owned by `owner_id`
    ///
    /// The turf row, the six default pricing rows and the default settings
    /// are written in one transaction, so a turf never exists without them.
    pub async fn create(&self, owner_id: i32, request: CreateTurfRequest) -> Result<Turf, TurfError> {
        let opening = request.opening_time.unwrap_or_else(default_opening_time);
        let closing = request.closing_time.unwrap_or_else(default_closing_time);
        validate_hours(opening, closing).map_err(TurfError::InvalidHours)?;

        let mut tx = self.repo.pool().begin().await?;
        let turf = TurfRepository::insert(&mut *tx, owner_id, &request, opening, closing).await?;
        PricingRepository::insert_defaults(&mut *tx, turf.id).await?;
        SettingsRepository::insert_defaults(&mut *tx, turf.id).await?;
        tx.commit().await?;

        info!("Turf {} created by admin {}", turf.id, owner_id);
        Ok(turf)
    }

    pub async fn get(&self, id: Uuid) -> Result<Turf, TurfError> {
        self.repo.find_by_id(id).await?.ok_or(TurfError::NotFound(id))
    }

    /// Fetch a turf and check that `owner_id` owns it
    pub async fn get_owned(&self, id: Uuid, owner_id: i32) -> Result<Turf, TurfError> {
        let turf = self.get(id).await?;
        ensure_owner(&turf, owner_id)?;
        Ok(turf)
    }

    pub async fn list(&self, query: TurfListQuery) -> Result<Vec<Turf>, TurfError> {
        self.repo.list(&query).await
    }

    pub async fn list_owned(&self, owner_id: i32) -> Result<Vec<Turf>, TurfError> {
        self.repo.list_by_owner(owner_id).await
    }

    /// Update whitelisted fields of an owned turf
    pub async fn update(
        &self,
        id: Uuid,
        owner_id: i32,
        request: UpdateTurfRequest,
    ) -> Result<Turf, TurfError> {
        let mut tx = self.repo.pool().begin().await?;

        let current = TurfRepository::find_for_update(&mut *tx, id)
            .await?
            .ok_or(TurfError::NotFound(id))?;
        ensure_owner(&current, owner_id)?;

        let opening = request.opening_time.unwrap_or(current.opening_time);
        let closing = request.closing_time.unwrap_or(current.closing_time);
        validate_hours(opening, closing).map_err(TurfError::InvalidHours)?;

        let updated = TurfRepository::apply_update(&mut *tx, id, &request).await?;
        tx.commit().await?;

        info!("Turf {} updated by admin {}", id, owner_id);
        Ok(updated)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        owner_id: i32,
        status: TurfStatus,
    ) -> Result<Turf, TurfError> {
        self.get_owned(id, owner_id).await?;
        let turf = self.repo.update_status(id, status).await?;
        info!("Turf {} status set to {}", id, status);
        Ok(turf)
    }

    /// Deactivate a turf; its bookings and configuration stay in place
    pub async fn soft_delete(&self, id: Uuid, owner_id: i32) -> Result<Turf, TurfError> {
        self.update_status(id, owner_id, TurfStatus::Inactive).await
    }

    /// Remove a turf and everything attached to it
    pub async fn hard_delete(&self, id: Uuid, owner_id: i32) -> Result<(), TurfError> {
        self.get_owned(id, owner_id).await?;

        if !self.repo.delete(id).await? {
            return Err(TurfError::NotFound(id));
        }

        self.pricing_resolver.invalidate_turf(id).await;
        self.stats_service.invalidate(owner_id).await;

        info!("Turf {} permanently deleted by admin {}", id, owner_id);
        Ok(())
    }
}

pub fn ensure_owner(turf: &Turf, owner_id: i32) -> Result<(), TurfError> {
    if !turf.is_owned_by(owner_id) {
        return Err(TurfError::Forbidden(format!(
            "Turf {} is not managed by this account",
            turf.id
        )));
    }
    Ok(())
}
