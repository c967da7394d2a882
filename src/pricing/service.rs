use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::pricing::{
    PriceEntry, PricingError, PricingRepository, PricingResolver, PricingRow,
};
use crate::turfs::{ensure_owner, TurfRepository};

/// Admin-facing pricing management
#[derive(Clone)]
pub struct PricingService {
    repo: PricingRepository,
    turf_repo: TurfRepository,
    resolver: Arc<PricingResolver>,
}

impl PricingService {
    pub fn new(
        repo: PricingRepository,
        turf_repo: TurfRepository,
        resolver: Arc<PricingResolver>,
    ) -> Self {
        Self {
            repo,
            turf_repo,
            resolver,
        }
    }

    /// Every configured rate of a turf
    pub async fn get_all(&self, turf_id: Uuid) -> Result<Vec<PricingRow>, PricingError> {
        self.turf_repo
            .find_by_id(turf_id)
            .await?
            .ok_or(PricingError::TurfNotFound(turf_id))?;

        Ok(self.repo.find_for_turf(turf_id).await?)
    }

    /// Upsert rates for an owned turf in one transaction
    ///
    /// Cached rates for the turf are dropped only once the write is committed.
    pub async fn update(
        &self,
        turf_id: Uuid,
        admin_id: i32,
        prices: Vec<PriceEntry>,
    ) -> Result<Vec<PricingRow>, PricingError> {
        validate_prices(&prices)?;
        self.ensure_owned(turf_id, admin_id).await?;

        let mut tx = self.repo.pool().begin().await?;
        let mut rows = Vec::with_capacity(prices.len());
        for entry in &prices {
            rows.push(PricingRepository::upsert(&mut *tx, turf_id, entry).await?);
        }
        tx.commit().await?;

        self.resolver.invalidate_turf(turf_id).await;

        info!("Updated {} rates for turf {}", rows.len(), turf_id);
        Ok(rows)
    }

    /// Seed missing default rates for an owned turf
    pub async fn create_defaults(
        &self,
        turf_id: Uuid,
        admin_id: i32,
    ) -> Result<Vec<PricingRow>, PricingError> {
        self.ensure_owned(turf_id, admin_id).await?;

        let mut conn = self.repo.pool().acquire().await?;
        let created = PricingRepository::insert_defaults(&mut *conn, turf_id).await?;
        drop(conn);

        if created > 0 {
            self.resolver.invalidate_turf(turf_id).await;
        }

        info!("Seeded {} default rates for turf {}", created, turf_id);
        Ok(self.repo.find_for_turf(turf_id).await?)
    }

    async fn ensure_owned(&self, turf_id: Uuid, admin_id: i32) -> Result<(), PricingError> {
        let turf = self
            .turf_repo
            .find_by_id(turf_id)
            .await?
            .ok_or(PricingError::TurfNotFound(turf_id))?;
        ensure_owner(&turf, admin_id)?;
        Ok(())
    }
}

/// Prices are non-negative money amounts with at most two decimal places
pub fn validate_prices(prices: &[PriceEntry]) -> Result<(), PricingError> {
    if prices.is_empty() {
        return Err(PricingError::InvalidPrice(
            "At least one price is required".to_string(),
        ));
    }

    for entry in prices {
        if entry.price < Decimal::ZERO {
            return Err(PricingError::InvalidPrice(format!(
                "{} {} price must not be negative",
                entry.day_type, entry.time_slot
            )));
        }
        if entry.price.round_dp(2) != entry.price {
            return Err(PricingError::InvalidPrice(format!(
                "{} {} price must have at most 2 decimal places",
                entry.day_type, entry.time_slot
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{DayType, TimeSlot};
    use rust_decimal_macros::dec;

    fn entry(price: Decimal) -> PriceEntry {
        PriceEntry {
            day_type: DayType::Weekday,
            time_slot: TimeSlot::Morning,
            price,
        }
    }

    #[test]
    fn test_zero_price_is_allowed() {
        assert!(validate_prices(&[entry(dec!(0))]).is_ok());
        assert!(validate_prices(&[entry(dec!(650.50))]).is_ok());
    }

    #[test]
    fn test_negative_price_is_rejected() {
        let result = validate_prices(&[entry(dec!(100)), entry(dec!(-1))]);
        assert!(matches!(result, Err(PricingError::InvalidPrice(_))));
    }

    #[test]
    fn test_sub_cent_price_is_rejected() {
        assert!(validate_prices(&[entry(dec!(10.005))]).is_err());
    }

    #[test]
    fn test_empty_update_is_rejected() {
        assert!(validate_prices(&[]).is_err());
    }
}
