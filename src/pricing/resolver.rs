// Pricing Resolver
//
// Resolves the hourly rate for a booking start and computes its price.
// Rates are read through a per-instance TTL cache keyed by
// (turf, day type, time slot). Writers invalidate a turf's entries after
// their transaction commits.

use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::cache::TtlCache;
use crate::metrics::PerformanceMetrics;
use crate::pricing::{DayType, PriceCalculator, PricingError, PricingRepository, TimeSlot};

type RateKey = (Uuid, DayType, TimeSlot);

pub struct PricingResolver {
    repo: PricingRepository,
    cache: RwLock<TtlCache<RateKey, Decimal>>,
    venue_offset: FixedOffset,
    metrics: PerformanceMetrics,
}

impl PricingResolver {
    pub fn new(
        repo: PricingRepository,
        cache_ttl: Duration,
        venue_offset: FixedOffset,
        metrics: PerformanceMetrics,
    ) -> Self {
        Self {
            repo,
            cache: RwLock::new(TtlCache::new(cache_ttl)),
            venue_offset,
            metrics,
        }
    }

    /// Hourly rate for a (day type, slot) pair
    ///
    /// A missing row is reported as `NotConfigured` and is not cached.
    pub async fn rate(
        &self,
        turf_id: Uuid,
        day_type: DayType,
        time_slot: TimeSlot,
    ) -> Result<Decimal, PricingError> {
        let key = (turf_id, day_type, time_slot);

        {
            let cache = self.cache.read().await;
            if let Some(rate) = cache.get(&key) {
                self.metrics.record_pricing_cache_hit();
                return Ok(rate);
            }
        }

        self.metrics.record_pricing_cache_miss();

        let mut cache = self.cache.write().await;

        // Another task may have loaded it while we waited for the lock
        if let Some(rate) = cache.get(&key) {
            return Ok(rate);
        }

        let rate = self
            .repo
            .find_rate(turf_id, day_type, time_slot)
            .await?
            .ok_or(PricingError::NotConfigured {
                turf_id,
                day_type,
                time_slot,
            })?;

        debug!("Cached {} {} rate for turf {}", day_type, time_slot, turf_id);
        cache.insert(key, rate);
        Ok(rate)
    }

    /// Price of a booking on `turf_id` over [start, end)
    ///
    /// The rate is chosen by the start instant alone, read in the venue offset.
    pub async fn calculate_price(
        &self,
        turf_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Decimal, PricingError> {
        let _timer = self.metrics.start_price_resolution();

        let (day_type, time_slot) = PriceCalculator::classify(start, self.venue_offset);
        let rate = self.rate(turf_id, day_type, time_slot).await?;
        Ok(PriceCalculator::calculate_price(rate, start, end))
    }

    /// Drop every cached rate of a turf
    pub async fn invalidate_turf(&self, turf_id: Uuid) {
        let mut cache = self.cache.write().await;
        cache.retain(|(id, _, _)| *id != turf_id);
        debug!("Pricing cache invalidated for turf {}", turf_id);
    }

    /// Drop expired rates, returning how many were removed
    pub async fn purge_stale(&self) -> usize {
        self.cache.write().await.purge_stale()
    }
}
