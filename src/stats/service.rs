// Statistics Aggregator
//
// Builds the admin dashboard payload. Results are memoised per admin with a
// TTL, and concurrent requests for the same admin share one computation.
// Booking and review writes call `invalidate` for the turf owner.

use chrono::{DateTime, FixedOffset, Utc};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::metrics::PerformanceMetrics;
use crate::stats::{buckets, AdminStats, StatsError, StatsRepository};

type StatsResult = Result<Arc<AdminStats>, StatsError>;
type InFlight = Shared<BoxFuture<'static, StatsResult>>;

pub struct StatsService {
    repo: StatsRepository,
    cache: RwLock<TtlCache<i32, Arc<AdminStats>>>,
    in_flight: Mutex<HashMap<i32, InFlight>>,
    venue_offset: FixedOffset,
    metrics: PerformanceMetrics,
}

impl StatsService {
    pub fn new(
        repo: StatsRepository,
        cache_ttl: Duration,
        venue_offset: FixedOffset,
        metrics: PerformanceMetrics,
    ) -> Self {
        Self {
            repo,
            cache: RwLock::new(TtlCache::new(cache_ttl)),
            in_flight: Mutex::new(HashMap::new()),
            venue_offset,
            metrics,
        }
    }

    /// Dashboard stats for `admin_id`
    ///
    /// `refresh` skips the memo but still joins a computation already running.
    /// Only successful results are memoised.
    pub async fn get(&self, admin_id: i32, refresh: bool) -> StatsResult {
        if !refresh {
            if let Some(stats) = self.cache.read().await.get(&admin_id) {
                self.metrics.record_stats_cache_hit();
                return Ok(stats);
            }
        }

        let computation = {
            let mut in_flight = self.in_flight.lock().await;

            // A computation may have finished while we waited for the lock
            if !refresh {
                if let Some(stats) = self.cache.read().await.get(&admin_id) {
                    self.metrics.record_stats_cache_hit();
                    return Ok(stats);
                }
            }
            self.metrics.record_stats_cache_miss();

            match in_flight.get(&admin_id) {
                Some(running) => {
                    debug!("Joining in-flight stats computation for admin {}", admin_id);
                    self.metrics.record_stats_inflight_join();
                    running.clone()
                }
                None => {
                    let computation = self.spawn_computation(admin_id);
                    in_flight.insert(admin_id, computation.clone());
                    computation
                }
            }
        };

        let result = computation.clone().await;

        // Whoever removes the entry memoises the result. An invalidation in
        // the meantime removed it already, so a stale payload is never stored.
        let mut in_flight = self.in_flight.lock().await;
        if in_flight
            .get(&admin_id)
            .is_some_and(|running| running.ptr_eq(&computation))
        {
            in_flight.remove(&admin_id);
            if let Ok(stats) = &result {
                self.cache.write().await.insert(admin_id, Arc::clone(stats));
            }
        }

        result
    }

    fn spawn_computation(&self, admin_id: i32) -> InFlight {
        let repo = self.repo.clone();
        let offset = self.venue_offset;
        let metrics = self.metrics.clone();

        async move {
            let _timer = metrics.start_stats_computation();
            let stats = compute(&repo, admin_id, Utc::now(), offset).await?;
            info!("Computed dashboard stats for admin {}", admin_id);
            Ok::<_, StatsError>(Arc::new(stats))
        }
        .boxed()
        .shared()
    }

    /// Forget the memoised payload of one admin
    ///
    /// A computation still running for that admin is detached so its result
    /// is returned to its callers but not memoised.
    pub async fn invalidate(&self, admin_id: i32) {
        let mut in_flight = self.in_flight.lock().await;
        in_flight.remove(&admin_id);
        self.cache.write().await.invalidate(&admin_id);
        debug!("Stats cache invalidated for admin {}", admin_id);
    }

    /// Drop expired payloads, returning how many were removed
    pub async fn purge_stale(&self) -> usize {
        self.cache.write().await.purge_stale()
    }

    pub async fn is_cached(&self, admin_id: i32) -> bool {
        self.cache.read().await.get(&admin_id).is_some()
    }
}

/// Run every aggregate for one admin at `now`
pub async fn compute(
    repo: &StatsRepository,
    admin_id: i32,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Result<AdminStats, StatsError> {
    let day_plan = buckets::last_7_days(now, offset);
    let week_plan = buckets::current_week(now, offset);
    let five_week_plan = buckets::last_5_weeks(now, offset);
    let month_plan = buckets::this_month(now, offset);
    let year_plan = buckets::this_year(now, offset);

    let (overview, last_7_days, current_week, last_5_weeks, this_month, this_year, insights) =
        tokio::try_join!(
            repo.overview(admin_id, now),
            repo.earnings(admin_id, &day_plan),
            repo.earnings(admin_id, &week_plan),
            repo.earnings(admin_id, &five_week_plan),
            repo.earnings(admin_id, &month_plan),
            repo.earnings(admin_id, &year_plan),
            repo.insights(admin_id, offset.local_minus_utc()),
        )?;

    Ok(AdminStats {
        overview,
        last_7_days,
        current_week,
        last_5_weeks,
        this_month,
        this_year,
        insights,
        generated_at: now,
    })
}
