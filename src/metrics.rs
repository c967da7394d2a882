// Performance Metrics for the booking engine
//
// Tracks execution times, cache hit rates, and slow operations
// for booking creation, overlap checks, price resolution and stats.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use utoipa::ToSchema;

/// Performance threshold for slow operations (100ms)
const SLOW_OPERATION_THRESHOLD_MS: u64 = 100;

/// Shared performance counters
#[derive(Debug, Clone, Default)]
pub struct PerformanceMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    // Cache metrics
    pricing_cache_hits: AtomicU64,
    pricing_cache_misses: AtomicU64,
    stats_cache_hits: AtomicU64,
    stats_cache_misses: AtomicU64,
    stats_inflight_joins: AtomicU64,

    // Timed operations
    booking_creations: OperationCounters,
    overlap_checks: OperationCounters,
    price_resolutions: OperationCounters,
    stats_computations: OperationCounters,
}

#[derive(Debug, Default)]
struct OperationCounters {
    count: AtomicU64,
    total_time_us: AtomicU64,
    slow: AtomicU64,
}

impl OperationCounters {
    fn record(&self, name: &str, duration: Duration) {
        self.count.fetch_add(1, Ordering::Relaxed);
        self.total_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);

        if duration.as_millis() as u64 > SLOW_OPERATION_THRESHOLD_MS {
            self.slow.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Slow {}: {}ms", name, duration.as_millis());
        }
    }

    fn avg_ms(&self) -> f64 {
        let count = self.count.load(Ordering::Relaxed);
        let total_us = self.total_time_us.load(Ordering::Relaxed);

        if count == 0 {
            0.0
        } else {
            (total_us as f64 / count as f64) / 1000.0
        }
    }

    fn summary(&self) -> OperationSummary {
        OperationSummary {
            count: self.count.load(Ordering::Relaxed),
            avg_ms: self.avg_ms(),
            slow: self.slow.load(Ordering::Relaxed),
        }
    }
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_pricing_cache_hit(&self) {
        self.inner.pricing_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_pricing_cache_miss(&self) {
        self.inner.pricing_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stats_cache_hit(&self) {
        self.inner.stats_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stats_cache_miss(&self) {
        self.inner.stats_cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// A stats request attached to a computation already in flight
    pub fn record_stats_inflight_join(&self) {
        self.inner.stats_inflight_joins.fetch_add(1, Ordering::Relaxed);
    }

    /// Pricing cache hit rate (0.0 to 1.0)
    pub fn pricing_cache_hit_rate(&self) -> f64 {
        hit_rate(
            self.inner.pricing_cache_hits.load(Ordering::Relaxed),
            self.inner.pricing_cache_misses.load(Ordering::Relaxed),
        )
    }

    pub fn start_booking_creation(&self) -> OperationTimer {
        OperationTimer::new(OperationType::BookingCreation, self.clone())
    }

    pub fn start_overlap_check(&self) -> OperationTimer {
        OperationTimer::new(OperationType::OverlapCheck, self.clone())
    }

    pub fn start_price_resolution(&self) -> OperationTimer {
        OperationTimer::new(OperationType::PriceResolution, self.clone())
    }

    pub fn start_stats_computation(&self) -> OperationTimer {
        OperationTimer::new(OperationType::StatsComputation, self.clone())
    }

    fn record(&self, operation: OperationType, duration: Duration) {
        let counters = match operation {
            OperationType::BookingCreation => &self.inner.booking_creations,
            OperationType::OverlapCheck => &self.inner.overlap_checks,
            OperationType::PriceResolution => &self.inner.price_resolutions,
            OperationType::StatsComputation => &self.inner.stats_computations,
        };
        counters.record(operation.name(), duration);
    }

    /// Snapshot of every counter
    pub fn summary(&self) -> MetricsSummary {
        let inner = &self.inner;
        MetricsSummary {
            pricing_cache_hits: inner.pricing_cache_hits.load(Ordering::Relaxed),
            pricing_cache_misses: inner.pricing_cache_misses.load(Ordering::Relaxed),
            pricing_cache_hit_rate: self.pricing_cache_hit_rate(),
            stats_cache_hits: inner.stats_cache_hits.load(Ordering::Relaxed),
            stats_cache_misses: inner.stats_cache_misses.load(Ordering::Relaxed),
            stats_inflight_joins: inner.stats_inflight_joins.load(Ordering::Relaxed),
            booking_creations: inner.booking_creations.summary(),
            overlap_checks: inner.overlap_checks.summary(),
            price_resolutions: inner.price_resolutions.summary(),
            stats_computations: inner.stats_computations.summary(),
        }
    }

    /// Log the current summary at info level
    pub fn log_summary(&self) {
        let summary = self.summary();
        tracing::info!(
            "Booking engine metrics: bookings={} (avg {:.2}ms, slow {}), overlap_checks={} (avg {:.2}ms), pricing cache hit rate {:.1}%, stats joins={}",
            summary.booking_creations.count,
            summary.booking_creations.avg_ms,
            summary.booking_creations.slow,
            summary.overlap_checks.count,
            summary.overlap_checks.avg_ms,
            summary.pricing_cache_hit_rate * 100.0,
            summary.stats_inflight_joins,
        );
    }
}

fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

#[derive(Debug, Clone, Copy)]
enum OperationType {
    BookingCreation,
    OverlapCheck,
    PriceResolution,
    StatsComputation,
}

impl OperationType {
    fn name(&self) -> &'static str {
        match self {
            OperationType::BookingCreation => "booking creation",
            OperationType::OverlapCheck => "overlap check",
            OperationType::PriceResolution => "price resolution",
            OperationType::StatsComputation => "stats computation",
        }
    }
}

/// Records the elapsed time of an operation when dropped
pub struct OperationTimer {
    operation: OperationType,
    metrics: PerformanceMetrics,
    start: Instant,
}

impl OperationTimer {
    fn new(operation: OperationType, metrics: PerformanceMetrics) -> Self {
        Self {
            operation,
            metrics,
            start: Instant::now(),
        }
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        self.metrics.record(self.operation, self.start.elapsed());
    }
}

/// Per-operation timing snapshot
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OperationSummary {
    pub count: u64,
    pub avg_ms: f64,
    pub slow: u64,
}

/// Snapshot returned by GET /api/admin/metrics
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MetricsSummary {
    pub pricing_cache_hits: u64,
    pub pricing_cache_misses: u64,
    pub pricing_cache_hit_rate: f64,
    pub stats_cache_hits: u64,
    pub stats_cache_misses: u64,
    pub stats_inflight_joins: u64,
    pub booking_creations: OperationSummary,
    pub overlap_checks: OperationSummary,
    pub price_resolutions: OperationSummary,
    pub stats_computations: OperationSummary,
}
