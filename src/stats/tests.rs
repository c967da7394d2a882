use super::*;
use crate::auth::Role;
use crate::config::AppConfig;
use crate::metrics::PerformanceMetrics;
use crate::test_support::{
    booking_request, create_test_pool, create_turf, create_user, database_url, on_behalf_request,
    test_state,
};
use rust_decimal::Decimal;
use std::sync::Arc;

#[tokio::test]
async fn test_new_admin_has_empty_stats() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let admin = create_user(&pool, Role::Admin).await;

    let stats = state.stats_service.get(admin, false).await.unwrap();

    assert_eq!(stats.overview.total_bookings, 0);
    assert_eq!(stats.overview.average_rating, 0.0);
    assert_eq!(stats.last_7_days.breakdown.len(), 7);
    assert_eq!(stats.last_7_days.breakdown[6].label, "Today");
    assert_eq!(stats.last_5_weeks.breakdown.len(), 5);
    assert_eq!(stats.this_year.total_earnings, Decimal::ZERO);
    assert!(stats.insights.top_users.is_empty());
}

#[tokio::test]
async fn test_stats_count_owned_turfs_only() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let admin = create_user(&pool, Role::Admin).await;
    let other_admin = create_user(&pool, Role::Admin).await;
    let user = create_user(&pool, Role::User).await;
    let turf = create_turf(&state, admin).await;
    let other_turf = create_turf(&state, other_admin).await;

    let kept = state
        .booking_service
        .create_for_user(user, Role::User, booking_request(turf.id, 2, 10, 1))
        .await
        .unwrap();
    let dropped = state
        .booking_service
        .create_for_user(user, Role::User, booking_request(turf.id, 2, 12, 1))
        .await
        .unwrap();
    state
        .booking_service
        .cancel(dropped.id, admin, Role::Admin, None)
        .await
        .unwrap();
    state
        .booking_service
        .create_for_user(user, Role::User, booking_request(other_turf.id, 2, 10, 1))
        .await
        .unwrap();

    let stats = state.stats_service.get(admin, false).await.unwrap();

    assert_eq!(stats.overview.total_bookings, 2);
    assert_eq!(stats.overview.bookings_by_status.pending, 1);
    assert_eq!(stats.overview.bookings_by_status.cancelled, 1);
    assert_eq!(stats.overview.total_users, 1);
    assert_eq!(stats.overview.recent_users, 1);

    // Created just now, so earnings land in today's bucket; cancelled is excluded
    assert_eq!(stats.last_7_days.breakdown[6].earnings, kept.price);
    assert_eq!(stats.last_7_days.total_earnings, kept.price);
    assert_eq!(stats.this_year.total_earnings, kept.price);

    assert_eq!(stats.insights.average_booking_duration, 1.0);
    assert_eq!(stats.insights.top_users.len(), 1);
    assert_eq!(stats.insights.top_users[0].user_id, user);
    assert_eq!(stats.insights.top_users[0].total_spent, kept.price);
    assert_eq!(stats.insights.peak_booking_hours[0].count, 1);
}

#[tokio::test]
async fn test_writes_invalidate_memoised_stats() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let admin = create_user(&pool, Role::Admin).await;
    let user = create_user(&pool, Role::User).await;
    let turf = create_turf(&state, admin).await;

    let before = state.stats_service.get(admin, false).await.unwrap();
    assert_eq!(before.overview.total_bookings, 0);
    assert!(state.stats_service.is_cached(admin).await);

    let again = state.stats_service.get(admin, false).await.unwrap();
    assert!(Arc::ptr_eq(&before, &again));

    state
        .booking_service
        .create_on_behalf(admin, on_behalf_request(user, turf.id, 1, 18, 1))
        .await
        .unwrap();
    assert!(!state.stats_service.is_cached(admin).await);

    let after = state.stats_service.get(admin, false).await.unwrap();
    assert_eq!(after.overview.total_bookings, 1);
    assert_eq!(after.overview.bookings_by_status.confirmed, 1);
}

#[tokio::test]
async fn test_refresh_bypasses_memo() {
    let pool = create_test_pool().await;
    let state = test_state(pool.clone());
    let admin = create_user(&pool, Role::Admin).await;

    let first = state.stats_service.get(admin, false).await.unwrap();
    let refreshed = state.stats_service.get(admin, true).await.unwrap();

    assert!(!Arc::ptr_eq(&first, &refreshed));
    assert!(refreshed.generated_at >= first.generated_at);
}

#[tokio::test]
async fn test_concurrent_requests_share_one_computation() {
    let pool = create_test_pool().await;
    let config = AppConfig::for_tests(&database_url());
    let metrics = PerformanceMetrics::new();
    let service = Arc::new(StatsService::new(
        StatsRepository::new(pool.clone()),
        config.stats_cache_ttl,
        config.venue_offset,
        metrics.clone(),
    ));
    let admin = create_user(&pool, Role::Admin).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.get(admin, false).await })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }

    let summary = metrics.summary();
    // Every caller either joined the running computation or hit the memo
    assert_eq!(summary.stats_computations.count, 1);
    assert_eq!(
        summary.stats_inflight_joins + summary.stats_cache_hits,
        7
    );
    assert!(results.iter().all(|r| Arc::ptr_eq(r, &results[0])));
}

#[tokio::test]
async fn test_purge_drops_expired_payloads() {
    let pool = create_test_pool().await;
    let config = AppConfig::for_tests(&database_url());
    let service = StatsService::new(
        StatsRepository::new(pool.clone()),
        std::time::Duration::ZERO,
        config.venue_offset,
        PerformanceMetrics::new(),
    );
    let first = create_user(&pool, Role::Admin).await;
    let second = create_user(&pool, Role::Admin).await;

    service.get(first, false).await.unwrap();
    service.get(second, false).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    assert_eq!(service.purge_stale().await, 2);
    assert_eq!(service.purge_stale().await, 0);
}
