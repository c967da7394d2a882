// HTTP handlers for the admin dashboard

use axum::{
    extract::{Query, State},
    Json,
};

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::metrics::MetricsSummary;
use crate::stats::{AdminStats, StatsQuery};
use crate::AppState;

/// Earnings, usage and review stats across the caller's turfs
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    params(StatsQuery),
    responses(
        (status = 200, description = "Dashboard stats", body = AdminStats),
        (status = 403, description = "Admin role required", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "stats"
)]
pub async fn get_admin_stats(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<StatsQuery>,
) -> Result<Json<AdminStats>, ApiError> {
    let stats = state.stats_service.get(user.user_id, query.refresh).await?;
    Ok(Json(AdminStats::clone(&stats)))
}

/// Cache and timing counters of this process
#[utoipa::path(
    get,
    path = "/api/admin/metrics",
    responses(
        (status = 200, description = "Performance counters", body = MetricsSummary)
    ),
    security(("bearer_auth" = [])),
    tag = "stats"
)]
pub async fn get_metrics(State(state): State<AppState>) -> Json<MetricsSummary> {
    state.metrics.log_summary();
    Json(state.metrics.summary())
}
