pub mod auth;
pub mod bookings;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod pricing;
pub mod reviews;
pub mod settings;
pub mod stats;
pub mod turfs;

#[cfg(test)]
mod test_support;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, TokenRepository, TokenService, UserRepository};
use bookings::{AvailabilityChecker, BookingRepository, BookingRules, BookingService};
use config::AppConfig;
use metrics::PerformanceMetrics;
use pricing::{PricingRepository, PricingResolver, PricingService};
use reviews::{ReviewRepository, ReviewService};
use settings::{SettingsRepository, SettingsStore};
use stats::{StatsRepository, StatsService};
use turfs::{TurfRepository, TurfService};

/// How often the maintenance task logs metrics and purges expired state
const MAINTENANCE_INTERVAL: Duration = Duration::from_secs(300);

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::refresh_handler,
        auth::handlers::me_handler,
        turfs::handlers::list_turfs,
        turfs::handlers::get_turf,
        turfs::handlers::create_turf,
        turfs::handlers::list_owned_turfs,
        turfs::handlers::update_turf,
        turfs::handlers::update_turf_status,
        turfs::handlers::delete_turf,
        pricing::handlers::get_pricing,
        pricing::handlers::update_pricing,
        pricing::handlers::create_default_pricing,
        settings::handlers::get_settings,
        settings::handlers::get_setting,
        settings::handlers::bulk_update_settings,
        settings::handlers::update_setting,
        settings::handlers::update_booking_status,
        settings::handlers::create_default_settings,
        bookings::handlers::create_booking,
        bookings::handlers::list_my_bookings,
        bookings::handlers::get_booking,
        bookings::handlers::cancel_booking,
        bookings::handlers::list_admin_bookings,
        bookings::handlers::admin_create_booking,
        bookings::handlers::confirm_booking,
        bookings::handlers::complete_booking,
        bookings::handlers::admin_cancel_booking,
        reviews::handlers::create_review_handler,
        reviews::handlers::list_reviews_handler,
        reviews::handlers::my_reviews_handler,
        reviews::handlers::review_stats_handler,
        reviews::handlers::booking_review_handler,
        stats::handlers::get_admin_stats,
        stats::handlers::get_metrics,
    ),
    components(
        schemas(
            error::ErrorResponse,
            auth::Role, auth::UserResponse, auth::RegisterRequest, auth::LoginRequest,
            auth::RefreshRequest, auth::AuthResponse,
            turfs::TurfStatus, turfs::Turf, turfs::CreateTurfRequest, turfs::UpdateTurfRequest,
            turfs::UpdateTurfStatusRequest,
            pricing::DayType, pricing::TimeSlot, pricing::PricingRow, pricing::PriceEntry,
            pricing::UpdatePricingRequest,
            settings::Setting, settings::BookingStatusResponse, settings::UpdateBookingStatusRequest,
            settings::SettingInput, settings::BulkUpdateSettingsRequest, settings::UpdateSettingRequest,
            bookings::BookingStatus, bookings::Booking, bookings::BookingResponse,
            bookings::CreateBookingRequest, bookings::AdminCreateBookingRequest,
            bookings::CancelBookingRequest,
            reviews::Review, reviews::CreateReviewRequest, reviews::RatingBucket, reviews::ReviewStats,
            stats::BucketUnit, stats::StatusCounts, stats::StatsOverview, stats::EarningsBucket,
            stats::EarningsBreakdown, stats::PeakHour, stats::TopCustomer, stats::StatsInsights,
            stats::AdminStats,
            metrics::OperationSummary, metrics::MetricsSummary,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and token refresh"),
        (name = "turfs", description = "Turf listing and management"),
        (name = "pricing", description = "Per-turf rate table"),
        (name = "settings", description = "Per-turf booking settings"),
        (name = "bookings", description = "Booking lifecycle"),
        (name = "reviews", description = "Reviews of finished bookings"),
        (name = "stats", description = "Admin dashboard and process metrics")
    ),
    info(
        title = "Turf Booking API",
        version = "1.0.0",
        description = "Booking backend for sports turfs: pricing, availability, policy and reviews"
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: AppConfig,
    pub metrics: PerformanceMetrics,
    pub token_service: Arc<TokenService>,
    pub auth_service: AuthService,
    pub turf_service: TurfService,
    pub pricing_service: PricingService,
    pub pricing_resolver: Arc<PricingResolver>,
    pub settings_store: SettingsStore,
    pub booking_service: BookingService,
    pub review_service: ReviewService,
    pub stats_service: Arc<StatsService>,
}

impl AppState {
    /// Wire every repository and service onto one pool
    ///
    /// The pricing resolver and stats service are built once here; every
    /// service that prices or invalidates shares the same instance.
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let metrics = PerformanceMetrics::new();
        let token_service = Arc::new(TokenService::new(config.jwt_secret.clone()));

        let user_repo = UserRepository::new(db.clone());
        let turf_repo = TurfRepository::new(db.clone());
        let pricing_repo = PricingRepository::new(db.clone());
        let settings_repo = SettingsRepository::new(db.clone());
        let booking_repo = BookingRepository::new(db.clone());

        let pricing_resolver = Arc::new(PricingResolver::new(
            pricing_repo.clone(),
            config.pricing_cache_ttl,
            config.venue_offset,
            metrics.clone(),
        ));
        let stats_service = Arc::new(StatsService::new(
            StatsRepository::new(db.clone()),
            config.stats_cache_ttl,
            config.venue_offset,
            metrics.clone(),
        ));

        let auth_service = AuthService::new(
            user_repo.clone(),
            TokenRepository::new(db.clone()),
            Arc::clone(&token_service),
        );
        let turf_service = TurfService::new(
            turf_repo.clone(),
            Arc::clone(&pricing_resolver),
            Arc::clone(&stats_service),
        );
        let pricing_service =
            PricingService::new(pricing_repo, turf_repo.clone(), Arc::clone(&pricing_resolver));
        let settings_store = SettingsStore::new(settings_repo, turf_repo.clone());
        let booking_service = BookingService::new(
            booking_repo.clone(),
            turf_repo,
            user_repo,
            AvailabilityChecker::new(db.clone(), metrics.clone()),
            settings_store.clone(),
            Arc::clone(&pricing_resolver),
            Arc::clone(&stats_service),
            metrics.clone(),
            BookingRules::from(&config),
        );
        let review_service = ReviewService::new(
            ReviewRepository::new(db.clone()),
            booking_repo,
            Arc::clone(&stats_service),
        );

        Self {
            db,
            config,
            metrics,
            token_service,
            auth_service,
            turf_service,
            pricing_service,
            pricing_resolver,
            settings_store,
            booking_service,
            review_service,
            stats_service,
        }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.token_service)
    }
}

/// Creates and configures the application router
///
/// Everything under `/api/admin` sits behind the admin role check; the
/// remaining routes authenticate per handler where they need a caller.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_routes = Router::new()
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/refresh", post(auth::refresh_handler))
        .route("/api/auth/me", get(auth::me_handler))
        .route("/api/turfs", get(turfs::list_turfs))
        .route("/api/turfs/:id", get(turfs::get_turf))
        .route("/api/turfs/:id/pricing", get(pricing::get_pricing))
        .route("/api/turfs/:id/settings", get(settings::get_settings))
        .route("/api/turfs/:id/settings/:key", get(settings::get_setting))
        .route(
            "/api/bookings",
            post(bookings::create_booking).get(bookings::list_my_bookings),
        )
        .route(
            "/api/bookings/:id",
            get(bookings::get_booking).delete(bookings::cancel_booking),
        )
        .route(
            "/api/reviews",
            post(reviews::create_review_handler).get(reviews::list_reviews_handler),
        )
        .route("/api/reviews/me", get(reviews::my_reviews_handler))
        .route("/api/reviews/stats", get(reviews::review_stats_handler))
        .route("/api/reviews/booking/:id", get(reviews::booking_review_handler));

    let admin_routes = Router::new()
        .route(
            "/api/admin/turfs",
            post(turfs::create_turf).get(turfs::list_owned_turfs),
        )
        .route(
            "/api/admin/turfs/:id",
            put(turfs::update_turf).delete(turfs::delete_turf),
        )
        .route("/api/admin/turfs/:id/status", patch(turfs::update_turf_status))
        .route("/api/admin/turfs/:id/pricing", put(pricing::update_pricing))
        .route(
            "/api/admin/turfs/:id/pricing/defaults",
            post(pricing::create_default_pricing),
        )
        .route(
            "/api/admin/turfs/:id/settings",
            put(settings::bulk_update_settings),
        )
        .route(
            "/api/admin/turfs/:id/settings/keys/:key",
            put(settings::update_setting),
        )
        .route(
            "/api/admin/turfs/:id/settings/booking-status",
            put(settings::update_booking_status),
        )
        .route(
            "/api/admin/turfs/:id/settings/defaults",
            post(settings::create_default_settings),
        )
        .route(
            "/api/admin/bookings",
            get(bookings::list_admin_bookings).post(bookings::admin_create_booking),
        )
        .route("/api/admin/bookings/:id/confirm", patch(bookings::confirm_booking))
        .route("/api/admin/bookings/:id/complete", patch(bookings::complete_booking))
        .route("/api/admin/bookings/:id/cancel", patch(bookings::admin_cancel_booking))
        .route("/api/admin/stats", get(stats::get_admin_stats))
        .route("/api/admin/metrics", get(stats::get_metrics))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public_routes)
        .merge(admin_routes)
        .layer(cors)
        .with_state(state)
}

/// One maintenance pass: log metrics, drop expired cache entries and
/// refresh tokens. Returns how many cache entries were purged.
pub async fn run_maintenance(state: &AppState) -> usize {
    state.metrics.log_summary();

    let purged =
        state.pricing_resolver.purge_stale().await + state.stats_service.purge_stale().await;
    if purged > 0 {
        tracing::debug!("Purged {} stale cache entries", purged);
    }

    match state.auth_service.purge_expired_tokens().await {
        Ok(0) => {}
        Ok(tokens) => tracing::info!("Purged {} expired refresh tokens", tokens),
        Err(e) => tracing::warn!("Refresh token purge failed: {}", e),
    }
    purged
}

fn spawn_maintenance(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(MAINTENANCE_INTERVAL);
        // The first tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            run_maintenance(&state).await;
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "turf_booking_api=info,tower_http=info".into()),
        )
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Turf Booking API - Starting...");

    let config = AppConfig::from_env()?;

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&db_pool).await?;

    let addr = config.bind_address();
    let state = AppState::new(db_pool, config);
    spawn_maintenance(state.clone());
    let app = create_router(state);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Turf Booking API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests;
