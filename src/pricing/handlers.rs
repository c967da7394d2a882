// HTTP handlers for pricing endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::pricing::{PricingRow, UpdatePricingRequest};
use crate::AppState;

/// Get the rate table of a turf
#[utoipa::path(
    get,
    path = "/api/turfs/{id}/pricing",
    params(("id" = Uuid, Path, description = "Turf ID")),
    responses(
        (status = 200, description = "Configured rates", body = Vec<PricingRow>),
        (status = 404, description = "Turf not found", body = crate::error::ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn get_pricing(
    State(state): State<AppState>,
    Path(turf_id): Path<Uuid>,
) -> Result<Json<Vec<PricingRow>>, ApiError> {
    let rows = state.pricing_service.get_all(turf_id).await?;
    Ok(Json(rows))
}

/// Upsert rates for an owned turf
#[utoipa::path(
    put,
    path = "/api/admin/turfs/{id}/pricing",
    params(("id" = Uuid, Path, description = "Turf ID")),
    request_body = UpdatePricingRequest,
    responses(
        (status = 200, description = "Rates written", body = Vec<PricingRow>),
        (status = 400, description = "Negative or malformed price", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Turf not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "pricing"
)]
pub async fn update_pricing(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(turf_id): Path<Uuid>,
    Json(request): Json<UpdatePricingRequest>,
) -> Result<Json<Vec<PricingRow>>, ApiError> {
    request.validate()?;
    let rows = state
        .pricing_service
        .update(turf_id, user.user_id, request.prices)
        .await?;
    Ok(Json(rows))
}

/// Seed missing default rates for an owned turf
#[utoipa::path(
    post,
    path = "/api/admin/turfs/{id}/pricing/defaults",
    params(("id" = Uuid, Path, description = "Turf ID")),
    responses(
        (status = 201, description = "Full rate table after seeding", body = Vec<PricingRow>),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Turf not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "pricing"
)]
pub async fn create_default_pricing(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(turf_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Vec<PricingRow>>), ApiError> {
    let rows = state
        .pricing_service
        .create_defaults(turf_id, user.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(rows)))
}
