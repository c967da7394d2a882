// HTTP handlers for settings endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::settings::{
    BookingStatusResponse, BulkUpdateSettingsRequest, Setting, UpdateBookingStatusRequest,
    UpdateSettingRequest,
};
use crate::AppState;

/// All settings of a turf
#[utoipa::path(
    get,
    path = "/api/turfs/{id}/settings",
    params(("id" = Uuid, Path, description = "Turf ID")),
    responses(
        (status = 200, description = "Settings", body = Vec<Setting>),
        (status = 404, description = "Turf not found", body = crate::error::ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn get_settings(
    State(state): State<AppState>,
    Path(turf_id): Path<Uuid>,
) -> Result<Json<Vec<Setting>>, ApiError> {
    let settings = state.settings_store.get_all(turf_id).await?;
    Ok(Json(settings))
}

/// One setting of a turf
#[utoipa::path(
    get,
    path = "/api/turfs/{id}/settings/{key}",
    params(
        ("id" = Uuid, Path, description = "Turf ID"),
        ("key" = String, Path, description = "Setting key")
    ),
    responses(
        (status = 200, description = "Setting", body = Setting),
        (status = 404, description = "Turf or setting not found", body = crate::error::ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn get_setting(
    State(state): State<AppState>,
    Path((turf_id, key)): Path<(Uuid, String)>,
) -> Result<Json<Setting>, ApiError> {
    let setting = state.settings_store.get_one(turf_id, &key).await?;
    Ok(Json(setting))
}

/// Write several settings in one transaction
#[utoipa::path(
    put,
    path = "/api/admin/turfs/{id}/settings",
    params(("id" = Uuid, Path, description = "Turf ID")),
    request_body = BulkUpdateSettingsRequest,
    responses(
        (status = 200, description = "Written settings", body = Vec<Setting>),
        (status = 400, description = "Invalid key or value", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "settings"
)]
pub async fn bulk_update_settings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(turf_id): Path<Uuid>,
    Json(request): Json<BulkUpdateSettingsRequest>,
) -> Result<Json<Vec<Setting>>, ApiError> {
    request.validate()?;
    let settings = state
        .settings_store
        .bulk_update(turf_id, user.user_id, request.settings)
        .await?;
    Ok(Json(settings))
}

/// Write one setting
#[utoipa::path(
    put,
    path = "/api/admin/turfs/{id}/settings/keys/{key}",
    params(
        ("id" = Uuid, Path, description = "Turf ID"),
        ("key" = String, Path, description = "Setting key")
    ),
    request_body = UpdateSettingRequest,
    responses(
        (status = 200, description = "Written setting", body = Setting),
        (status = 400, description = "Invalid value", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "settings"
)]
pub async fn update_setting(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((turf_id, key)): Path<(Uuid, String)>,
    Json(request): Json<UpdateSettingRequest>,
) -> Result<Json<Setting>, ApiError> {
    let setting = state
        .settings_store
        .update_one(
            turf_id,
            user.user_id,
            &key,
            &request.value,
            request.description.as_deref(),
        )
        .await?;
    Ok(Json(setting))
}

/// Block or unblock user bookings
#[utoipa::path(
    put,
    path = "/api/admin/turfs/{id}/settings/booking-status",
    params(("id" = Uuid, Path, description = "Turf ID")),
    request_body = UpdateBookingStatusRequest,
    responses(
        (status = 200, description = "New booking status", body = BookingStatusResponse),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Turf not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "settings"
)]
pub async fn update_booking_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(turf_id): Path<Uuid>,
    Json(request): Json<UpdateBookingStatusRequest>,
) -> Result<Json<BookingStatusResponse>, ApiError> {
    request.validate()?;
    let status = state
        .settings_store
        .update_booking_status(turf_id, user.user_id, request.disabled, request.reason)
        .await?;
    Ok(Json(status))
}

/// Seed missing default settings
#[utoipa::path(
    post,
    path = "/api/admin/turfs/{id}/settings/defaults",
    params(("id" = Uuid, Path, description = "Turf ID")),
    responses(
        (status = 201, description = "All settings after seeding", body = Vec<Setting>),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "settings"
)]
pub async fn create_default_settings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(turf_id): Path<Uuid>,
) -> Result<(StatusCode, Json<Vec<Setting>>), ApiError> {
    let settings = state
        .settings_store
        .create_defaults(turf_id, user.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(settings)))
}
