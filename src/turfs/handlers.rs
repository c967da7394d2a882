// HTTP handlers for turf endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::turfs::{
    CreateTurfRequest, DeleteTurfQuery, Turf, TurfListQuery, UpdateTurfRequest,
    UpdateTurfStatusRequest,
};
use crate::AppState;

/// List turfs open to the public
#[utoipa::path(
    get,
    path = "/api/turfs",
    params(TurfListQuery),
    responses(
        (status = 200, description = "Matching turfs", body = Vec<Turf>)
    ),
    tag = "turfs"
)]
pub async fn list_turfs(
    State(state): State<AppState>,
    Query(query): Query<TurfListQuery>,
) -> Result<Json<Vec<Turf>>, ApiError> {
    let turfs = state.turf_service.list(query).await?;
    Ok(Json(turfs))
}

/// Get a turf by ID
#[utoipa::path(
    get,
    path = "/api/turfs/{id}",
    params(("id" = Uuid, Path, description = "Turf ID")),
    responses(
        (status = 200, description = "Turf found", body = Turf),
        (status = 404, description = "Turf not found", body = crate::error::ErrorResponse)
    ),
    tag = "turfs"
)]
pub async fn get_turf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Turf>, ApiError> {
    let turf = state.turf_service.get(id).await?;
    Ok(Json(turf))
}

/// Create a turf owned by the calling admin
#[utoipa::path(
    post,
    path = "/api/admin/turfs",
    request_body = CreateTurfRequest,
    responses(
        (status = 201, description = "Turf created with default pricing and settings", body = Turf),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin role required", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "turfs"
)]
pub async fn create_turf(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateTurfRequest>,
) -> Result<(StatusCode, Json<Turf>), ApiError> {
    request.validate()?;
    let turf = state.turf_service.create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(turf)))
}

/// List turfs owned by the calling admin
#[utoipa::path(
    get,
    path = "/api/admin/turfs",
    responses(
        (status = 200, description = "Owned turfs in any status", body = Vec<Turf>)
    ),
    security(("bearer_auth" = [])),
    tag = "turfs"
)]
pub async fn list_owned_turfs(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<Turf>>, ApiError> {
    let turfs = state.turf_service.list_owned(user.user_id).await?;
    Ok(Json(turfs))
}

/// Update an owned turf
#[utoipa::path(
    put,
    path = "/api/admin/turfs/{id}",
    params(("id" = Uuid, Path, description = "Turf ID")),
    request_body = UpdateTurfRequest,
    responses(
        (status = 200, description = "Turf updated", body = Turf),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Turf not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "turfs"
)]
pub async fn update_turf(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTurfRequest>,
) -> Result<Json<Turf>, ApiError> {
    request.validate()?;
    let turf = state.turf_service.update(id, user.user_id, request).await?;
    Ok(Json(turf))
}

/// Change the status of an owned turf
#[utoipa::path(
    patch,
    path = "/api/admin/turfs/{id}/status",
    params(("id" = Uuid, Path, description = "Turf ID")),
    request_body = UpdateTurfStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Turf),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Turf not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "turfs"
)]
pub async fn update_turf_status(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTurfStatusRequest>,
) -> Result<Json<Turf>, ApiError> {
    let turf = state
        .turf_service
        .update_status(id, user.user_id, request.status)
        .await?;
    Ok(Json(turf))
}

/// Deactivate an owned turf, or remove it with `?hard=true`
#[utoipa::path(
    delete,
    path = "/api/admin/turfs/{id}",
    params(("id" = Uuid, Path, description = "Turf ID"), DeleteTurfQuery),
    responses(
        (status = 204, description = "Turf deactivated or removed"),
        (status = 403, description = "Not the owner", body = crate::error::ErrorResponse),
        (status = 404, description = "Turf not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "turfs"
)]
pub async fn delete_turf(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteTurfQuery>,
) -> Result<StatusCode, ApiError> {
    if query.hard {
        state.turf_service.hard_delete(id, user.user_id).await?;
    } else {
        state.turf_service.soft_delete(id, user.user_id).await?;
    }
    Ok(StatusCode::NO_CONTENT)
}
