// HTTP handlers for booking endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::bookings::{
    AdminBookingQuery, AdminCreateBookingRequest, BookingResponse, CancelBookingRequest,
    CreateBookingRequest, UserBookingQuery,
};
use crate::error::ApiError;
use crate::AppState;

fn cancellation_reason(body: Option<Json<CancelBookingRequest>>) -> Result<Option<String>, ApiError> {
    match body {
        Some(Json(request)) => {
            request.validate()?;
            Ok(request.reason)
        }
        None => Ok(None),
    }
}

/// Book a slot
#[utoipa::path(
    post,
    path = "/api/bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Interval, duration, window or hours rejected", body = crate::error::ErrorResponse),
        (status = 404, description = "Turf or pricing not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Slot already taken", body = crate::error::ErrorResponse),
        (status = 503, description = "Bookings disabled for this turf", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn create_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    request.validate()?;
    let booking = state
        .booking_service
        .create_for_user(user.user_id, user.role, request)
        .await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// List the caller's bookings
#[utoipa::path(
    get,
    path = "/api/bookings",
    params(UserBookingQuery),
    responses(
        (status = 200, description = "Caller's bookings", body = Vec<BookingResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn list_my_bookings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<UserBookingQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = state
        .booking_service
        .list_for_user(user.user_id, query)
        .await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// Get a booking held by the caller or on a turf they own
#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking", body = BookingResponse),
        (status = 403, description = "No access", body = crate::error::ErrorResponse),
        (status = 404, description = "Booking not found", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn get_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = state
        .booking_service
        .get(id, user.user_id, user.role)
        .await?;
    Ok(Json(booking.into()))
}

/// Cancel a booking
#[utoipa::path(
    delete,
    path = "/api/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body(content = Option<CancelBookingRequest>, description = "Optional reason"),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponse),
        (status = 400, description = "Too close to start", body = crate::error::ErrorResponse),
        (status = 403, description = "No access", body = crate::error::ErrorResponse),
        (status = 409, description = "Already cancelled", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    body: Option<Json<CancelBookingRequest>>,
) -> Result<Json<BookingResponse>, ApiError> {
    let reason = cancellation_reason(body)?;
    let booking = state
        .booking_service
        .cancel(id, user.user_id, user.role, reason)
        .await?;
    Ok(Json(booking.into()))
}

/// List bookings on the caller's turfs
#[utoipa::path(
    get,
    path = "/api/admin/bookings",
    params(AdminBookingQuery),
    responses(
        (status = 200, description = "Bookings on owned turfs", body = Vec<BookingResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn list_admin_bookings(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<AdminBookingQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = state
        .booking_service
        .list_for_admin(user.user_id, query)
        .await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// Book a slot for a user on an owned turf
#[utoipa::path(
    post,
    path = "/api/admin/bookings",
    request_body = AdminCreateBookingRequest,
    responses(
        (status = 201, description = "Confirmed booking created", body = BookingResponse),
        (status = 403, description = "Not the turf's admin", body = crate::error::ErrorResponse),
        (status = 409, description = "Slot already taken", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn admin_create_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<AdminCreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    request.validate()?;
    let booking = state
        .booking_service
        .create_on_behalf(user.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// Confirm a pending booking
#[utoipa::path(
    patch,
    path = "/api/admin/bookings/{id}/confirm",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking confirmed", body = BookingResponse),
        (status = 400, description = "Booking is not pending", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the turf's admin", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn confirm_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = state.booking_service.confirm(id, user.user_id).await?;
    Ok(Json(booking.into()))
}

/// Complete a confirmed or active booking
#[utoipa::path(
    patch,
    path = "/api/admin/bookings/{id}/complete",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking completed", body = BookingResponse),
        (status = 400, description = "Booking is not confirmed or active", body = crate::error::ErrorResponse),
        (status = 403, description = "Not the turf's admin", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn complete_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = state.booking_service.complete(id, user.user_id).await?;
    Ok(Json(booking.into()))
}

/// Cancel a booking on an owned turf, ignoring the cancellation threshold
#[utoipa::path(
    patch,
    path = "/api/admin/bookings/{id}/cancel",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body(content = Option<CancelBookingRequest>, description = "Optional reason"),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponse),
        (status = 403, description = "Not the turf's admin", body = crate::error::ErrorResponse),
        (status = 409, description = "Already cancelled", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "bookings"
)]
pub async fn admin_cancel_booking(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    body: Option<Json<CancelBookingRequest>>,
) -> Result<Json<BookingResponse>, ApiError> {
    let reason = cancellation_reason(body)?;
    let booking = state
        .booking_service
        .cancel(id, user.user_id, user.role, reason)
        .await?;
    Ok(Json(booking.into()))
}
