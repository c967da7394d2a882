// HTTP handlers for authentication endpoints

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, UserResponse},
};
use crate::AppState;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    let response = state.auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Login a user
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    request
        .validate()
        .map_err(|e| AuthError::ValidationError(e.to_string()))?;

    let response = state
        .auth_service
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(response))
}

/// Refresh tokens
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = AuthResponse),
        (status = 401, description = "Unknown or expired refresh token", body = crate::error::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn refresh_handler(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state
        .auth_service
        .refresh_tokens(&request.refresh_token)
        .await?;
    Ok(Json(response))
}

/// Get current user information (protected endpoint)
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = crate::error::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, AuthError> {
    let current = state.auth_service.get_current_user(user.user_id).await?;
    Ok(Json(current))
}
