// Authentication service - business logic layer

use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::auth::{
    error::AuthError,
    models::{AuthResponse, RegisterRequest, User, UserResponse},
    password::PasswordService,
    repository::{TokenRepository, UserRepository},
    token::TokenService,
};

/// Authentication service coordinating all auth operations
#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    token_repo: TokenRepository,
    token_service: Arc<TokenService>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        user_repo: UserRepository,
        token_repo: TokenRepository,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            token_service,
        }
    }

    /// Register a new account and issue a token pair
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        PasswordService::validate_password_strength(&request.password)?;

        let email = request.email.trim().to_lowercase();
        let password_hash = PasswordService::hash_password(&request.password)?;
        let user = self
            .user_repo
            .create_user(request.name.trim(), &email, &password_hash, request.role)
            .await?;

        tracing::info!("Registered user {} with role {}", user.id, user.role);
        self.issue_tokens(user).await
    }

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(password, &user.password_hash)? {
            tracing::debug!("Failed login for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_tokens(user).await
    }

    /// Rotate a refresh token: the presented one is consumed, a new pair issued
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        let claims = self.token_service.validate_refresh_token(refresh_token)?;

        let stored = self
            .token_repo
            .consume_refresh_token(refresh_token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if stored.user_id != claims.sub {
            return Err(AuthError::InvalidToken);
        }

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        self.issue_tokens(user).await
    }

    /// Get current user information
    pub async fn get_current_user(&self, user_id: i32) -> Result<UserResponse, AuthError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or(AuthError::UserNotFound)
    }

    /// Drop refresh tokens past their expiry, returning how many went
    pub async fn purge_expired_tokens(&self) -> Result<u64, AuthError> {
        self.token_repo.delete_expired_tokens().await
    }

    async fn issue_tokens(&self, user: User) -> Result<AuthResponse, AuthError> {
        let (access_token, refresh_token) =
            self.token_service
                .generate_token_pair(user.id, &user.email, user.role)?;

        let expires_at = Utc::now() + Duration::seconds(self.token_service.refresh_token_duration());
        self.token_repo
            .store_refresh_token(user.id, &refresh_token, expires_at)
            .await?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            user: user.into(),
        })
    }
}
