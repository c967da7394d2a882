// JWT token generation and validation service

use crate::auth::{error::AuthError, models::Role};
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user_id
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    /// Unique token id so two tokens minted in the same second never collide
    pub jti: String,
}

/// Token service for JWT operations
pub struct TokenService {
    secret: String,
    access_token_duration: i64,  // in seconds
    refresh_token_duration: i64, // in seconds
}

impl TokenService {
    /// Create a new TokenService with secret key
    /// Access tokens expire in 15 minutes (900 seconds)
    /// Refresh tokens expire in 7 days (604800 seconds)
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            access_token_duration: 900,
            refresh_token_duration: 604800,
        }
    }

    pub fn refresh_token_duration(&self) -> i64 {
        self.refresh_token_duration
    }

    /// Generate an access token (15 minutes)
    pub fn generate_access_token(&self, user_id: i32, email: &str, role: Role) -> Result<String, AuthError> {
        self.generate(user_id, email, role, self.access_token_duration)
    }

    /// Generate a refresh token (7 days)
    pub fn generate_refresh_token(&self, user_id: i32, email: &str, role: Role) -> Result<String, AuthError> {
        self.generate(user_id, email, role, self.refresh_token_duration)
    }

    fn generate(&self, user_id: i32, email: &str, role: Role, lifetime: i64) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            iat: now,
            exp: now + lifetime,
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Validate an access token
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_token(token)
    }

    /// Validate a refresh token
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_token(token)
    }

    fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }

    /// Generate both access and refresh tokens
    pub fn generate_token_pair(&self, user_id: i32, email: &str, role: Role) -> Result<(String, String), AuthError> {
        let access_token = self.generate_access_token(user_id, email, role)?;
        let refresh_token = self.generate_refresh_token(user_id, email, role)?;
        Ok((access_token, refresh_token))
    }
}
