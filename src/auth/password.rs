// Password hashing and validation service

use crate::auth::error::AuthError;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

/// Password service for hashing and verification
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a random salt
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| {
                tracing::error!("Failed to hash password: {}", e);
                AuthError::PasswordHashError
            })
    }

    /// Verify a password against a stored PHC hash
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| {
            tracing::error!("Stored password hash is malformed: {}", e);
            AuthError::PasswordHashError
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// At least 8 characters with one letter and one digit
    pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
        if password.chars().count() < 8 {
            return Err(AuthError::InvalidPasswordFormat(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        if !password.chars().any(|c| c.is_alphabetic()) {
            return Err(AuthError::InvalidPasswordFormat(
                "Password must contain at least one letter".to_string(),
            ));
        }
        if !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AuthError::InvalidPasswordFormat(
                "Password must contain at least one digit".to_string(),
            ));
        }
        Ok(())
    }
}
