// Database repositories for users and tokens

use crate::auth::{
    error::AuthError,
    models::{RefreshToken, Role, User},
};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<User, AuthError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, created_at
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Check for unique constraint violation
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::EmailAlreadyExists;
                }
            }
            AuthError::DatabaseError(e)
        })
    }

    /// Find a user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, role, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Display name of a user, used for snapshots on bookings
    pub async fn find_name(&self, id: i32) -> Result<Option<String>, AuthError> {
        let name: Option<String> = sqlx::query_scalar("SELECT name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(name)
    }
}

/// Token repository for refresh token operations
#[derive(Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    /// Create a new TokenRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Hash a token using SHA-256
    fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Store a refresh token (hashed with SHA-256)
    pub async fn store_refresh_token(
        &self,
        user_id: i32,
        token: &str,
        expires_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), AuthError> {
        sqlx::query("INSERT INTO refresh_tokens (user_id, token_hash, expires_at) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(Self::hash_token(token))
            .bind(expires_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Consume a refresh token: delete it and return the row if it was live
    ///
    /// Deleting and reading in one statement means a token can be
    /// redeemed at most once even under concurrent refresh calls.
    pub async fn consume_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
        let refresh_token = sqlx::query_as::<_, RefreshToken>(
            r#"
            DELETE FROM refresh_tokens
            WHERE token_hash = $1
            RETURNING id, user_id, token_hash, expires_at, created_at
            "#,
        )
        .bind(Self::hash_token(token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(refresh_token.filter(|t| t.expires_at > chrono::Utc::now()))
    }

    /// Delete expired tokens
    pub async fn delete_expired_tokens(&self) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
