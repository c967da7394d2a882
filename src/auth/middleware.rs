// Authentication middleware for protected routes

use axum::{
    async_trait,
    body::Body,
    extract::{FromRef, FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::{error::AuthError, models::Role, token::{Claims, TokenService}};

/// Authenticated user extractor for protected routes
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Pull the bearer token out of the Authorization header
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)?;
        let token_service = Arc::<TokenService>::from_ref(state);
        let claims = token_service.validate_access_token(token)?;

        Ok(claims.into())
    }
}

/// Authorization check that requires a specific role
#[derive(Debug, Clone)]
pub struct RequireRole {
    required_role: Role,
}

impl RequireRole {
    pub fn new(required_role: Role) -> Self {
        Self { required_role }
    }

    pub fn admin() -> Self {
        Self::new(Role::Admin)
    }

    pub fn user() -> Self {
        Self::new(Role::User)
    }

    /// Validate the request's token and role, returning the caller
    pub fn authorize(
        &self,
        token_service: &TokenService,
        request: &Request<Body>,
    ) -> Result<AuthenticatedUser, AuthError> {
        let endpoint = request.uri().path();

        let token = bearer_token(request.headers()).map_err(|e| {
            warn!("Rejected request to protected endpoint {}: {}", endpoint, e);
            e
        })?;
        let claims = token_service.validate_access_token(token)?;

        if claims.role != self.required_role {
            warn!(
                "Authorization failed: user_id={}, required_role={}, actual_role={}, endpoint={}",
                claims.sub, self.required_role, claims.role, endpoint
            );
            return Err(AuthError::InsufficientPermissions {
                required: self.required_role,
                actual: claims.role,
            });
        }

        debug!(
            "Authorization successful: user_id={}, role={}, endpoint={}",
            claims.sub, claims.role, endpoint
        );
        Ok(claims.into())
    }

    /// Run the check and hand the request on when it passes
    pub async fn middleware(
        self,
        token_service: &TokenService,
        request: Request<Body>,
        next: Next,
    ) -> Result<Response, AuthError> {
        self.authorize(token_service, &request)?;
        Ok(next.run(request).await)
    }
}

/// Layer function guarding every admin route
pub async fn require_admin(
    State(token_service): State<Arc<TokenService>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    RequireRole::admin()
        .middleware(&token_service, request, next)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use proptest::prelude::*;

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    fn test_token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(SECRET.to_string()))
    }

    fn create_parts_with_auth(auth_value: &str) -> Parts {
        let req = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, auth_value)
            .body(())
            .unwrap();
        req.into_parts().0
    }

    fn create_parts_without_auth() -> Parts {
        let req = Request::builder().uri("/").body(()).unwrap();
        req.into_parts().0
    }

    fn create_request_with_auth(auth_value: &str) -> Request<Body> {
        Request::builder()
            .uri("/api/admin/turfs")
            .header(header::AUTHORIZATION, auth_value)
            .body(Body::empty())
            .unwrap()
    }

    fn expired_token(role: Role) -> String {
        let claims = Claims {
            sub: 1,
            email: "test@example.com".to_string(),
            role,
            iat: Utc::now().timestamp() - 1000,
            exp: Utc::now().timestamp() - 500,
            jti: "expired".to_string(),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    #[tokio::test]
    async fn test_valid_token_is_accepted() {
        let tokens = test_token_service();
        let token = tokens.generate_access_token(42, "test@example.com", Role::User).unwrap();

        let mut parts = create_parts_with_auth(&format!("Bearer {}", token));
        let user = AuthenticatedUser::from_request_parts(&mut parts, &tokens)
            .await
            .unwrap();

        assert_eq!(user.user_id, 42);
        assert_eq!(user.email, "test@example.com");
        assert!(!user.is_admin());
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let tokens = test_token_service();
        let mut parts = create_parts_with_auth(&format!("Bearer {}", expired_token(Role::User)));

        let result = AuthenticatedUser::from_request_parts(&mut parts, &tokens).await;
        assert!(matches!(result.unwrap_err(), AuthError::ExpiredToken));
    }

    #[tokio::test]
    async fn test_missing_authorization_header() {
        let tokens = test_token_service();
        let mut parts = create_parts_without_auth();

        let result = AuthenticatedUser::from_request_parts(&mut parts, &tokens).await;
        assert!(matches!(result.unwrap_err(), AuthError::MissingToken));
    }

    #[tokio::test]
    async fn test_invalid_bearer_format() {
        let tokens = test_token_service();
        for auth_value in ["InvalidFormat token", "token_without_bearer", "Basic dXNlcjpwYXNz"] {
            let mut parts = create_parts_with_auth(auth_value);
            let result = AuthenticatedUser::from_request_parts(&mut parts, &tokens).await;
            assert!(matches!(result.unwrap_err(), AuthError::InvalidToken));
        }
    }

    // ===== RequireRole Tests =====

    #[test]
    fn test_require_admin_allows_admin() {
        let tokens = test_token_service();
        let token = tokens.generate_access_token(1, "admin@example.com", Role::Admin).unwrap();
        let request = create_request_with_auth(&format!("Bearer {}", token));

        let user = RequireRole::admin().authorize(&tokens, &request).unwrap();
        assert!(user.is_admin());
    }

    #[test]
    fn test_require_admin_denies_user() {
        let tokens = test_token_service();
        let token = tokens.generate_access_token(1, "user@example.com", Role::User).unwrap();
        let request = create_request_with_auth(&format!("Bearer {}", token));

        match RequireRole::admin().authorize(&tokens, &request).unwrap_err() {
            AuthError::InsufficientPermissions { required, actual } => {
                assert_eq!(required, Role::Admin);
                assert_eq!(actual, Role::User);
            }
            other => panic!("Expected InsufficientPermissions, got {:?}", other),
        }
    }

    #[test]
    fn test_require_user_denies_admin() {
        let tokens = test_token_service();
        let token = tokens.generate_access_token(1, "admin@example.com", Role::Admin).unwrap();
        let request = create_request_with_auth(&format!("Bearer {}", token));

        assert!(RequireRole::user().authorize(&tokens, &request).is_err());
    }

    #[test]
    fn test_require_role_expired_token() {
        let tokens = test_token_service();
        let request = create_request_with_auth(&format!("Bearer {}", expired_token(Role::Admin)));

        assert!(matches!(
            RequireRole::admin().authorize(&tokens, &request),
            Err(AuthError::ExpiredToken)
        ));
    }

    proptest! {
        #[test]
        fn prop_malformed_tokens_rejected(malformed in "[a-zA-Z0-9]{10,50}") {
            let tokens = test_token_service();
            let request = create_request_with_auth(&format!("Bearer {}", malformed));
            prop_assert!(RequireRole::user().authorize(&tokens, &request).is_err());
        }
    }
}
