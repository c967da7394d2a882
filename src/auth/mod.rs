// Authentication module
// JWT-based authentication with registration, login, token refresh and role checks

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_handler, me_handler, refresh_handler, register_handler};
pub use middleware::{require_admin, AuthenticatedUser, RequireRole};
pub use models::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, Role, User, UserResponse};
pub use repository::{TokenRepository, UserRepository};
pub use service::AuthService;
pub use token::TokenService;
