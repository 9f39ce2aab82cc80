// Authentication module
// JWT-based authentication with registration, login, token rotation and roles

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use handlers::{
    admin_setup_status_handler, claim_admin_handler, login_handler, logout_handler, me_handler,
    refresh_handler, register_handler,
};
pub use middleware::{AdminUser, AuthenticatedUser};
pub use models::{
    AdminSetupStatus, AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, Role, User,
    UserResponse, UserWithRole,
};
pub use repository::{TokenRepository, UserRepository};
pub use service::AuthService;
pub use token::TokenService;
