// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

use crate::auth::models::Role;

/// Authentication and authorization error types
#[derive(Debug)]
pub enum AuthError {
    // Authentication errors
    ValidationError(String),
    InvalidCredentials,
    InvalidToken,
    ExpiredToken,
    MissingToken,
    EmailAlreadyExists,
    UserNotFound,
    DatabaseError(String),
    PasswordHashError,
    InvalidPasswordFormat(String),
    TokenGenerationError(String),

    // Authorization errors
    /// Caller lacks the role an operation needs
    InsufficientPermissions {
        required: Role,
        actual: Role,
    },
    /// The one-time admin claim was already used
    AdminAlreadyExists,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::InvalidToken => write!(f, "Invalid token"),
            AuthError::ExpiredToken => write!(f, "Token has expired"),
            AuthError::MissingToken => write!(f, "Missing authentication token"),
            AuthError::EmailAlreadyExists => write!(f, "Email already exists"),
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AuthError::PasswordHashError => write!(f, "Password hashing error"),
            AuthError::InvalidPasswordFormat(msg) => write!(f, "Invalid password: {}", msg),
            AuthError::TokenGenerationError(msg) => write!(f, "Token generation error: {}", msg),
            AuthError::InsufficientPermissions { required, actual } => {
                write!(
                    f,
                    "Insufficient permissions: required role '{}', but user has role '{}'",
                    required, actual
                )
            }
            AuthError::AdminAlreadyExists => write!(f, "An admin account already exists"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::InvalidToken => warn!("Invalid token attempt"),
            AuthError::ExpiredToken => warn!("Expired token attempt"),
            AuthError::MissingToken => warn!("Missing token in request"),
            AuthError::DatabaseError(msg) => error!("Database error in auth: {}", msg),
            AuthError::PasswordHashError => error!("Password hashing error"),
            AuthError::TokenGenerationError(msg) => error!("Token generation error: {}", msg),
            AuthError::InsufficientPermissions { required, actual } => warn!(
                "Authorization failed: required role '{}', user has role '{}'",
                required, actual
            ),
            AuthError::AdminAlreadyExists => warn!("Rejected admin claim: admin already exists"),
            _ => {}
        }

        let body = Json(json!({
            "error": self.error_message(),
        }));

        (self.status_code(), body).into_response()
    }
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::EmailAlreadyExists => StatusCode::CONFLICT,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::PasswordHashError => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InvalidPasswordFormat(_) => StatusCode::BAD_REQUEST,
            AuthError::TokenGenerationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InsufficientPermissions { .. } => StatusCode::FORBIDDEN,
            AuthError::AdminAlreadyExists => StatusCode::CONFLICT,
        }
    }

    /// Message safe to send to clients
    pub fn error_message(&self) -> String {
        match self {
            AuthError::ValidationError(msg) => msg.clone(),
            AuthError::InvalidPasswordFormat(msg) => msg.clone(),
            AuthError::DatabaseError(_)
            | AuthError::PasswordHashError
            | AuthError::TokenGenerationError(_) => "Internal server error".to_string(),
            AuthError::InsufficientPermissions { required, .. } => {
                format!("Insufficient permissions: required role '{}'", required)
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::EmailAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::AdminAlreadyExists.status_code(), StatusCode::CONFLICT);
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AuthError::InsufficientPermissions {
                required: Role::Admin,
                actual: Role::User
            }
            .status_code(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = AuthError::DatabaseError("relation users does not exist".to_string());
        assert_eq!(err.error_message(), "Internal server error");

        let err = AuthError::TokenGenerationError("bad key".to_string());
        assert_eq!(err.error_message(), "Internal server error");
    }

    #[test]
    fn test_permission_message_names_required_role_only() {
        let err = AuthError::InsufficientPermissions {
            required: Role::Admin,
            actual: Role::User,
        };
        assert_eq!(err.error_message(), "Insufficient permissions: required role 'admin'");
    }
}
