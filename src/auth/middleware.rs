// Authentication extractors for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{error::AuthError, models::Role, token::TokenService};

/// Query parameter accepted in place of the Authorization header.
/// Browsers cannot set headers on an EventSource connection.
const TOKEN_QUERY_PARAM: &str = "access_token";

/// Authenticated user extractor for protected routes
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn token_from_query(parts: &Parts) -> Option<String> {
    parts.uri.query()?.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == TOKEN_QUERY_PARAM && !value.is_empty()).then(|| value.to_string())
    })
}

/// Pull the bearer token from the Authorization header or the query string
fn bearer_token(parts: &Parts) -> Result<String, AuthError> {
    match parts.headers.get(header::AUTHORIZATION) {
        Some(value) => {
            let value = value.to_str().map_err(|_| AuthError::InvalidToken)?;
            value
                .strip_prefix("Bearer ")
                .map(|t| t.trim().to_string())
                .ok_or_else(|| {
                    warn!(
                        "Authorization header missing 'Bearer ' prefix for endpoint: {}",
                        parts.uri.path()
                    );
                    AuthError::InvalidToken
                })
        }
        None => token_from_query(parts).ok_or(AuthError::MissingToken),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let token_service = Arc::<TokenService>::from_ref(state);
        let claims = token_service.validate_access_token(&token)?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Extractor that only admits callers holding the admin role
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl std::ops::Deref for AdminUser {
    type Target = AuthenticatedUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if user.role != Role::Admin {
            warn!(
                "Authorization failed: user_id={}, required_role={}, actual_role={}, endpoint={}",
                user.user_id,
                Role::Admin,
                user.role,
                parts.uri.path()
            );
            return Err(AuthError::InsufficientPermissions {
                required: Role::Admin,
                actual: user.role,
            });
        }

        debug!(
            "Authorization successful: user_id={}, endpoint={}",
            user.user_id,
            parts.uri.path()
        );
        Ok(AdminUser(user))
    }
}
