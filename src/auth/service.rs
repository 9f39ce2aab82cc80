// Authentication service - business logic layer

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::{
    error::AuthError,
    models::{AdminSetupStatus, AuthResponse, Role, User, UserResponse},
    password::PasswordService,
    repository::{TokenRepository, UserRepository},
    token::TokenService,
};

/// Authentication service coordinating all auth operations
pub struct AuthService {
    user_repo: UserRepository,
    token_repo: TokenRepository,
    token_service: Arc<TokenService>,
}

impl AuthService {
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

    /// Issue and persist a token pair for a user
    async fn issue_tokens(&self, user: User, role: Role) -> Result<AuthResponse, AuthError> {
        let pair = self
            .token_service
            .generate_token_pair(user.id, &user.email, role)?;

        self.token_repo
            .store_refresh_token(user.id, &pair.refresh_token, pair.refresh_expires_at)
            .await?;

        Ok(AuthResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer".to_string(),
            user: UserResponse::from_user(user, role),
        })
    }

    /// Register a new user
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<AuthResponse, AuthError> {
        PasswordService::validate_password_strength(password)?;

        let email = email.trim().to_lowercase();
        let full_name = full_name.map(str::trim).filter(|n| !n.is_empty());
        let password_hash = PasswordService::hash_password(password)?;

        let user = self
            .user_repo
            .create_user(&email, full_name, &password_hash)
            .await?;

        info!(user_id = %user.id, "User registered");
        self.issue_tokens(user, Role::User).await
    }

    /// Login a user
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AuthError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !PasswordService::verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(AuthError::InvalidCredentials);
        }

        let role = self.user_repo.role_for(user.id).await?;
        info!(user_id = %user.id, role = %role, "User logged in");
        self.issue_tokens(user, role).await
    }

    /// Exchange a refresh token for a new pair; the old token is revoked
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        let claims = self.token_service.validate_refresh_token(refresh_token)?;

        let stored = self
            .token_repo
            .take_refresh_token(refresh_token)
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

        // Role is re-read so promotions take effect on the next refresh
        let role = self.user_repo.role_for(user.id).await?;
        self.issue_tokens(user, role).await
    }

    /// Revoke a refresh token
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        self.token_repo.invalidate_token(refresh_token).await
    }

    /// Get current user information
    pub async fn get_current_user(&self, user_id: Uuid) -> Result<UserResponse, AuthError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        let role = self.user_repo.role_for(user_id).await?;

        Ok(UserResponse::from_user(user, role))
    }

    pub async fn setup_status(&self, user_id: Uuid) -> Result<AdminSetupStatus, AuthError> {
        Ok(AdminSetupStatus {
            has_admin: self.user_repo.admin_exists().await?,
            is_admin: self.user_repo.role_for(user_id).await? == Role::Admin,
        })
    }

    /// Make the caller the first admin and hand back tokens carrying the new role
    pub async fn claim_admin(&self, user_id: Uuid) -> Result<AuthResponse, AuthError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self.user_repo.claim_admin(user_id).await? {
            return Err(AuthError::AdminAlreadyExists);
        }

        info!(user_id = %user_id, "Admin role claimed");
        self.issue_tokens(user, Role::Admin).await
    }

    /// Remove expired refresh tokens
    pub async fn purge_expired_tokens(&self) -> Result<u64, AuthError> {
        self.token_repo.delete_expired_tokens().await
    }
}
