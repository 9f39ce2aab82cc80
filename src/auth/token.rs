// JWT token generation and validation service

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{error::AuthError, models::Role};

/// Which half of a token pair a JWT is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user_id
    pub email: String,
    pub role: Role,
    pub kind: TokenKind,
    /// Unique per token so two pairs issued in the same second still differ
    pub jti: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or_else(Utc::now)
    }
}

/// Freshly issued access/refresh pair
#[derive(Debug)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_expires_at: DateTime<Utc>,
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

    fn generate(
        &self,
        user_id: Uuid,
        email: &str,
        role: Role,
        kind: TokenKind,
    ) -> Result<(String, Claims), AuthError> {
        let now = Utc::now().timestamp();
        let duration = match kind {
            TokenKind::Access => self.access_token_duration,
            TokenKind::Refresh => self.refresh_token_duration,
        };

        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            kind,
            jti: Uuid::new_v4(),
            iat: now,
            exp: now + duration,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))?;

        Ok((token, claims))
    }

    /// Generate an access token (15 minutes)
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        email: &str,
        role: Role,
    ) -> Result<String, AuthError> {
        self.generate(user_id, email, role, TokenKind::Access)
            .map(|(token, _)| token)
    }

    /// Generate a refresh token (7 days)
    pub fn generate_refresh_token(
        &self,
        user_id: Uuid,
        email: &str,
        role: Role,
    ) -> Result<String, AuthError> {
        self.generate(user_id, email, role, TokenKind::Refresh)
            .map(|(token, _)| token)
    }

    /// Validate an access token; refresh tokens are rejected
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_token(token, TokenKind::Access)
    }

    /// Validate a refresh token; access tokens are rejected
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate_token(token, TokenKind::Refresh)
    }

    fn validate_token(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })?;

        if claims.kind != expected {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }

    /// Generate both access and refresh tokens
    pub fn generate_token_pair(
        &self,
        user_id: Uuid,
        email: &str,
        role: Role,
    ) -> Result<TokenPair, AuthError> {
        let (access_token, _) = self.generate(user_id, email, role, TokenKind::Access)?;
        let (refresh_token, refresh_claims) =
            self.generate(user_id, email, role, TokenKind::Refresh)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            refresh_expires_at: refresh_claims.expires_at(),
        })
    }
}
