// Database repositories for users, roles and refresh tokens

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::like_pattern;
use crate::auth::{
    error::AuthError,
    models::{RefreshToken, Role, User, UserWithRole},
};

/// Advisory lock key serializing admin claims
const ADMIN_CLAIM_LOCK: i64 = 0x4e59_5343;

/// User repository for database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with the default `user` role
    pub async fn create_user(
        &self,
        email: &str,
        full_name: Option<&str>,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, full_name, password_hash) VALUES ($1, $2, $3)
             RETURNING id, email, full_name, password_hash, created_at",
        )
        .bind(email)
        .bind(full_name)
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AuthError::EmailAlreadyExists;
                }
            }
            AuthError::DatabaseError(e.to_string())
        })?;

        sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2)")
            .bind(user.id)
            .bind(Role::User)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Find a user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, full_name, password_hash, created_at
             FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, full_name, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Role of a user; accounts without a role row are plain users
    pub async fn role_for(&self, user_id: Uuid) -> Result<Role, AuthError> {
        let role: Option<(Role,)> = sqlx::query_as("SELECT role FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(role.map(|(r,)| r).unwrap_or_default())
    }

    pub async fn admin_exists(&self) -> Result<bool, AuthError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM user_roles WHERE role = 'admin')")
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    /// Promote a user to admin if and only if no admin exists yet.
    /// Returns false when an admin already exists.
    pub async fn claim_admin(&self, user_id: Uuid) -> Result<bool, AuthError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ADMIN_CLAIM_LOCK)
            .execute(&mut *tx)
            .await?;

        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM user_roles WHERE role = 'admin')")
                .fetch_one(&mut *tx)
                .await?;
        if exists {
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO user_roles (user_id, role) VALUES ($1, $2)
             ON CONFLICT (user_id) DO UPDATE SET role = EXCLUDED.role",
        )
        .bind(user_id)
        .bind(Role::Admin)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// All users with their roles, newest first.
    /// `search` matches email, full name or role, case-insensitively.
    pub async fn list_with_roles(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<UserWithRole>, AuthError> {
        let users = sqlx::query_as::<_, UserWithRole>(
            "SELECT u.id, u.email, u.full_name, COALESCE(r.role, 'user') AS role, u.created_at
             FROM users u
             LEFT JOIN user_roles r ON r.user_id = u.id
             WHERE $1::text IS NULL
                OR LOWER(u.email) LIKE $1
                OR LOWER(COALESCE(u.full_name, '')) LIKE $1
                OR LOWER(COALESCE(r.role, 'user')) LIKE $1
             ORDER BY u.created_at DESC",
        )
        .bind(like_pattern(search))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }
}

/// Token repository for refresh token operations
#[derive(Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Hash a token using SHA-256
    pub(crate) fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Store a refresh token (hashed with SHA-256)
    pub async fn store_refresh_token(
        &self,
        user_id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO refresh_tokens (user_id, token_hash, expires_at) VALUES ($1, $2, $3)",
        )
        .bind(user_id)
        .bind(Self::hash_token(token))
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Atomically consume a refresh token: deletes it and returns the row
    /// when it existed and had not expired
    pub async fn take_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
        let refresh_token = sqlx::query_as::<_, RefreshToken>(
            "DELETE FROM refresh_tokens
             WHERE token_hash = $1 AND expires_at > NOW()
             RETURNING id, user_id, token_hash, expires_at, created_at",
        )
        .bind(Self::hash_token(token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(refresh_token)
    }

    /// Invalidate a refresh token
    pub async fn invalidate_token(&self, token: &str) -> Result<(), AuthError> {
        sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = $1")
            .bind(Self::hash_token(token))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete expired tokens
    pub async fn delete_expired_tokens(&self) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
