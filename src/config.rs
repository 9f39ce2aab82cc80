// Runtime configuration loaded from environment variables

use std::env;
use std::path::PathBuf;

/// Error raised when a configuration value is missing or malformed
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub email: EmailConfig,
    pub payment: PaymentDetails,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Where payment proofs are written and how their public URLs are built
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub public_base_url: String,
}

/// Resend settings; emails are skipped when `api_key` is `None`
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_key: Option<String>,
    pub from: String,
}

/// Bank details shown to applicants before they upload a payment proof
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct PaymentDetails {
    #[schema(example = "Opay")]
    pub bank: String,
    #[schema(example = "6111931518")]
    pub account_number: String,
    #[schema(example = "Olusegun Raphael")]
    pub account_name: String,
}

impl Default for PaymentDetails {
    fn default() -> Self {
        Self {
            bank: "Opay".to_string(),
            account_number: "6111931518".to_string(),
            account_name: "Olusegun Raphael".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// Call `dotenv::dotenv()` first if a `.env` file should be honoured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            storage: StorageConfig::from_env(),
            email: EmailConfig::from_env(),
            payment: PaymentDetails::from_env(),
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("PORT", 8080u16)?;
        let cors_allowed_origins = parse_origins(
            &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        Ok(Self {
            host,
            port,
            cors_allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let max_connections = parse_var("DATABASE_MAX_CONNECTIONS", 5u32)?;
        Ok(Self {
            url,
            max_connections,
        })
    }
}

impl AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.len() < 16 {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                reason: "must be at least 16 characters".to_string(),
            });
        }
        Ok(Self { jwt_secret })
    }
}

impl StorageConfig {
    fn from_env() -> Self {
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());
        let public_base_url =
            env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
        Self {
            upload_dir: PathBuf::from(upload_dir),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl EmailConfig {
    fn from_env() -> Self {
        let api_key = env::var("RESEND_API_KEY").ok().filter(|k| !k.trim().is_empty());
        let from = env::var("EMAIL_FROM")
            .unwrap_or_else(|_| "NYSC Support <onboarding@resend.dev>".to_string());
        Self { api_key, from }
    }
}

impl PaymentDetails {
    fn from_env() -> Self {
        let defaults = PaymentDetails::default();
        Self {
            bank: env::var("PAYMENT_BANK").unwrap_or(defaults.bank),
            account_number: env::var("PAYMENT_ACCOUNT_NUMBER").unwrap_or(defaults.account_number),
            account_name: env::var("PAYMENT_ACCOUNT_NAME").unwrap_or(defaults.account_name),
        }
    }
}

fn parse_var<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Split a comma separated origin list, dropping empty entries
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
