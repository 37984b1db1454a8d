use crate::core::{AppError, BusinessTimezone, Result};
use std::env;

pub mod database;
pub mod server;

pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Minimum length of the cookie signing secret (actix `Key::from` requirement)
pub const MIN_SESSION_SECRET_LEN: usize = 64;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: LogFormat,
    pub timezone: BusinessTimezone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(AppError::configuration(format!(
                "Invalid LOG_FORMAT '{}', expected 'pretty' or 'json'",
                other
            ))),
        }
    }
}

/// Single-tenant login settings
#[derive(Clone)]
pub struct AuthConfig {
    /// Username allowed to sign in; login is refused when unset
    pub username: Option<String>,
    /// Argon2 PHC hash of the password; login is refused when unset
    pub password_hash: Option<String>,
    /// Value the frontend must send in `X-App-Auth`
    pub app_auth_key: String,
    pub session_secret: String,
}

// Keep secrets out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("username", &self.username)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .field("app_auth_key", &"<redacted>")
            .field("session_secret", &"<redacted>")
            .finish()
    }
}

impl AuthConfig {
    /// Credentials are only usable when both halves are present
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password_hash) {
            (Some(username), Some(hash)) if !username.is_empty() && !hash.is_empty() => {
                Some((username.as_str(), hash.as_str()))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub login_rate_limit_per_minute: u32,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env::var("LOG_FORMAT")
                    .unwrap_or_else(|_| "pretty".to_string())
                    .parse()?,
                timezone: BusinessTimezone::parse(
                    &env::var("APP_UTC_OFFSET").unwrap_or_else(|_| "+00:00".to_string()),
                )?,
            },
            database: DatabaseConfig::from_env()?,
            server: ServerConfig::from_env()?,
            auth: AuthConfig {
                username: env::var("APP_USERNAME").ok(),
                password_hash: env::var("APP_PASSWORD_HASH").ok(),
                app_auth_key: env::var("APP_AUTH_KEY")
                    .unwrap_or_else(|_| "app-frontend".to_string()),
                session_secret: env::var("SESSION_SECRET")
                    .map_err(|_| AppError::configuration("SESSION_SECRET not set"))?,
            },
            security: SecurityConfig {
                login_rate_limit_per_minute: env::var("LOGIN_RATE_LIMIT_PER_MINUTE")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .map_err(|_| {
                        AppError::configuration("Invalid LOGIN_RATE_LIMIT_PER_MINUTE")
                    })?,
                cors_allowed_origins: parse_origin_list(
                    &env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
                ),
            },
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.session_secret.len() < MIN_SESSION_SECRET_LEN {
            return Err(AppError::configuration(format!(
                "SESSION_SECRET must be at least {} bytes",
                MIN_SESSION_SECRET_LEN
            )));
        }

        if self.security.login_rate_limit_per_minute == 0 {
            return Err(AppError::configuration(
                "Login rate limit must be greater than 0",
            ));
        }

        if self.database.pool_size > self.database.max_connections {
            return Err(AppError::configuration(
                "DATABASE_POOL_SIZE cannot exceed DATABASE_MAX_CONNECTIONS",
            ));
        }

        if self.auth.credentials().is_none() {
            tracing::warn!("APP_USERNAME or APP_PASSWORD_HASH not set; login will be refused");
        }

        Ok(())
    }
}

fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/'))
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
