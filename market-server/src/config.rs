//! Environment-driven configuration

use std::str::FromStr;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Runtime settings, all sourced from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    pub http_port: u16,
    /// development | staging | production
    pub environment: String,
    /// HS256 signing secret for access tokens
    pub jwt_secret: String,
    /// Access token lifetime in minutes
    pub jwt_expiration_minutes: i64,
    /// Seconds between order expiry sweeps
    pub order_sweep_interval_secs: u64,
    /// Registrations with this email become the admin account
    pub admin_email: Option<String>,
    /// Comma-separated allowed CORS origins; unset allows any origin
    pub cors_allowed_origins: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            http_port: env_or("HTTP_PORT", 8080),
            jwt_secret: require_secret("JWT_SECRET", &environment)?,
            jwt_expiration_minutes: env_or("JWT_EXPIRATION_MINUTES", 1440),
            order_sweep_interval_secs: env_or("ORDER_SWEEP_INTERVAL_SECS", 86_400),
            admin_email: std::env::var("ADMIN_EMAIL")
                .ok()
                .filter(|s| !s.is_empty())
                .map(|s| s.trim().to_lowercase()),
            cors_allowed_origins: std::env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .filter(|s| !s.is_empty()),
            environment,
        })
    }
}

/// Parse a numeric env var, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Secrets must be set and non-empty outside development; in development a
/// placeholder is substituted so the server starts without a .env file.
fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
    match std::env::var(name).ok().filter(|v| !v.is_empty()) {
        Some(v) => Ok(v),
        None if environment == "development" => Ok(format!("insecure-dev-{name}")),
        None => Err(format!("{name} is required when ENVIRONMENT={environment}").into()),
    }
}
