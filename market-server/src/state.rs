//! Shared application state

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::auth::{JwtConfig, JwtService};
use crate::config::Config;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// State handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub jwt: JwtService,
    /// Registrations with this email are promoted to admin
    pub admin_email: Option<String>,
}

impl AppState {
    /// Connect to Postgres, apply pending migrations and build the JWT
    /// service.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(16)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let jwt = JwtService::new(JwtConfig::new(
            config.jwt_secret.clone(),
            config.jwt_expiration_minutes,
        ));

        Ok(Self {
            pool,
            jwt,
            admin_email: config.admin_email.clone(),
        })
    }
}
