//! Application configuration loaded from environment variables.

use std::env;

use yatube_core::pagination::DEFAULT_PER_PAGE;
use yatube_infra::{JwtConfig, JwtConfigError};
use yatube_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// Page size of every post listing.
    pub posts_per_page: u64,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, JwtConfigError> {
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(100),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(10),
        });

        let posts_per_page = match parse_var::<u64>("POSTS_PER_PAGE") {
            Some(0) => {
                tracing::warn!("POSTS_PER_PAGE must be positive, using {}", DEFAULT_PER_PAGE);
                DEFAULT_PER_PAGE
            }
            Some(n) => n,
            None => DEFAULT_PER_PAGE,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            posts_per_page,
            jwt: JwtConfig::from_env()?,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.trim().parse().ok())
}
