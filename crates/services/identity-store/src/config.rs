//! Identity store configuration.

use std::env;

use common::DatabaseConfig;

/// Identity store configuration.
#[derive(Debug, Clone, Default)]
pub struct IdentityStoreConfig {
    pub database: DatabaseConfig,
}

impl IdentityStoreConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = DatabaseConfig::default();

        Self {
            database: DatabaseConfig {
                url: env::var("IDENTITY_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.url),
                max_connections: parse_var("IDENTITY_DB_MAX_CONNECTIONS")
                    .unwrap_or(defaults.max_connections),
                min_connections: parse_var("IDENTITY_DB_MIN_CONNECTIONS")
                    .unwrap_or(defaults.min_connections),
                connect_timeout_secs: parse_var("IDENTITY_DB_CONNECT_TIMEOUT_SECS")
                    .unwrap_or(defaults.connect_timeout_secs),
                sqlx_logging: parse_var("IDENTITY_DB_SQL_LOGGING").unwrap_or(defaults.sqlx_logging),
            },
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
