//! Configuration for the D-Day service
//!
//! Values come from environment variables. Missing or unparsable values fall
//! back to the defaults so a bare environment still boots.

use crate::database::DatabasePoolConfig;
use crate::error::{DDayError, Result};
use dday_common::{DEFAULT_DATABASE_URL, DEFAULT_PORT};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Maximum open connections when `DB_MAX_OPEN_CONNS` is not set
pub const DEFAULT_MAX_OPEN_CONNS: u32 = 25;
/// Connections kept warm when `DB_MAX_IDLE_CONNS` is not set
pub const DEFAULT_MAX_IDLE_CONNS: u32 = 1;
/// Connection lifetime in seconds when `DB_CONN_MAX_LIFETIME` is not set
pub const DEFAULT_CONN_MAX_LIFETIME_SECS: u64 = 300;

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Deployment environment name, `development` by default
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: "development".to_string(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

/// Database location and pool sizing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// sqlx connection string, e.g. `sqlite://dday.db?mode=rwc`
    pub url: String,
    pub pool: DatabasePoolConfig,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            pool: pool_config(
                DEFAULT_MAX_OPEN_CONNS,
                DEFAULT_MAX_IDLE_CONNS,
                DEFAULT_CONN_MAX_LIFETIME_SECS,
            ),
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DDayConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl DDayConfig {
    /// Create configuration from environment variables
    ///
    /// Reads `PORT`, `ENV`, `DATABASE_URL`, `DB_MAX_OPEN_CONNS`,
    /// `DB_MAX_IDLE_CONNS` and `DB_CONN_MAX_LIFETIME`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server = ServerConfig {
            port: parsed_or(non_empty("PORT"), DEFAULT_PORT),
            environment: non_empty("ENV").unwrap_or_else(|| "development".to_string()),
        };

        let database = DatabaseConfig {
            url: non_empty("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            pool: pool_config(
                parsed_or(non_empty("DB_MAX_OPEN_CONNS"), DEFAULT_MAX_OPEN_CONNS),
                parsed_or(non_empty("DB_MAX_IDLE_CONNS"), DEFAULT_MAX_IDLE_CONNS),
                parsed_or(
                    non_empty("DB_CONN_MAX_LIFETIME"),
                    DEFAULT_CONN_MAX_LIFETIME_SECS,
                ),
            ),
        };

        Self { server, database }
    }

    /// Reject configurations the pool cannot be built from
    ///
    /// # Errors
    ///
    /// Returns `DDayError::Configuration` if the database URL is empty or the
    /// pool allows no connections
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(DDayError::configuration("Database URL must not be empty"));
        }
        if self.database.pool.max_connections == 0 {
            return Err(DDayError::configuration(
                "DB_MAX_OPEN_CONNS must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn parsed_or<T: FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn pool_config(max_open: u32, max_idle: u32, lifetime_secs: u64) -> DatabasePoolConfig {
    DatabasePoolConfig {
        max_connections: max_open,
        min_connections: max_idle.min(max_open),
        max_lifetime: Duration::from_secs(lifetime_secs),
        ..DatabasePoolConfig::default()
    }
}
