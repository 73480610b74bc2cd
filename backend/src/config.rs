//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `CHAT_*` environment variables, matching CLI flags or a
//! configuration file, and are validated once at startup into
//! [`ServerSettings`]. Nothing reads the environment after that.

use std::ffi::OsString;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::middleware::rate_limit::RateLimitPolicy;
use crate::outbound::crypto::DEFAULT_BCRYPT_COST;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;
const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 100;
const DEFAULT_DB_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_DB_CONNECTION_TIMEOUT_SECS: u64 = 30;
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Raw configuration values as provided by the environment.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CHAT")]
pub struct AppSettings {
    /// PostgreSQL connection string. Required.
    pub database_url: Option<String>,
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// bcrypt work factor.
    pub bcrypt_cost: Option<u32>,
    /// Rate limit window length in seconds.
    pub rate_limit_window_secs: Option<u64>,
    /// Requests allowed per client per window.
    pub rate_limit_max_requests: Option<u32>,
    /// Maximum open database connections.
    pub db_pool_max_size: Option<u32>,
    /// Seconds to wait for a pooled database connection.
    pub db_connection_timeout_secs: Option<u64>,
    /// Leave the schema alone at startup instead of applying embedded
    /// migrations.
    #[ortho_config(default = false)]
    pub skip_migrations: bool,
}

/// Reasons configuration cannot be turned into [`ServerSettings`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Sources could not be read or parsed.
    #[error("failed to load configuration: {message}")]
    Load {
        /// Loader diagnostic.
        message: String,
    },
    /// No database connection string was supplied.
    #[error("CHAT_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    /// The host is not an IP address.
    #[error("invalid bind host {host:?}")]
    InvalidHost {
        /// Offending value.
        host: String,
    },
    /// The bcrypt cost is outside 4..=31.
    #[error("bcrypt cost {cost} is outside 4..=31")]
    InvalidBcryptCost {
        /// Offending value.
        cost: u32,
    },
    /// A count or duration that must be positive was zero.
    #[error("{setting} must be greater than zero")]
    Zero {
        /// Setting name.
        setting: &'static str,
    },
}

/// Validated settings consumed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Socket to bind.
    pub bind_addr: SocketAddr,
    /// bcrypt work factor.
    pub bcrypt_cost: u32,
    /// Per-client request allowance.
    pub rate_limit: RateLimitPolicy,
    /// Maximum open database connections.
    pub db_pool_max_size: u32,
    /// Pool checkout timeout.
    pub db_connection_timeout: Duration,
    /// Apply embedded migrations at startup.
    pub run_migrations: bool,
}

fn non_zero(value: u32, setting: &'static str) -> Result<NonZeroU32, ConfigError> {
    NonZeroU32::new(value).ok_or(ConfigError::Zero { setting })
}

impl AppSettings {
    /// Load settings from the environment and `args`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a source cannot be parsed.
    pub fn load_from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Self::load_from_iter(args).map_err(|err| ConfigError::Load {
            message: err.to_string(),
        })
    }

    /// Validate raw values, applying defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid setting.
    pub fn validate(&self) -> Result<ServerSettings, ConfigError> {
        let database_url = self
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingDatabaseUrl)?
            .to_owned();

        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.parse().map_err(|_| ConfigError::InvalidHost {
            host: host.to_owned(),
        })?;
        let bind_addr = SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT));

        let bcrypt_cost = self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST);
        if !BCRYPT_COST_RANGE.contains(&bcrypt_cost) {
            return Err(ConfigError::InvalidBcryptCost { cost: bcrypt_cost });
        }

        let window_secs = self
            .rate_limit_window_secs
            .unwrap_or(DEFAULT_RATE_LIMIT_WINDOW_SECS);
        if window_secs == 0 {
            return Err(ConfigError::Zero {
                setting: "rate_limit_window_secs",
            });
        }
        let max_requests = non_zero(
            self.rate_limit_max_requests
                .unwrap_or(DEFAULT_RATE_LIMIT_MAX_REQUESTS),
            "rate_limit_max_requests",
        )?;
        let db_pool_max_size = non_zero(
            self.db_pool_max_size.unwrap_or(DEFAULT_DB_POOL_MAX_SIZE),
            "db_pool_max_size",
        )?
        .get();
        let db_connection_timeout_secs = self
            .db_connection_timeout_secs
            .unwrap_or(DEFAULT_DB_CONNECTION_TIMEOUT_SECS);
        if db_connection_timeout_secs == 0 {
            return Err(ConfigError::Zero {
                setting: "db_connection_timeout_secs",
            });
        }

        Ok(ServerSettings {
            database_url,
            bind_addr,
            bcrypt_cost,
            rate_limit: RateLimitPolicy::new(Duration::from_secs(window_secs), max_requests),
            db_pool_max_size,
            db_connection_timeout: Duration::from_secs(db_connection_timeout_secs),
            run_migrations: !self.skip_migrations,
        })
    }
}
