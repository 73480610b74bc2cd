//! HTTP server configuration object.

use std::net::SocketAddr;

use chat_backend::config::ServerSettings;
use chat_backend::middleware::rate_limit::RateLimitPolicy;
use chat_backend::outbound::persistence::DbPool;

/// Everything [`super::create_server`] needs, built once in `main`.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) bcrypt_cost: u32,
    pub(crate) rate_limit: RateLimitPolicy,
}

impl ServerConfig {
    /// Combine validated settings with the connected pool.
    #[must_use]
    pub fn new(settings: &ServerSettings, db_pool: DbPool) -> Self {
        Self {
            bind_addr: settings.bind_addr,
            db_pool,
            bcrypt_cost: settings.bcrypt_cost,
            rate_limit: settings.rate_limit,
        }
    }
}
