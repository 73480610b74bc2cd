//! Backend entry-point: loads configuration, prepares the database and serves
//! the credential endpoints.

mod server;

use actix_web::web;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use chat_backend::config::AppSettings;
use chat_backend::inbound::http::health::HealthState;
use chat_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, create_server};

fn fatal(message: impl std::fmt::Display) -> std::io::Error {
    error!(%message, "startup failed");
    std::io::Error::other(message.to_string())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_args(std::env::args_os())
        .and_then(|raw| raw.validate())
        .map_err(fatal)?;

    if settings.run_migrations {
        run_pending_migrations(settings.database_url.clone())
            .await
            .map_err(fatal)?;
    } else {
        info!("skipping database migrations");
    }

    let pool = DbPool::new(
        PoolConfig::new(settings.database_url.clone())
            .with_max_size(settings.db_pool_max_size)
            .with_connection_timeout(settings.db_connection_timeout),
    )
    .await
    .map_err(fatal)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, &ServerConfig::new(&settings, pool))?;
    server.await
}
