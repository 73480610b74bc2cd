//! Server construction.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_web::dev::Server;
use actix_web::{HttpServer, web};
use tracing::info;

use chat_backend::inbound::http::app::{AppDependencies, build_app};
use chat_backend::inbound::http::health::HealthState;
use chat_backend::middleware::RateLimit;
use state_builders::build_http_state;

/// Bind the HTTP server and mark the service ready.
///
/// # Returns
/// A [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state: build_http_state(config),
        rate_limit: RateLimit::new(config.rate_limit),
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(config.bind_addr)?
        .run();

    health_state.mark_ready();
    info!(addr = %config.bind_addr, "listening");
    Ok(server)
}
