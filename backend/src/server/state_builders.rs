//! Wiring of driven adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use chat_backend::domain::AuthService;
use chat_backend::inbound::http::state::HttpState;
use chat_backend::outbound::crypto::BcryptPasswordHasher;
use chat_backend::outbound::persistence::DieselUserRepository;

use super::ServerConfig;

/// Build the auth service over PostgreSQL and bcrypt.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let service = AuthService::new(
        Arc::new(DieselUserRepository::new(config.db_pool.clone())),
        Arc::new(BcryptPasswordHasher::new(config.bcrypt_cost)),
    );
    web::Data::new(HttpState::from_service(Arc::new(service)))
}
