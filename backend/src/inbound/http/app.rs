//! Application assembly shared by the server binary and integration tests.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, body::MessageBody, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::middleware::{CatchPanic, RateLimit, Trace, security_headers};

use super::fallback::{internal_error_handlers, json_config, route_not_found};
use super::health::{HealthState, health, ready};
use super::state::HttpState;

/// Everything the application factory needs; cloned per worker.
#[derive(Clone)]
pub struct AppDependencies {
    /// Readiness flag shared with the server.
    pub health_state: web::Data<HealthState>,
    /// Driving ports used by the handlers.
    pub http_state: web::Data<HttpState>,
    /// Client counters shared across workers.
    pub rate_limit: RateLimit,
}

/// Build the application with routes, fallbacks and middleware.
///
/// Middleware order, outermost first: tracing, security headers, rate
/// limiting, 500 body replacement, panic guard.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        rate_limit,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .service(health)
        .service(ready)
        .service(super::auth::scope());

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(route_not_found))
        .wrap(CatchPanic)
        .wrap(internal_error_handlers())
        .wrap(rate_limit)
        .wrap(security_headers())
        .wrap(Trace)
}
