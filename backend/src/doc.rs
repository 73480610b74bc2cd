//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the credential and health endpoints together with the
//! envelope schema wrappers from [`crate::inbound::http::schemas`]. Swagger UI
//! serves it in debug builds and `openapi-dump` prints it for tooling.

use utoipa::OpenApi;

use crate::inbound::http::auth::{CreatedUser, LoginRequest, SignUpRequest};
use crate::inbound::http::schemas::{EnvelopeSchema, MessageSchema, SignUpEnvelopeSchema};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chat backend auth API",
        description = "Credential registration, login and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
    ),
    components(schemas(
        LoginRequest,
        SignUpRequest,
        CreatedUser,
        MessageSchema,
        EnvelopeSchema,
        SignUpEnvelopeSchema
    )),
    tags(
        (name = "auth", description = "Account registration and credential checks"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
