//! Credential endpoints.
//!
//! ```text
//! POST /auth/login  {"email":"ann@x.com","password":"abcde"}
//! POST /auth/signUp {"name":"Ann","email":"ann@x.com","password":"abcde","username":"ann1"}
//! ```
//!
//! Missing or `null` fields are handed to the validator as empty strings so it
//! can report every issue at once instead of failing on the first absent key.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuthSuccess, LoginAttempt, Password, RegistrationAttempt};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::send_response;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    /// Account email address.
    #[schema(example = "ann@x.com")]
    pub email: Option<String>,
    /// Plaintext password.
    #[schema(example = "abcde")]
    pub password: Option<String>,
}

impl From<LoginRequest> for LoginAttempt {
    fn from(value: LoginRequest) -> Self {
        Self {
            email: value.email.unwrap_or_default(),
            password: Password::new(value.password.unwrap_or_default()),
        }
    }
}

/// Registration request body for `POST /auth/signUp`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct SignUpRequest {
    /// Display name.
    #[schema(example = "Ann")]
    pub name: Option<String>,
    /// Unique email address.
    #[schema(example = "ann@x.com")]
    pub email: Option<String>,
    /// Plaintext password, at least five characters.
    #[schema(example = "abcde")]
    pub password: Option<String>,
    /// Unique handle.
    #[schema(example = "ann1")]
    pub username: Option<String>,
}

impl From<SignUpRequest> for RegistrationAttempt {
    fn from(value: SignUpRequest) -> Self {
        Self {
            name: value.name.unwrap_or_default(),
            email: value.email.unwrap_or_default(),
            password: Password::new(value.password.unwrap_or_default()),
            username: value.username.unwrap_or_default(),
        }
    }
}

/// `data` payload of a successful registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct CreatedUser {
    /// Generated account identifier.
    #[schema(example = 1)]
    pub id: i32,
}

fn status_for(outcome: AuthSuccess) -> StatusCode {
    match outcome {
        AuthSuccess::Authenticated { .. } => StatusCode::OK,
        AuthSuccess::Created { .. } => StatusCode::CREATED,
    }
}

/// Check credentials against the stored account.
///
/// Success only confirms the credentials; no session or token is issued.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials valid", body = crate::inbound::http::schemas::EnvelopeSchema),
        (status = 400, description = "Invalid input or incorrect password", body = crate::inbound::http::schemas::EnvelopeSchema),
        (status = 404, description = "No account for the email", body = crate::inbound::http::schemas::EnvelopeSchema),
        (status = 429, description = "Rate limit exceeded", body = crate::inbound::http::schemas::EnvelopeSchema),
        (status = 500, description = "Internal server error", body = crate::inbound::http::schemas::EnvelopeSchema)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let attempt = LoginAttempt::from(payload.into_inner());
    let outcome = state.login.login(&attempt).await?;
    Ok(send_response::<()>(
        status_for(outcome),
        Some("User logged in successfully".into()),
        None,
    ))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/auth/signUp",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = crate::inbound::http::schemas::SignUpEnvelopeSchema),
        (status = 400, description = "Invalid input or account already exists", body = crate::inbound::http::schemas::EnvelopeSchema),
        (status = 429, description = "Rate limit exceeded", body = crate::inbound::http::schemas::EnvelopeSchema),
        (status = 500, description = "Internal server error", body = crate::inbound::http::schemas::EnvelopeSchema)
    ),
    tags = ["auth"],
    operation_id = "signUp"
)]
#[post("/signUp")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let attempt = RegistrationAttempt::from(payload.into_inner());
    let outcome = state.registration.sign_up(&attempt).await?;
    Ok(send_response(
        status_for(outcome),
        Some("User registered successfully".into()),
        Some(CreatedUser {
            id: outcome.user_id().value(),
        }),
    ))
}

/// Mount the credential endpoints under `/auth`.
pub fn scope() -> actix_web::Scope {
    web::scope("/auth").service(login).service(sign_up)
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
