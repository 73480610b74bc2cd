//! OpenAPI schema definitions for response envelopes.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`; the
//! wrappers here mirror their serialised shape for the generated document.

use serde::Serialize;
use utoipa::ToSchema;

use super::auth::CreatedUser;

/// OpenAPI schema for [`crate::domain::Message`]: a sentence or a list of
/// validation issues.
#[derive(Serialize, ToSchema)]
#[schema(as = crate::domain::Message)]
#[serde(untagged)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub enum MessageSchema {
    /// Single message.
    Single(String),
    /// Validation issues in rule order.
    List(Vec<String>),
}

/// Envelope carrying only a status flag and message.
#[derive(ToSchema)]
#[schema(as = Envelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EnvelopeSchema {
    /// True for 2xx responses.
    success: bool,
    /// Outcome message, omitted when absent.
    message: Option<MessageSchema>,
}

/// Envelope returned by a successful registration.
#[derive(ToSchema)]
#[schema(as = SignUpEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SignUpEnvelopeSchema {
    /// Always true.
    success: bool,
    /// `User registered successfully`.
    message: Option<MessageSchema>,
    /// Identifier of the new account.
    data: Option<CreatedUser>,
}
