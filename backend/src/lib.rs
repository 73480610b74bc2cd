//! Credential registration and login gateway for the chat backend.
//!
//! Layout follows a hexagonal split: [`domain`] holds the account model,
//! validation and use-cases; [`inbound`] adapts HTTP onto the driving ports;
//! [`outbound`] implements the driven ports against PostgreSQL and bcrypt.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(feature = "test-support")]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
