//! Request middleware.
//!
//! Tracing and access logging, per-client rate limiting, security response
//! headers and a panic guard.

pub mod catch_panic;
pub mod rate_limit;
pub mod security_headers;
pub mod trace;

pub use catch_panic::CatchPanic;
pub use rate_limit::RateLimit;
pub use security_headers::security_headers;
pub use trace::Trace;
