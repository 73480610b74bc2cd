//! HTTP inbound adapter exposing the credential endpoints.

pub mod app;
pub mod auth;
pub mod envelope;
pub mod error;
pub mod fallback;
pub mod health;
pub mod schemas;
pub mod state;

pub use error::ApiResult;
