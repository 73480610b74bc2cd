//! Driving port for the login use-case.
//!
//! Inbound adapters call this port to check credentials without knowing the
//! backing infrastructure, so handler tests can substitute a double.

use async_trait::async_trait;

use crate::domain::{AuthResult, LoginAttempt};

/// Domain use-case port for checking credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate the attempt and check it against the stored account.
    ///
    /// Success means "credentials valid" only; no session or token is issued.
    async fn login(&self, attempt: &LoginAttempt) -> AuthResult;
}
