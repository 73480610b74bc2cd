//! Driving port for the registration use-case.

use async_trait::async_trait;

use crate::domain::{AuthResult, RegistrationAttempt};

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Validate the attempt and create the account.
    async fn sign_up(&self, attempt: &RegistrationAttempt) -> AuthResult;
}
