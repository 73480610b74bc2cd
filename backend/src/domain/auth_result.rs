//! Outcome of an authentication use-case.

use super::{Error, UserId};

/// Successful terminal states of the auth flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSuccess {
    /// Login credentials matched the stored account.
    Authenticated {
        /// Account that was checked.
        user_id: UserId,
    },
    /// Registration created a new account.
    Created {
        /// Generated identifier of the new account.
        user_id: UserId,
    },
}

impl AuthSuccess {
    /// Account the outcome refers to.
    pub fn user_id(self) -> UserId {
        match self {
            Self::Authenticated { user_id } | Self::Created { user_id } => user_id,
        }
    }
}

/// Result of a login or registration: a success state or a domain [`Error`]
/// whose code names the failure outcome.
pub type AuthResult = Result<AuthSuccess, Error>;
