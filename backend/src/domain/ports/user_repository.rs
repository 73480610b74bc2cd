//! Port abstraction for user persistence adapters and their errors.
//!
//! The repository is pure persistence: it never decides whether a
//! registration is allowed, it only reports what storage accepted.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{EmailAddress, NewUser, User, UserId};

use super::define_port_error;

/// Column protected by a uniqueness constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    /// `users.email`.
    Email,
    /// `users.user_name`.
    Username,
    /// Constraint could not be attributed to a column.
    Unknown,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::Username => f.write_str("username"),
            Self::Unknown => f.write_str("unique key"),
        }
    }
}

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A uniqueness constraint rejected the insert.
        Duplicate { field: UniqueField } => "user repository rejected duplicate {field}",
    }
}

/// Storage for user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch the account registered under `email`, hash included.
    ///
    /// A missing account is `Ok(None)`, not an error.
    async fn find_by_email(&self, email: &EmailAddress)
    -> Result<Option<User>, UserPersistenceError>;

    /// Whether an account is registered under `email`.
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError>;

    /// Insert a new account and return its generated identifier.
    ///
    /// Fails with [`UserPersistenceError::Duplicate`] when storage rejects the
    /// row because the email or username is already taken.
    async fn insert(&self, user: &NewUser) -> Result<UserId, UserPersistenceError>;
}
