//! Port for one-way password hashing.
//!
//! Implementations must be salted and deliberately slow, and must never log
//! either the plaintext or the hash.

use async_trait::async_trait;

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Faults raised by password hasher adapters.
    pub enum PasswordHashError {
        /// Producing a hash failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be checked (malformed or unsupported).
        Verify { message: String } => "password verification failed: {message}",
    }
}

/// One-way salted hashing of account passwords.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` for storage.
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;

    /// Check `password` against a stored `hash`.
    ///
    /// A mismatch is `Ok(false)`; only hasher faults are errors.
    async fn verify(
        &self,
        password: &Password,
        hash: &PasswordHash,
    ) -> Result<bool, PasswordHashError>;
}
