//! Authentication service implementing the login and registration ports.
//!
//! Both flows validate before any storage access. Registration checks for an
//! existing account before hashing so rejected requests never pay for the
//! hash. No transaction spans the existence check and the insert; a
//! concurrent duplicate is caught by the storage uniqueness constraint and
//! still reported as a conflict.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, RegistrationService, UniqueField,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthResult, AuthSuccess, CredentialIssues, Error, LoginAttempt, LoginCredentials, NewUser,
    Registration, RegistrationAttempt,
};

/// Auth service orchestrating validation, storage and password hashing.
#[derive(Clone)]
pub struct AuthService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> AuthService<R, H> {
    /// Create a new service over the given repository and hasher.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

fn validation_error(issues: &CredentialIssues) -> Error {
    debug!(issues = issues.issues().len(), "credential submission rejected");
    Error::validation(issues.messages())
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    error!(%error, "user repository failure");
    Error::internal(format!("user repository failure: {error}"))
}

fn map_hash_error(error: PasswordHashError) -> Error {
    error!(%error, "password hasher failure");
    Error::internal(format!("password hasher failure: {error}"))
}

fn duplicate_error(field: UniqueField, registration: &Registration) -> Error {
    match field {
        UniqueField::Email => {
            Error::conflict(format!("{} user already exists", registration.email()))
        }
        UniqueField::Username => Error::conflict(format!(
            "{} username is already taken",
            registration.username()
        )),
        UniqueField::Unknown => Error::conflict("user already exists"),
    }
}

#[async_trait]
impl<R, H> LoginService for AuthService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn login(&self, attempt: &LoginAttempt) -> AuthResult {
        let credentials =
            LoginCredentials::try_from(attempt).map_err(|issues| validation_error(&issues))?;

        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| {
                debug!("login for unknown account");
                Error::not_found(format!("No account found for {}", credentials.email()))
            })?;

        let matches = self
            .hasher
            .verify(credentials.password(), user.password_hash())
            .await
            .map_err(map_hash_error)?;
        if !matches {
            debug!(user_id = %user.id(), "login password mismatch");
            return Err(Error::unauthorized("Incorrect password"));
        }

        info!(user_id = %user.id(), "user logged in");
        Ok(AuthSuccess::Authenticated { user_id: user.id() })
    }
}

#[async_trait]
impl<R, H> RegistrationService for AuthService<R, H>
where
    R: UserRepository,
    H: PasswordHasher,
{
    async fn sign_up(&self, attempt: &RegistrationAttempt) -> AuthResult {
        let registration =
            Registration::try_from(attempt).map_err(|issues| validation_error(&issues))?;

        let exists = self
            .users
            .exists_by_email(registration.email())
            .await
            .map_err(map_persistence_error)?;
        if exists {
            debug!("registration for existing email");
            return Err(duplicate_error(UniqueField::Email, &registration));
        }

        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hash_error)?;

        let new_user = NewUser {
            name: registration.name().to_owned(),
            email: registration.email().clone(),
            username: registration.username().to_owned(),
            password_hash,
        };
        let user_id = match self.users.insert(&new_user).await {
            Ok(user_id) => user_id,
            Err(UserPersistenceError::Duplicate { field }) => {
                debug!(%field, "registration lost a uniqueness race");
                return Err(duplicate_error(field, &registration));
            }
            Err(other) => return Err(map_persistence_error(other)),
        };

        info!(%user_id, "user registered");
        Ok(AuthSuccess::Created { user_id })
    }
}

#[cfg(test)]
#[path = "auth_service_tests.rs"]
mod tests;
