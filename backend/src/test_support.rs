//! In-memory adapters for integration tests.
//!
//! Compiled only with the `test-support` feature. The repository enforces the
//! same uniqueness rules as the PostgreSQL schema so service behaviour can be
//! exercised end to end without a database.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{UniqueField, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, User, UserId, UserStatus, UserTimestamps};

/// `UserRepository` backed by a vector, with identity-style ids from 1.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.users.lock().map_or(0, |users| users.len())
    }

    /// Whether no account is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_users<T>(
        &self,
        f: impl FnOnce(&mut Vec<User>) -> Result<T, UserPersistenceError>,
    ) -> Result<T, UserPersistenceError> {
        let mut users = self
            .users
            .lock()
            .map_err(|_| UserPersistenceError::connection("in-memory store poisoned"))?;
        f(&mut users)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        self.with_users(|users| Ok(users.iter().find(|user| user.email() == email).cloned()))
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError> {
        self.with_users(|users| Ok(users.iter().any(|user| user.email() == email)))
    }

    async fn insert(&self, user: &NewUser) -> Result<UserId, UserPersistenceError> {
        self.with_users(|users| {
            if users.iter().any(|existing| existing.email() == &user.email) {
                return Err(UserPersistenceError::duplicate(UniqueField::Email));
            }
            if users.iter().any(|existing| existing.username() == user.username) {
                return Err(UserPersistenceError::duplicate(UniqueField::Username));
            }
            let next = i32::try_from(users.len() + 1)
                .map_err(|_| UserPersistenceError::query("identity exhausted"))?;
            let id = UserId::new(next);
            users.push(User::new(
                id,
                user.clone(),
                UserStatus::Active,
                UserTimestamps::created(Utc::now()),
            ));
            Ok(id)
        })
    }
}
