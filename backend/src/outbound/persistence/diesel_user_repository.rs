//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! The adapter only translates rows and errors. Uniqueness of email and user
//! name is enforced by named constraints; a violation is reported as
//! [`UserPersistenceError::Duplicate`] with the offending column so the auth
//! service can still answer a lost insert race with a conflict.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{UniqueField, UserPersistenceError, UserRepository};
use crate::domain::{
    EmailAddress, NewUser, PasswordHash, User, UserId, UserStatus, UserTimestamps,
};

use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";
const USER_NAME_CONSTRAINT: &str = "users_user_name_key";

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn unique_field(info: &dyn DatabaseErrorInformation) -> UniqueField {
    match info.constraint_name() {
        Some(EMAIL_CONSTRAINT) => UniqueField::Email,
        Some(USER_NAME_CONSTRAINT) => UniqueField::Username,
        _ => UniqueField::Unknown,
    }
}

fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation => {
                UserPersistenceError::duplicate(unique_field(info.as_ref()))
            }
            DatabaseErrorKind::ClosedConnection => {
                UserPersistenceError::connection("database connection error")
            }
            _ => UserPersistenceError::query("database error"),
        },
        _ => UserPersistenceError::query("database error"),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let status = UserStatus::from_str(&row.status).map_err(|err| {
        UserPersistenceError::query(format!("invalid status in database: {err}"))
    })?;

    Ok(User::new(
        UserId::new(row.id),
        NewUser {
            name: row.name,
            email: EmailAddress::from_stored(row.email),
            username: row.user_name,
            password_hash: PasswordHash::new(row.password),
        },
        status,
        UserTimestamps {
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_seen: row.last_seen,
        },
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::select(exists(users::table.filter(users::email.eq(email.as_ref()))))
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert(&self, user: &NewUser) -> Result<UserId, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewUserRow {
            email: user.email.as_ref(),
            name: &user.name,
            user_name: &user.username,
            password: user.password_hash.as_str(),
        };

        let id: i32 = diesel::insert_into(users::table)
            .values(&row)
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(UserId::new(id))
    }
}

#[cfg(test)]
mod tests {
    //! Error mapping coverage; query paths are exercised against PostgreSQL.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    struct ConstraintViolation(Option<&'static str>);

    impl DatabaseErrorInformation for ConstraintViolation {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            Some("users")
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.0
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let repo_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(repo_err, UserPersistenceError::Connection { .. }));
        assert!(repo_err.to_string().contains("connection refused"));
    }

    #[rstest]
    #[case(Some(EMAIL_CONSTRAINT), UniqueField::Email)]
    #[case(Some(USER_NAME_CONSTRAINT), UniqueField::Username)]
    #[case(Some("users_pkey"), UniqueField::Unknown)]
    #[case(None, UniqueField::Unknown)]
    fn unique_violation_names_the_column(
        #[case] constraint: Option<&'static str>,
        #[case] expected: UniqueField,
    ) {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new(ConstraintViolation(constraint)),
        );

        assert_eq!(
            map_diesel_error(diesel_err),
            UserPersistenceError::duplicate(expected)
        );
    }

    #[rstest]
    fn closed_connection_maps_to_connection_error() {
        let diesel_err = DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        );

        assert!(matches!(
            map_diesel_error(diesel_err),
            UserPersistenceError::Connection { .. }
        ));
    }

    #[rstest]
    fn row_converts_to_domain_user() {
        let now = Utc::now();
        let row = UserRow {
            id: 3,
            email: "ann@x.com".to_owned(),
            name: "Ann".to_owned(),
            user_name: "ann".to_owned(),
            password: "$2b$10$hash".to_owned(),
            status: "banned".to_owned(),
            last_seen: None,
            created_at: now,
            updated_at: now,
        };

        let user = row_to_user(row).expect("row converts");

        assert_eq!(user.id(), UserId::new(3));
        assert_eq!(user.username(), "ann");
        assert_eq!(user.status(), UserStatus::Banned);
        assert_eq!(user.password_hash().as_str(), "$2b$10$hash");
    }

    #[rstest]
    fn stored_email_is_not_revalidated() {
        let now = Utc::now();
        let row = UserRow {
            id: 7,
            email: "josé@x.com".to_owned(),
            name: "José".to_owned(),
            user_name: "jose".to_owned(),
            password: "$2b$10$hash".to_owned(),
            status: "active".to_owned(),
            last_seen: Some(now),
            created_at: now,
            updated_at: now,
        };

        let user = row_to_user(row).expect("legacy row converts");

        assert_eq!(user.email().as_ref(), "josé@x.com");
    }

    #[rstest]
    fn row_with_unknown_status_is_a_query_error() {
        let now = Utc::now();
        let row = UserRow {
            id: 3,
            email: "ann@x.com".to_owned(),
            name: "Ann".to_owned(),
            user_name: "ann".to_owned(),
            password: "hash".to_owned(),
            status: "archived".to_owned(),
            last_seen: None,
            created_at: now,
            updated_at: now,
        };

        assert!(matches!(
            row_to_user(row),
            Err(UserPersistenceError::Query { .. })
        ));
    }
}
