//! Domain ports for the hexagonal boundary.
//!
//! Driven ports (`UserRepository`, `PasswordHasher`) are implemented by
//! outbound adapters; driving ports (`LoginService`, `RegistrationService`)
//! are called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod password_hasher;
mod registration_service;
mod user_repository;

pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UniqueField, UserPersistenceError, UserRepository};
