//! Domain primitives, use-cases and ports.
//!
//! Purpose: define the strongly typed account model, credential validation
//! and the auth service behind the HTTP adapters. Types here know nothing
//! about HTTP or SQL; adapters translate at the edges.
//!
//! Public surface:
//! - Error / ErrorCode / Message: transport-agnostic failure payload.
//! - TraceId: per-request correlation identifier.
//! - User / NewUser / EmailAddress / UserId: account model.
//! - Password / PasswordHash: secret material with redacted `Debug`.
//! - LoginCredentials / Registration: validated submissions.
//! - AuthService: login and registration use-cases.

pub mod auth_result;
pub mod auth_service;
pub mod credentials;
pub mod error;
pub mod password;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth_result::{AuthResult, AuthSuccess};
pub use self::auth_service::AuthService;
pub use self::credentials::{
    CredentialIssue, CredentialIssues, LoginAttempt, LoginCredentials, PASSWORD_MIN_CHARS,
    Registration, RegistrationAttempt,
};
pub use self::error::{Error, ErrorCode, Message, TRACE_ID_HEADER};
pub use self::password::{Password, PasswordHash};
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, EmailValidationError, NewUser, UnknownUserStatus, User, UserId, UserStatus,
    UserTimestamps,
};
