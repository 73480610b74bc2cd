//! User account model.
//!
//! A [`User`] is the persisted account record. It is only ever created by the
//! registration flow, which hands a validated [`NewUser`] to the repository.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::PasswordHash;

/// Server-generated account identifier (database identity column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i32);

impl UserId {
    /// Wrap a raw identity value.
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    /// Raw identity value.
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reasons an email address is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EmailValidationError {
    /// Nothing but whitespace was supplied.
    #[error("email must not be empty")]
    Empty,
    /// The value is not a syntactically valid address.
    #[error("email is not a valid address")]
    InvalidFormat,
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // ASCII classes only; Unicode word characters never match.
        let pattern = r"(?i-u)^[a-z0-9_+-]+(?:\.[a-z0-9_+-]+)*@[a-z0-9]+(?:[.-][a-z0-9]+)*\.[a-z]{2,}$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Syntactically valid email address, trimmed of surrounding whitespace.
///
/// # Examples
/// ```
/// use chat_backend::domain::EmailAddress;
///
/// let email = EmailAddress::new("  ann@x.com ").unwrap();
/// assert_eq!(email.as_ref(), "ann@x.com");
/// assert!(EmailAddress::new("ann@").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, EmailValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(EmailValidationError::Empty);
        }
        if !email_regex().is_match(trimmed) {
            return Err(EmailValidationError::InvalidFormat);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Wrap an address read back from storage.
    ///
    /// Stored rows are trusted as written; tightening the format rule must not
    /// lock existing accounts out.
    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Account status; new accounts start as [`UserStatus::Active`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    /// Account in normal use.
    #[default]
    Active,
    /// Account disabled by its owner.
    Inactive,
    /// Account blocked by moderation.
    Banned,
}

impl UserStatus {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Banned => "banned",
        }
    }
}

/// Error returned when a stored status string is unknown.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown user status: {0}")]
pub struct UnknownUserStatus(pub String);

impl FromStr for UserStatus {
    type Err = UnknownUserStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            "banned" => Ok(Self::Banned),
            other => Err(UnknownUserStatus(other.to_owned())),
        }
    }
}

/// Validated account data handed to the repository for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Unique email address.
    pub email: EmailAddress,
    /// Unique handle.
    pub username: String,
    /// Hash of the account password.
    pub password_hash: PasswordHash,
}

/// Audit timestamps stored alongside an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserTimestamps {
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Last time the user was seen online.
    pub last_seen: Option<DateTime<Utc>>,
}

impl UserTimestamps {
    /// Timestamps for a row created at `now`.
    pub fn created(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            last_seen: Some(now),
        }
    }
}

/// Persisted user account.
///
/// ## Invariants
/// - `email` and `username` are unique across accounts.
/// - Only the password hash is held; the plaintext never reaches this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    name: String,
    username: String,
    password_hash: PasswordHash,
    status: UserStatus,
    timestamps: UserTimestamps,
}

impl User {
    /// Assemble a stored account from its parts.
    pub fn new(
        id: UserId,
        account: NewUser,
        status: UserStatus,
        timestamps: UserTimestamps,
    ) -> Self {
        let NewUser {
            name,
            email,
            username,
            password_hash,
        } = account;
        Self {
            id,
            email,
            name,
            username,
            password_hash,
            status,
            timestamps,
        }
    }

    /// Account identifier.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Account email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unique handle.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Stored password hash, consumed only by the password hasher.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Account status.
    pub fn status(&self) -> UserStatus {
        self.status
    }

    /// Audit timestamps.
    pub fn timestamps(&self) -> &UserTimestamps {
        &self.timestamps
    }
}
