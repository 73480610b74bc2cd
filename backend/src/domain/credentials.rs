//! Credential submissions and the rules that validate them.
//!
//! Inbound adapters turn request bodies into [`LoginAttempt`] or
//! [`RegistrationAttempt`] values; the auth service validates them into
//! [`LoginCredentials`] or [`Registration`] before touching storage. Every
//! rule runs, so callers receive the complete list of issues rather than the
//! first failure.

use std::fmt;

use super::{EmailAddress, EmailValidationError, Password};

/// Minimum password length in characters.
pub const PASSWORD_MIN_CHARS: usize = 5;

/// Raw login submission, as received.
#[derive(Debug, Clone)]
pub struct LoginAttempt {
    /// Submitted email address.
    pub email: String,
    /// Submitted plaintext password.
    pub password: Password,
}

/// Raw registration submission, as received.
#[derive(Debug, Clone)]
pub struct RegistrationAttempt {
    /// Submitted display name.
    pub name: String,
    /// Submitted email address.
    pub email: String,
    /// Submitted plaintext password.
    pub password: Password,
    /// Submitted unique handle.
    pub username: String,
}

/// A single broken rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialIssue {
    /// Name was missing or blank once trimmed.
    NameRequired,
    /// Email was missing or blank once trimmed.
    EmailRequired,
    /// Email is not a syntactically valid address.
    EmailInvalid,
    /// Password was empty.
    PasswordRequired,
    /// Password is shorter than the minimum.
    PasswordTooShort {
        /// Required minimum length in characters.
        min: usize,
    },
    /// Username was missing or blank once trimmed.
    UsernameRequired,
}

impl fmt::Display for CredentialIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameRequired => write!(f, "Name is required"),
            Self::EmailRequired => write!(f, "Email is required"),
            Self::EmailInvalid => write!(f, "Invalid email address"),
            Self::PasswordRequired => write!(f, "Password is required"),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters")
            }
            Self::UsernameRequired => write!(f, "User Name is required"),
        }
    }
}

/// Every issue found in one submission, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialIssues(Vec<CredentialIssue>);

impl CredentialIssues {
    /// Issues in the order the rules reported them.
    pub fn issues(&self) -> &[CredentialIssue] {
        &self.0
    }

    /// Human-readable message for each issue.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for CredentialIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl std::error::Error for CredentialIssues {}

/// Collects rule outcomes without short-circuiting.
///
/// Each check records an issue whenever it yields `None` or `false`.
#[derive(Default)]
struct Rules(Vec<CredentialIssue>);

impl Rules {
    fn required(&mut self, value: &str, issue: CredentialIssue) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.0.push(issue);
            return None;
        }
        Some(trimmed.to_owned())
    }

    fn email(&mut self, value: &str) -> Option<EmailAddress> {
        match EmailAddress::new(value) {
            Ok(email) => Some(email),
            Err(EmailValidationError::Empty) => {
                self.0.push(CredentialIssue::EmailRequired);
                None
            }
            Err(EmailValidationError::InvalidFormat) => {
                self.0.push(CredentialIssue::EmailInvalid);
                None
            }
        }
    }

    fn password(&mut self, password: &Password) -> bool {
        let length = password.char_count();
        if length == 0 {
            self.0.push(CredentialIssue::PasswordRequired);
            return false;
        }
        if length < PASSWORD_MIN_CHARS {
            self.0.push(CredentialIssue::PasswordTooShort {
                min: PASSWORD_MIN_CHARS,
            });
            return false;
        }
        true
    }

    fn into_issues(self) -> CredentialIssues {
        CredentialIssues(self.0)
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is a trimmed, syntactically valid address.
/// - `password` has at least [`PASSWORD_MIN_CHARS`] characters and keeps
///   caller-provided whitespace.
///
/// # Examples
/// ```
/// use chat_backend::domain::{LoginCredentials, Password};
///
/// let creds = LoginCredentials::try_from_parts(" ann@x.com ", Password::new("abcde")).unwrap();
/// assert_eq!(creds.email().as_ref(), "ann@x.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Password,
}

impl LoginCredentials {
    /// Validate raw login inputs.
    pub fn try_from_parts(email: &str, password: Password) -> Result<Self, CredentialIssues> {
        let mut rules = Rules::default();
        let email = rules.email(email);
        let password_ok = rules.password(&password);
        match (email, password_ok) {
            (Some(email), true) => Ok(Self { email, password }),
            _ => Err(rules.into_issues()),
        }
    }

    /// Address used for the account lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password to verify against the stored hash.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

impl TryFrom<&LoginAttempt> for LoginCredentials {
    type Error = CredentialIssues;

    fn try_from(value: &LoginAttempt) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, value.password.clone())
    }
}

/// Validated registration request.
///
/// ## Invariants
/// - `name` and `username` are trimmed and non-empty.
/// - `email` and `password` follow the [`LoginCredentials`] rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: String,
    email: EmailAddress,
    password: Password,
    username: String,
}

impl Registration {
    /// Validate raw registration inputs.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: Password,
        username: &str,
    ) -> Result<Self, CredentialIssues> {
        let mut rules = Rules::default();
        let name = rules.required(name, CredentialIssue::NameRequired);
        let email = rules.email(email);
        let password_ok = rules.password(&password);
        let username = rules.required(username, CredentialIssue::UsernameRequired);
        match (name, email, password_ok, username) {
            (Some(name), Some(email), true, Some(username)) => Ok(Self {
                name,
                email,
                password,
                username,
            }),
            _ => Err(rules.into_issues()),
        }
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Address that must not already be registered.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password to hash before storage.
    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Unique handle.
    pub fn username(&self) -> &str {
        &self.username
    }
}

impl TryFrom<&RegistrationAttempt> for Registration {
    type Error = CredentialIssues;

    fn try_from(value: &RegistrationAttempt) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.name,
            &value.email,
            value.password.clone(),
            &value.username,
        )
    }
}
