//! Domain-level error types.
//!
//! These errors are transport agnostic. Inbound adapters map them to HTTP
//! responses or any other protocol-specific envelope.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::TraceId;

/// Header carrying the request trace identifier on every response.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Credentials did not match the stored account.
    Unauthorized,
    /// The referenced account does not exist.
    NotFound,
    /// A uniqueness rule rejected the request.
    Conflict,
    /// The client exceeded its request allowance.
    RateLimited,
    /// An unexpected error occurred inside the service.
    InternalError,
}

/// Human-readable message payload: a single sentence or a list of issues.
///
/// Serialises untagged so clients see either `"text"` or `["a", "b"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    /// One message.
    Single(String),
    /// Several messages, in the order they were produced.
    List(Vec<String>),
}

impl Message {
    /// Iterate over every message line.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        let lines: Vec<&str> = match self {
            Self::Single(message) => vec![message.as_str()],
            Self::List(messages) => messages.iter().map(String::as_str).collect(),
        };
        lines.into_iter()
    }
}

impl From<String> for Message {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<&str> for Message {
    fn from(value: &str) -> Self {
        Self::Single(value.to_owned())
    }
}

impl From<Vec<String>> for Message {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(message) => f.write_str(message),
            Self::List(messages) => f.write_str(&messages.join("; ")),
        }
    }
}

/// Domain error payload.
///
/// Captures the current [`TraceId`] on construction so errors raised while a
/// request is in flight are correlated automatically.
///
/// # Examples
/// ```
/// use chat_backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.to_string(), "missing");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: Message,
    trace_id: Option<String>,
}

impl Error {
    /// Create a new error with a single message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::with_message(code, Message::Single(message.into()))
    }

    /// Create a new error carrying an arbitrary message payload.
    pub fn with_message(code: ErrorCode, message: Message) -> Self {
        Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message payload returned to adapters.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Correlation identifier captured when the error was raised.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Attach a trace identifier to the error.
    ///
    /// # Examples
    /// ```
    /// use chat_backend::domain::Error;
    ///
    /// let err = Error::conflict("taken").with_trace_id("abc");
    /// assert_eq!(err.trace_id(), Some("abc"));
    /// ```
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Validation failure listing every issue found.
    pub fn validation(issues: Vec<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, Message::List(issues))
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::RateLimited`].
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RateLimited, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
