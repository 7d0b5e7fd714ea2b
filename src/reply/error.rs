use std::fmt::{self, Display};

use thiserror::Error;

use super::ReplyKind;

/// The failure carried by a RESP [error reply].
///
/// By convention the first word of a Redis error message is an error code,
/// such as `ERR` or `WRONGTYPE`, followed by a human readable description.
/// [`RedisError`] keeps the whole message and exposes both halves.
///
/// [error reply]: https://redis.io/docs/reference/protocol-spec/#resp-errors
///
/// # Example
///
/// ```
/// use redis_reply::RedisError;
///
/// let error = RedisError::new("WRONGTYPE Operation against a key holding the wrong kind of value");
/// assert_eq!(error.code(), "WRONGTYPE");
/// assert_eq!(error.description(), "Operation against a key holding the wrong kind of value");
/// assert_eq!(
///     error.to_string(),
///     "WRONGTYPE Operation against a key holding the wrong kind of value",
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("{message}")]
pub struct RedisError {
    message: String,
}

impl RedisError {
    /// Create a new error from the full message of an error reply.
    #[inline]
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The full message, exactly as it appeared on the wire.
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The error code: the leading word of the message.
    #[must_use]
    pub fn code(&self) -> &str {
        self.split().0
    }

    /// Everything after the error code, or the empty string if the message
    /// has only one word.
    #[must_use]
    pub fn description(&self) -> &str {
        self.split().1
    }

    fn split(&self) -> (&str, &str) {
        match self.message.split_once(' ') {
            Some((code, description)) => (code, description),
            None => (&self.message, ""),
        }
    }
}

/// The broad category of an accessor [`Error`]. Callers that only need to
/// branch on what went wrong (rather than report it) should match on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The conversion isn't valid for the kind of reply. This includes error
    /// replies, whose stored failure is returned in place of any value.
    WrongKind,

    /// None of the interpretations available for the conversion applied to
    /// this reply.
    UnsupportedConversion,

    /// A text payload couldn't be parsed into the requested numeric type.
    ParseError,

    /// A multi bulk reply didn't have the shape the conversion requires.
    MalformedAggregate,

    /// A single element of a multi bulk reply had the wrong kind for the
    /// aggregate conversion.
    InvalidElement,
}

/// The value an accessor was attempting to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    /// [`Reply::str`][super::Reply::str] and [`Reply::bytes`][super::Reply::bytes]
    String,

    /// [`Reply::int64`][super::Reply::int64] and [`Reply::int`][super::Reply::int]
    Integer,

    /// [`Reply::bool`][super::Reply::bool]
    Boolean,
}

impl Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Conversion::String => "string",
            Conversion::Integer => "integer",
            Conversion::Boolean => "boolean",
        })
    }
}

/// The role an element plays in an aggregate conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    /// An item of [`Reply::list`][super::Reply::list]
    Item,

    /// A key of [`Reply::hash`][super::Reply::hash]
    Key,

    /// A value of [`Reply::hash`][super::Reply::hash]
    Value,
}

impl Display for ElementRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ElementRole::Item => "element type is not BulkReply or NilReply",
            ElementRole::Key => "key element has no string reply",
            ElementRole::Value => "value element type is not BulkReply or NilReply",
        })
    }
}

/// Errors returned by the [`Reply`][super::Reply] accessors.
///
/// Every accessor is total: it returns either a value or one of these. Use
/// [`Error::category`] to branch on the kind of failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// The reply was an error reply. This is its failure, unchanged; it's
    /// returned from every accessor in place of a conversion error.
    #[error(transparent)]
    Redis(#[from] RedisError),

    /// The conversion requires a different kind of reply.
    #[error("reply type is not {expected}")]
    WrongKind {
        /// The kind the conversion requires
        expected: ReplyKind,
        /// The kind of the reply
        found: ReplyKind,
    },

    /// There is no way to get this value from this kind of reply.
    #[error("{0} value is not available for this reply type")]
    Unsupported(Conversion),

    /// A string conversion found a payload that isn't valid UTF-8. The
    /// payload is still available as [`Reply::bytes`][super::Reply::bytes].
    #[error("string value is not valid UTF-8")]
    Utf8,

    /// The reply contained a string that isn't a base 10 signed 64 bit
    /// integer.
    #[error("failed to parse integer value from string value")]
    Parse,

    /// The reply contained an integer that doesn't fit in an `isize`.
    #[error("integer value {0} is out of range for a platform integer")]
    Overflow(i64),

    /// A key-value conversion found an odd number of elements. The payload is
    /// the number of elements found.
    #[error("reply has odd number of elements")]
    OddLength(usize),

    /// An element of a multi bulk reply was the wrong kind.
    #[error("{role}")]
    InvalidElement {
        /// How the conversion was going to use the element
        role: ElementRole,
        /// The index of the element in the multi bulk reply
        index: usize,
    },
}

impl Error {
    /// Get the category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Redis(_) | Error::WrongKind { .. } => ErrorCategory::WrongKind,
            Error::Unsupported(_) | Error::Utf8 => ErrorCategory::UnsupportedConversion,
            Error::Parse | Error::Overflow(_) => ErrorCategory::ParseError,
            Error::OddLength(_) => ErrorCategory::MalformedAggregate,
            Error::InvalidElement { .. } => ErrorCategory::InvalidElement,
        }
    }

    /// If this error is the failure of an error reply, get it.
    #[inline]
    #[must_use]
    pub fn as_redis(&self) -> Option<&RedisError> {
        match self {
            Error::Redis(err) => Some(err),
            _ => None,
        }
    }
}
