//! Error types for the bridge core

use thiserror::Error;

/// Result type alias using CoreError
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur while building session or CSRF primitives
#[derive(Error, Debug)]
pub enum CoreError {
    /// The signing secret was empty
    #[error("Signing secret must not be empty")]
    EmptySecret,

    /// A session record could not be encoded
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A session record failed a structural check before signing
    #[error("Invalid session: {0}")]
    InvalidSession(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::SerializationError(err.to_string())
    }
}

/// Reasons a presented session token was rejected
///
/// These never leave the codec: callers only see "no session".
/// They exist so the rejection reason can be logged at debug level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("token must have exactly two segments")]
    Malformed,

    #[error("segment is not valid base64url")]
    Encoding,

    #[error("signature mismatch")]
    BadSignature,

    #[error("payload is not a session record")]
    Payload,

    #[error("session expired at {0}")]
    Expired(i64),

    #[error("session has no subject")]
    MissingSubject,
}
