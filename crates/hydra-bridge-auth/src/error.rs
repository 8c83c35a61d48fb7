//! Error types for credential verification

use thiserror::Error;

/// Result type for credential verification
pub type Result<T> = std::result::Result<T, VerifierError>;

/// Errors that can occur while verifying credentials
///
/// The `Display` text of these errors is for logs only. The login flow
/// collapses every variant except `UnknownProvider` into one generic
/// "invalid credentials" response.
#[derive(Error, Debug)]
pub enum VerifierError {
    /// No verifier is registered under the requested name
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// The verifier rejected the credentials
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// The verifier accepted but returned no subject
    #[error("Verifier returned an empty subject")]
    EmptySubject,

    /// The credential authority answered with a non-success status
    #[error("Credential authority returned {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The credential authority answered with an unexpected body
    #[error("Invalid response from credential authority: {0}")]
    InvalidResponse(String),

    /// Transport failure talking to the credential authority
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// A static user table could not be parsed
    #[error("Invalid static user table: {0}")]
    InvalidUserTable(String),

    /// The verification deadline elapsed
    #[error("Verification timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl From<reqwest::Error> for VerifierError {
    fn from(err: reqwest::Error) -> Self {
        VerifierError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for VerifierError {
    fn from(err: serde_json::Error) -> Self {
        VerifierError::InvalidResponse(err.to_string())
    }
}
