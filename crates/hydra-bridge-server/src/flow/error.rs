//! Flow error types

use thiserror::Error;

use super::login::LoginPrompt;
use crate::hydra::GatewayError;

/// Result type for flow operations
pub type Result<T> = std::result::Result<T, FlowError>;

/// Terminal failures of a login or consent request
#[derive(Error, Debug)]
pub enum FlowError {
    /// Missing challenge or malformed input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Submitted CSRF token does not match the challenge
    #[error("CSRF token invalid")]
    CsrfInvalid,

    /// No verifier registered under the submitted provider name
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// The verifier rejected the credentials
    ///
    /// Carries the login form to re-present. The underlying cause is logged
    /// by the registry and never attached here.
    #[error("Authentication failed")]
    AuthenticationFailed(Box<LoginPrompt>),

    /// The authorization server call failed
    #[error("Upstream gateway failure: {0}")]
    Upstream(#[from] GatewayError),

    /// Session token could not be produced
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<hydra_bridge_core::CoreError> for FlowError {
    fn from(err: hydra_bridge_core::CoreError) -> Self {
        FlowError::Internal(err.to_string())
    }
}
