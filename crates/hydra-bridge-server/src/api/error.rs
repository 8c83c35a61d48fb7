//! API error types and responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use super::pages;
use crate::flow::{FlowError, LoginPrompt};

/// API error type
///
/// Responses carry only a generic message. Causes are logged, never rendered.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("CSRF token invalid")]
    CsrfInvalid,

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Authentication failed")]
    AuthenticationFailed(Box<LoginPrompt>),

    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            ApiError::CsrfInvalid => (StatusCode::FORBIDDEN, "csrf invalid"),
            ApiError::UnknownProvider(_) => (StatusCode::BAD_REQUEST, "unknown provider"),
            ApiError::AuthenticationFailed(prompt) => {
                return (StatusCode::UNAUTHORIZED, pages::login_page(prompt)).into_response();
            }
            ApiError::Upstream(cause) => {
                error!(error = %cause, "Authorization server call failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "authorization server unavailable")
            }
            ApiError::Internal(cause) => {
                error!(error = %cause, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
            }
        };

        (status, pages::error_page(message)).into_response()
    }
}

impl From<FlowError> for ApiError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::BadRequest(msg) => ApiError::BadRequest(msg),
            FlowError::CsrfInvalid => ApiError::CsrfInvalid,
            FlowError::UnknownProvider(name) => ApiError::UnknownProvider(name),
            FlowError::AuthenticationFailed(prompt) => ApiError::AuthenticationFailed(prompt),
            FlowError::Upstream(err) => ApiError::Upstream(err.to_string()),
            FlowError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}
