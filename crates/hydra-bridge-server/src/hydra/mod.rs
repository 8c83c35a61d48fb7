//! Authorization-server gateway
//!
//! Typed access to the authorization server's challenge-based admin API:
//! fetch a login or consent challenge, then accept it. Every call is a
//! single round trip and nothing is retried. Challenges are single use, so
//! a retry after a rejection cannot succeed.

pub mod client;

pub use client::{HydraAdminClient, DEFAULT_ADMIN_TIMEOUT};

use async_trait::async_trait;
use hydra_bridge_core::Claims;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for gateway calls
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors talking to the authorization server
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Transport failure or timeout
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success status from the admin API
    #[error("Authorization server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Body did not match the expected shape
    #[error("Invalid response from authorization server: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::InvalidResponse(err.to_string())
    }
}

/// The OAuth2 client a challenge was issued for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuthClient {
    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_name: Option<String>,
}

impl OAuthClient {
    /// Name to show the end user, falling back to the client id
    pub fn display_name(&self) -> &str {
        match self.client_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.client_id,
        }
    }
}

/// Details of a pending login challenge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub challenge: String,

    #[serde(default)]
    pub client: OAuthClient,

    /// The authorization server already knows the user
    #[serde(default)]
    pub skip: bool,

    /// Subject known to the authorization server, set when `skip` is true
    #[serde(default)]
    pub subject: String,

    /// The original authorization request URL
    #[serde(default)]
    pub request_url: String,
}

/// Details of a pending consent challenge
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConsentRequest {
    #[serde(default)]
    pub challenge: String,

    #[serde(default)]
    pub client: OAuthClient,

    /// Requested scopes, in request order. May contain duplicates.
    #[serde(default)]
    pub requested_scope: Vec<String>,

    #[serde(default)]
    pub skip: bool,

    #[serde(default)]
    pub subject: String,

    /// Context attached when the login was accepted
    #[serde(default)]
    pub context: Option<Claims>,
}

/// Body of an accept-login call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptLogin {
    pub subject: String,
    pub remember: bool,
    pub remember_for: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Claims>,
}

/// Claims injected into the issued tokens
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsentSession {
    #[serde(default, skip_serializing_if = "Claims::is_empty")]
    pub id_token: Claims,

    #[serde(default, skip_serializing_if = "Claims::is_empty")]
    pub access_token: Claims,
}

/// Body of an accept-consent call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptConsent {
    pub grant_scope: Vec<String>,
    pub remember: bool,
    pub remember_for: i64,
    #[serde(default)]
    pub session: ConsentSession,
}

/// Where to send the browser next
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedirectResponse {
    pub redirect_to: String,
}

/// The authorization server's admin API
///
/// Implemented by [`HydraAdminClient`]; tests substitute their own.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Fetch a login challenge
    async fn get_login_request(&self, login_challenge: &str) -> Result<LoginRequest>;

    /// Accept a login challenge for a subject
    async fn accept_login_request(
        &self,
        login_challenge: &str,
        body: &AcceptLogin,
    ) -> Result<RedirectResponse>;

    /// Fetch a consent challenge
    async fn get_consent_request(&self, consent_challenge: &str) -> Result<ConsentRequest>;

    /// Accept a consent challenge with granted scopes
    async fn accept_consent_request(
        &self,
        consent_challenge: &str,
        body: &AcceptConsent,
    ) -> Result<RedirectResponse>;
}
