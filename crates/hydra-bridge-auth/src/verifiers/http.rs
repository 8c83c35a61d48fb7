//! HTTP Credential Verifier
//!
//! Delegates verification to a separate credential-authority service:
//!
//! ```text
//! POST {base}/login  {"username": "...", "password": "..."}
//!   -> {"ok": true, "user_id": "...", "claims": {...}, "error": "..."}
//! ```

use async_trait::async_trait;
use hydra_bridge_core::Claims;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{Result, VerifierError};
use crate::registry::CredentialVerifier;
use crate::types::{AuthContext, AuthResult, Credentials};

/// Default transport timeout for the credential authority
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(8);

/// Name the HTTP verifier registers under by default
pub const INTERNAL_PROVIDER: &str = "internal";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    claims: Option<Claims>,
    #[serde(default)]
    error: Option<String>,
}

/// Verifier that posts credentials to a credential authority
#[derive(Debug, Clone)]
pub struct HttpVerifier {
    name: String,
    login_url: String,
    http_client: reqwest::Client,
}

impl HttpVerifier {
    /// Create a verifier for the authority at `base_url`
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a verifier with an explicit transport timeout
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            name: INTERNAL_PROVIDER.to_string(),
            login_url: format!("{}/login", base_url.as_ref().trim_end_matches('/')),
            http_client,
        })
    }

    /// Register under a different name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl CredentialVerifier for HttpVerifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "HTTP credential authority"
    }

    async fn authenticate(
        &self,
        ctx: &AuthContext,
        credentials: &Credentials,
    ) -> Result<AuthResult> {
        debug!(
            url = %self.login_url,
            login_challenge = %ctx.login_challenge,
            "Posting credentials to credential authority"
        );

        let response = self
            .http_client
            .post(&self.login_url)
            .json(&LoginRequest {
                username: &credentials.username,
                password: &credentials.password,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(VerifierError::Rejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let login: LoginResponse = serde_json::from_slice(&body)?;
        if !login.ok || login.user_id.is_empty() {
            debug!(error = ?login.error, "Credential authority refused login");
            return Err(VerifierError::InvalidCredentials);
        }

        Ok(AuthResult {
            subject: login.user_id,
            claims: login.claims.unwrap_or_default(),
        })
    }
}
