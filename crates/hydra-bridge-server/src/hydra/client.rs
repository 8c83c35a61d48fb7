//! HTTP client for the authorization server's admin API

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    AcceptConsent, AcceptLogin, AdminApi, ConsentRequest, GatewayError, LoginRequest,
    RedirectResponse, Result,
};

/// Default timeout for admin API calls
pub const DEFAULT_ADMIN_TIMEOUT: Duration = Duration::from_secs(10);

const LOGIN_PATH: &str = "/oauth2/auth/requests/login";
const LOGIN_ACCEPT_PATH: &str = "/oauth2/auth/requests/login/accept";
const CONSENT_PATH: &str = "/oauth2/auth/requests/consent";
const CONSENT_ACCEPT_PATH: &str = "/oauth2/auth/requests/consent/accept";

/// Admin API client
///
/// Holds nothing but the base URL and a pooled HTTP client, so it is
/// shared freely between concurrent requests.
#[derive(Debug, Clone)]
pub struct HydraAdminClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl HydraAdminClient {
    /// Create a client for the admin API at `base_url`
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_ADMIN_TIMEOUT)
    }

    /// Create a client with an explicit request timeout
    pub fn with_timeout(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.as_ref().trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// The admin base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: (&str, &str)) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "GET admin API");

        let response = self
            .http_client
            .get(&url)
            .query(&[query])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        query: (&str, &str),
        body: &B,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "PUT admin API");

        let response = self
            .http_client
            .put(&url)
            .query(&[query])
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            warn!(status = status.as_u16(), body = %body, "Admin API call failed");
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_slice(&body)?)
    }

    fn check_redirect(redirect: RedirectResponse) -> Result<RedirectResponse> {
        if redirect.redirect_to.is_empty() {
            return Err(GatewayError::InvalidResponse("empty redirect_to".into()));
        }
        Ok(redirect)
    }
}

#[async_trait]
impl AdminApi for HydraAdminClient {
    async fn get_login_request(&self, login_challenge: &str) -> Result<LoginRequest> {
        self.get_json(LOGIN_PATH, ("login_challenge", login_challenge))
            .await
    }

    async fn accept_login_request(
        &self,
        login_challenge: &str,
        body: &AcceptLogin,
    ) -> Result<RedirectResponse> {
        let redirect = self
            .put_json(LOGIN_ACCEPT_PATH, ("login_challenge", login_challenge), body)
            .await?;
        Self::check_redirect(redirect)
    }

    async fn get_consent_request(&self, consent_challenge: &str) -> Result<ConsentRequest> {
        self.get_json(CONSENT_PATH, ("consent_challenge", consent_challenge))
            .await
    }

    async fn accept_consent_request(
        &self,
        consent_challenge: &str,
        body: &AcceptConsent,
    ) -> Result<RedirectResponse> {
        let redirect = self
            .put_json(CONSENT_ACCEPT_PATH, ("consent_challenge", consent_challenge), body)
            .await?;
        Self::check_redirect(redirect)
    }
}
