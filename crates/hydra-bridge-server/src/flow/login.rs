//! Login challenge flow
//!
//! ```text
//! Start ──skip──────────────────────────────────────────► Accepted
//!   │ ──valid bridge session (HasSSO) ───────────────────► Accepted
//!   └─► NeedsCredentials ──submit──► Verified ──────────► Accepted
//!                            │
//!                            └──► Rejected (403 / 400 / 401)
//! ```

use chrono::Utc;
use hydra_bridge_auth::{AuthContext, Credentials, VerifierError};
use hydra_bridge_core::{BridgeSession, Claims};
use serde::Serialize;
use tracing::{info, warn};

use super::{require_challenge, FlowError, FlowOrchestrator, Result};
use crate::hydra::{AcceptLogin, OAuthClient};

/// Message shown on a failed login. Deliberately says nothing about why.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Data for rendering the login form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginPrompt {
    pub login_challenge: String,
    pub client: OAuthClient,
    pub provider: String,
    pub csrf: String,
    pub error: Option<String>,
}

/// A submitted login form
#[derive(Debug, Clone)]
pub struct LoginSubmission {
    pub login_challenge: String,
    pub csrf: String,
    pub provider: Option<String>,
    pub credentials: Credentials,
}

/// Result of a login request
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// The challenge was accepted. `session_token` is set when a new bridge
    /// session must be stored in the cookie.
    Accepted {
        redirect_to: String,
        session_token: Option<String>,
    },
    /// Credentials are needed
    Prompt(LoginPrompt),
}

impl FlowOrchestrator {
    /// Handle the first visit for a login challenge
    ///
    /// Accepts straight away when the authorization server or a valid
    /// bridge session already identifies the user. Otherwise returns the
    /// data for a credential form.
    pub async fn begin_login(
        &self,
        login_challenge: &str,
        session_cookie: Option<&str>,
        provider: Option<&str>,
    ) -> Result<LoginOutcome> {
        require_challenge(login_challenge, "login_challenge")?;

        let request = self.gateway.get_login_request(login_challenge).await?;

        if request.skip && !request.subject.is_empty() {
            info!(
                login_challenge = %login_challenge,
                subject = %request.subject,
                "Authorization server skipped login"
            );
            let body = AcceptLogin {
                subject: request.subject,
                remember: false,
                remember_for: 0,
                context: None,
            };
            let redirect = self.gateway.accept_login_request(login_challenge, &body).await?;
            return Ok(LoginOutcome::Accepted {
                redirect_to: redirect.redirect_to,
                session_token: None,
            });
        }

        if let Some((session, remember_for)) = self.reusable_session(session_cookie) {
            info!(
                login_challenge = %login_challenge,
                subject = %session.sub,
                remember_for = remember_for,
                "Accepting login from bridge session"
            );

            let body = AcceptLogin {
                subject: session.sub,
                remember: true,
                remember_for,
                context: non_empty(session.claims),
            };
            let redirect = self.gateway.accept_login_request(login_challenge, &body).await?;
            return Ok(LoginOutcome::Accepted {
                redirect_to: redirect.redirect_to,
                session_token: None,
            });
        }

        Ok(LoginOutcome::Prompt(LoginPrompt {
            login_challenge: login_challenge.to_string(),
            client: request.client,
            provider: self.provider_or_default(provider),
            csrf: self.csrf.derive(login_challenge),
            error: None,
        }))
    }

    /// Handle a submitted credential form
    pub async fn submit_login(&self, submission: LoginSubmission) -> Result<LoginOutcome> {
        let login_challenge = submission.login_challenge.as_str();
        require_challenge(login_challenge, "login_challenge")?;

        if !self.csrf.validate(login_challenge, &submission.csrf) {
            warn!(login_challenge = %login_challenge, "Login rejected: CSRF token mismatch");
            return Err(FlowError::CsrfInvalid);
        }

        let provider = self.provider_or_default(submission.provider.as_deref());
        let ctx = AuthContext::new(login_challenge).with_timeout(self.settings.auth_timeout);

        let auth = match self
            .verifiers
            .authenticate(&provider, &ctx, &submission.credentials)
            .await
        {
            Ok(auth) => auth,
            Err(VerifierError::UnknownProvider(name)) => {
                return Err(FlowError::UnknownProvider(name));
            }
            Err(_) => {
                let prompt = self.rejected_prompt(login_challenge, provider).await;
                return Err(FlowError::AuthenticationFailed(Box::new(prompt)));
            }
        };

        let session = BridgeSession::new(
            auth.subject.clone(),
            auth.claims.clone(),
            self.settings.session_ttl_secs,
        );
        let session_token = self.sessions.sign(&session)?;

        let body = AcceptLogin {
            subject: auth.subject,
            remember: true,
            remember_for: self.settings.session_ttl_secs,
            context: non_empty(auth.claims),
        };
        let redirect = self.gateway.accept_login_request(login_challenge, &body).await?;

        info!(
            login_challenge = %login_challenge,
            subject = %session.sub,
            provider = %provider,
            "Login accepted, bridge session issued"
        );

        Ok(LoginOutcome::Accepted {
            redirect_to: redirect.redirect_to,
            session_token: Some(session_token),
        })
    }

    /// Login form to re-present after a failed attempt
    ///
    /// Client metadata is best effort: the 401 stands even if the
    /// authorization server cannot be reached.
    async fn rejected_prompt(&self, login_challenge: &str, provider: String) -> LoginPrompt {
        let client = match self.gateway.get_login_request(login_challenge).await {
            Ok(request) => request.client,
            Err(e) => {
                warn!(
                    login_challenge = %login_challenge,
                    error = %e,
                    "Could not reload login challenge"
                );
                OAuthClient::default()
            }
        };

        LoginPrompt {
            login_challenge: login_challenge.to_string(),
            client,
            provider,
            csrf: self.csrf.derive(login_challenge),
            error: Some(INVALID_CREDENTIALS.to_string()),
        }
    }

    /// Valid bridge session and the lifetime it has left
    ///
    /// A session in its last second has nothing left to remember, and the
    /// authorization server reads `remember_for: 0` as "forever".
    fn reusable_session(&self, session_cookie: Option<&str>) -> Option<(BridgeSession, i64)> {
        let session = self.current_session(session_cookie)?;
        match session.remaining_secs(Utc::now().timestamp()) {
            Some(0) => {
                info!(subject = %session.sub, "Bridge session at expiry, asking for credentials");
                None
            }
            Some(secs) => Some((session, secs)),
            None => Some((session, self.settings.session_ttl_secs)),
        }
    }

    fn provider_or_default(&self, provider: Option<&str>) -> String {
        match provider.map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => self.settings.default_provider.clone(),
        }
    }
}

fn non_empty(claims: Claims) -> Option<Claims> {
    if claims.is_empty() {
        None
    } else {
        Some(claims)
    }
}
