//! Consent challenge flow
//!
//! Grants exactly the requested scopes. There is no per-scope choice and
//! no deny path; the grant decision is isolated in `grant_scopes`.

use hydra_bridge_core::Claims;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

use super::{require_challenge, FlowError, FlowOrchestrator, Result};
use crate::hydra::{AcceptConsent, ConsentRequest, ConsentSession, OAuthClient};

/// Data for rendering the consent form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsentPrompt {
    pub consent_challenge: String,
    pub client: OAuthClient,
    pub requested_scope: Vec<String>,
    pub subject: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub csrf: String,
}

/// Result of a consent request
#[derive(Debug, Clone, PartialEq)]
pub enum ConsentOutcome {
    /// Consent was granted
    Accepted { redirect_to: String },
    /// The user has to confirm
    Prompt(ConsentPrompt),
}

impl FlowOrchestrator {
    /// Handle the first visit for a consent challenge
    pub async fn begin_consent(
        &self,
        consent_challenge: &str,
        session_cookie: Option<&str>,
    ) -> Result<ConsentOutcome> {
        require_challenge(consent_challenge, "consent_challenge")?;

        let request = self.gateway.get_consent_request(consent_challenge).await?;
        let claims = self.consent_claims(&request, session_cookie);

        if request.skip {
            info!(consent_challenge = %consent_challenge, "Authorization server skipped consent");
            let redirect_to = self.grant(consent_challenge, &request, &claims).await?;
            return Ok(ConsentOutcome::Accepted { redirect_to });
        }

        Ok(ConsentOutcome::Prompt(ConsentPrompt {
            consent_challenge: consent_challenge.to_string(),
            requested_scope: grant_scopes(&request.requested_scope),
            subject: request.subject,
            client: request.client,
            name: claim_string(&claims, "name"),
            email: claim_string(&claims, "email"),
            csrf: self.csrf.derive(consent_challenge),
        }))
    }

    /// Handle a submitted consent form
    pub async fn submit_consent(
        &self,
        consent_challenge: &str,
        csrf: &str,
        session_cookie: Option<&str>,
    ) -> Result<ConsentOutcome> {
        require_challenge(consent_challenge, "consent_challenge")?;

        if !self.csrf.validate(consent_challenge, csrf) {
            warn!(consent_challenge = %consent_challenge, "Consent rejected: CSRF token mismatch");
            return Err(FlowError::CsrfInvalid);
        }

        let request = self.gateway.get_consent_request(consent_challenge).await?;
        let claims = self.consent_claims(&request, session_cookie);
        let redirect_to = self.grant(consent_challenge, &request, &claims).await?;

        Ok(ConsentOutcome::Accepted { redirect_to })
    }

    async fn grant(
        &self,
        consent_challenge: &str,
        request: &ConsentRequest,
        claims: &Claims,
    ) -> Result<String> {
        let policy = &self.settings.claim_policy;
        let body = AcceptConsent {
            grant_scope: grant_scopes(&request.requested_scope),
            remember: true,
            remember_for: self.settings.consent_remember_secs,
            session: ConsentSession {
                id_token: policy.id_token.apply(claims),
                access_token: policy.access_token.apply(claims),
            },
        };

        let redirect = self
            .gateway
            .accept_consent_request(consent_challenge, &body)
            .await?;

        info!(
            consent_challenge = %consent_challenge,
            client_id = %request.client.client_id,
            scopes = ?body.grant_scope,
            "Consent granted"
        );

        Ok(redirect.redirect_to)
    }

    /// Claims for the consenting user
    ///
    /// The login context recorded on the challenge wins. Failing that, a
    /// valid bridge session for the same subject supplies them.
    fn consent_claims(&self, request: &ConsentRequest, session_cookie: Option<&str>) -> Claims {
        if let Some(context) = request.context.as_ref().filter(|c| !c.is_empty()) {
            return context.clone();
        }

        match self.current_session(session_cookie) {
            Some(session) if session.sub == request.subject => session.claims,
            _ => Claims::new(),
        }
    }
}

/// Scopes to grant: the requested set, deduplicated, in request order
pub fn grant_scopes(requested: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    requested
        .iter()
        .filter(|scope| seen.insert(scope.as_str()))
        .cloned()
        .collect()
}

fn claim_string(claims: &Claims, name: &str) -> Option<String> {
    claims.get(name).and_then(|v| v.as_str()).map(str::to_string)
}
