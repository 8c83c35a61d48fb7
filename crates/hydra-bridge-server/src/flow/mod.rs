//! Login and consent orchestration
//!
//! The orchestrator answers two request kinds, each driven by a challenge
//! minted by the authorization server:
//!
//! - **Login**: reuse a valid bridge session (SSO) or collect credentials,
//!   verify them, issue a new session and accept the challenge.
//! - **Consent**: render the requested scopes, then grant them and inject
//!   the user's claims into the issued tokens.
//!
//! Nothing is stored between requests except the bridge-session cookie the
//! browser holds. Single use of challenges is enforced upstream.

pub mod claims;
pub mod consent;
pub mod error;
pub mod login;

pub use claims::{ClaimFilter, ClaimPolicy};
pub use consent::{ConsentOutcome, ConsentPrompt};
pub use error::{FlowError, Result};
pub use login::{LoginOutcome, LoginPrompt, LoginSubmission};

use hydra_bridge_auth::{VerifierRegistry, DEFAULT_AUTH_TIMEOUT};
use hydra_bridge_core::{BridgeSession, CsrfDeriver, SessionCodec};
use std::sync::Arc;
use std::time::Duration;

use crate::hydra::AdminApi;

/// Default bridge session lifetime: 7 days
pub const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 3600;

/// Default `remember_for` on consent: 1 day
pub const DEFAULT_CONSENT_REMEMBER_SECS: i64 = 86400;

/// Tunables for the login and consent flows
#[derive(Debug, Clone)]
pub struct FlowSettings {
    /// Verifier used when the form names none
    pub default_provider: String,
    /// Lifetime of newly issued bridge sessions
    pub session_ttl_secs: i64,
    /// `remember_for` sent when accepting consent
    pub consent_remember_secs: i64,
    /// Deadline for one credential verification
    pub auth_timeout: Duration,
    /// Claims injected into ID and access tokens
    pub claim_policy: ClaimPolicy,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            default_provider: hydra_bridge_auth::verifiers::INTERNAL_PROVIDER.to_string(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            consent_remember_secs: DEFAULT_CONSENT_REMEMBER_SECS,
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
            claim_policy: ClaimPolicy::default(),
        }
    }
}

/// Ties the gateway, verifiers, session codec and CSRF deriver together
pub struct FlowOrchestrator {
    gateway: Arc<dyn AdminApi>,
    verifiers: Arc<VerifierRegistry>,
    sessions: SessionCodec,
    csrf: CsrfDeriver,
    settings: FlowSettings,
}

impl FlowOrchestrator {
    pub fn new(
        gateway: Arc<dyn AdminApi>,
        verifiers: Arc<VerifierRegistry>,
        sessions: SessionCodec,
        csrf: CsrfDeriver,
        settings: FlowSettings,
    ) -> Self {
        Self {
            gateway,
            verifiers,
            sessions,
            csrf,
            settings,
        }
    }

    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    pub fn verifiers(&self) -> &VerifierRegistry {
        &self.verifiers
    }

    /// CSRF token for a challenge, as embedded in rendered forms
    pub fn csrf_token(&self, challenge: &str) -> String {
        self.csrf.derive(challenge)
    }

    /// Verified bridge session from a cookie value, if any
    ///
    /// A forged, expired or malformed cookie is the same as no cookie.
    pub(crate) fn current_session(&self, cookie: Option<&str>) -> Option<BridgeSession> {
        cookie
            .filter(|value| !value.is_empty())
            .and_then(|value| self.sessions.verify(value))
    }
}

fn require_challenge(challenge: &str, name: &str) -> Result<()> {
    if challenge.trim().is_empty() {
        return Err(FlowError::BadRequest(format!("missing {}", name)));
    }
    Ok(())
}
