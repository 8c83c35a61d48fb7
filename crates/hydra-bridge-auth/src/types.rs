//! Core types for credential verification

use hydra_bridge_core::Claims;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default deadline for a single `authenticate` call
pub const DEFAULT_AUTH_TIMEOUT: Duration = Duration::from_secs(15);

/// Raw end-user credentials
///
/// Only ever held in memory for the duration of one request.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Per-call context handed to a verifier
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// The login challenge this attempt belongs to
    pub login_challenge: String,

    /// Deadline for the whole verification
    pub timeout: Duration,
}

impl AuthContext {
    pub fn new(login_challenge: impl Into<String>) -> Self {
        Self {
            login_challenge: login_challenge.into(),
            timeout: DEFAULT_AUTH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A verified identity
///
/// `subject` becomes the OIDC `sub` claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResult {
    pub subject: String,

    #[serde(default)]
    pub claims: Claims,
}

impl AuthResult {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            claims: Claims::new(),
        }
    }

    /// Add a claim
    pub fn with_claim(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.claims.insert(key.into(), value);
        self
    }
}
