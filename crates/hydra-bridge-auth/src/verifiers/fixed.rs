//! Static Credential Verifier
//!
//! Verifies against an in-memory user table. Useful for development and testing.

use async_trait::async_trait;
use hydra_bridge_core::Claims;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use subtle::ConstantTimeEq;

use crate::error::{Result, VerifierError};
use crate::registry::CredentialVerifier;
use crate::types::{AuthContext, AuthResult, Credentials};

/// Name the static verifier registers under by default
pub const STATIC_PROVIDER: &str = "static";

/// An entry in the static user table
#[derive(Debug, Clone)]
pub struct StaticUser {
    pub password: String,
    pub subject: String,
    pub claims: Claims,
}

impl StaticUser {
    pub fn new(password: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            password: password.into(),
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

/// In-memory credential verifier
pub struct StaticVerifier {
    users: RwLock<HashMap<String, StaticUser>>,
}

impl StaticVerifier {
    /// Create an empty verifier
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }

    /// Add a user
    pub fn with_user(self, username: impl Into<String>, user: StaticUser) -> Self {
        self.add_user(username, user);
        self
    }

    /// Add or replace a user
    pub fn add_user(&self, username: impl Into<String>, user: StaticUser) {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        users.insert(username.into(), user);
    }

    /// Parse `user:password:subject` entries separated by `;`
    ///
    /// Subject defaults to the username when omitted.
    pub fn from_table(table: &str) -> Result<Self> {
        let verifier = Self::new();
        for entry in table.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let mut parts = entry.splitn(3, ':');
            let username = parts.next().unwrap_or_default();
            let password = parts.next().ok_or_else(|| {
                VerifierError::InvalidUserTable(format!("entry '{}' has no password", username))
            })?;
            let subject = parts.next().filter(|s| !s.is_empty()).unwrap_or(username);

            if username.is_empty() {
                return Err(VerifierError::InvalidUserTable(
                    "entry has an empty username".to_string(),
                ));
            }
            verifier.add_user(username, StaticUser::new(password, subject));
        }
        Ok(verifier)
    }

    /// Number of users
    pub fn len(&self) -> usize {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for StaticVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialVerifier for StaticVerifier {
    fn name(&self) -> &str {
        STATIC_PROVIDER
    }

    fn description(&self) -> &str {
        "static in-memory users"
    }

    async fn authenticate(
        &self,
        _ctx: &AuthContext,
        credentials: &Credentials,
    ) -> Result<AuthResult> {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        let user = users
            .get(&credentials.username)
            .ok_or(VerifierError::InvalidCredentials)?;

        let matches: bool = user
            .password
            .as_bytes()
            .ct_eq(credentials.password.as_bytes())
            .into();
        if !matches {
            return Err(VerifierError::InvalidCredentials);
        }

        Ok(AuthResult {
            subject: user.subject.clone(),
            claims: user.claims.clone(),
        })
    }
}
