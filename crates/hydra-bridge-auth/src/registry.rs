//! Verifier Registry - routes credentials to named verifiers

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

use crate::error::{Result, VerifierError};
use crate::types::{AuthContext, AuthResult, Credentials};

/// Trait for credential verifiers
///
/// Each verifier turns raw credentials into a verified subject and claims.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Name this verifier registers under by default
    fn name(&self) -> &str;

    /// Verify credentials
    ///
    /// # Returns
    /// * `Ok(AuthResult)` - Verified subject and claims
    /// * `Err(VerifierError)` - If the credentials are rejected or the
    ///   backend could not be reached
    async fn authenticate(&self, ctx: &AuthContext, credentials: &Credentials)
        -> Result<AuthResult>;

    /// Get a description of this verifier (for logging)
    fn description(&self) -> &str {
        "credential verifier"
    }
}

/// Name-keyed set of credential verifiers
///
/// Lookups take a read lock and run concurrently. Registration takes the
/// write lock; registering an existing name replaces the previous verifier.
pub struct VerifierRegistry {
    verifiers: RwLock<HashMap<String, Arc<dyn CredentialVerifier>>>,
}

impl VerifierRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            verifiers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a verifier under an explicit name
    pub fn register(&self, name: impl Into<String>, verifier: Arc<dyn CredentialVerifier>) {
        let name = name.into();
        info!(
            provider = %name,
            description = verifier.description(),
            "Registered credential verifier"
        );
        let mut verifiers = self.verifiers.write().unwrap_or_else(PoisonError::into_inner);
        if verifiers.insert(name.clone(), verifier).is_some() {
            warn!(provider = %name, "Replaced existing credential verifier");
        }
    }

    /// Register a verifier under its own name
    pub fn register_verifier<V: CredentialVerifier + 'static>(&self, verifier: V) {
        let name = verifier.name().to_string();
        self.register(name, Arc::new(verifier));
    }

    /// Look up a verifier by name
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn CredentialVerifier>> {
        let verifiers = self.verifiers.read().unwrap_or_else(PoisonError::into_inner);
        verifiers
            .get(name)
            .cloned()
            .ok_or_else(|| VerifierError::UnknownProvider(name.to_string()))
    }

    /// Check if a verifier is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        let verifiers = self.verifiers.read().unwrap_or_else(PoisonError::into_inner);
        verifiers.contains_key(name)
    }

    /// List registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let verifiers = self.verifiers.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = verifiers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Resolve `name` and verify `credentials` with it
    ///
    /// The call is bounded by `ctx.timeout`. A result with an empty subject
    /// is a failure whatever the verifier returned.
    pub async fn authenticate(
        &self,
        name: &str,
        ctx: &AuthContext,
        credentials: &Credentials,
    ) -> Result<AuthResult> {
        let verifier = self.resolve(name).map_err(|e| {
            warn!(provider = %name, "No verifier registered for provider");
            e
        })?;

        let attempt = verifier.authenticate(ctx, credentials);
        let result = match tokio::time::timeout(ctx.timeout, attempt).await {
            Ok(result) => result,
            Err(_) => Err(VerifierError::Timeout(ctx.timeout)),
        };

        let result = result.and_then(|auth| {
            if auth.subject.is_empty() {
                Err(VerifierError::EmptySubject)
            } else {
                Ok(auth)
            }
        });

        match &result {
            Ok(auth) => {
                info!(
                    provider = %name,
                    login_challenge = %ctx.login_challenge,
                    subject = %auth.subject,
                    "Credentials verified"
                );
            }
            Err(e) => {
                warn!(
                    provider = %name,
                    login_challenge = %ctx.login_challenge,
                    error = %e,
                    "Credential verification failed"
                );
            }
        }

        result
    }
}

impl Default for VerifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VerifierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifierRegistry")
            .field("providers", &self.names())
            .finish()
    }
}

/// Builder for creating a VerifierRegistry with verifiers
pub struct VerifierRegistryBuilder {
    registry: VerifierRegistry,
}

impl VerifierRegistryBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            registry: VerifierRegistry::new(),
        }
    }

    /// Add a verifier under its own name
    pub fn with_verifier<V: CredentialVerifier + 'static>(self, verifier: V) -> Self {
        self.registry.register_verifier(verifier);
        self
    }

    /// Build the registry
    pub fn build(self) -> VerifierRegistry {
        self.registry
    }
}

impl Default for VerifierRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
