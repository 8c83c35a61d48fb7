//! Challenge-bound CSRF tokens
//!
//! A CSRF token is `base64url(SHA-256(secret ":" challenge))`. Nothing is
//! stored: the authorization-server challenge is the nonce, so recomputing
//! the digest is enough to validate a form submission for that challenge.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::error::{CoreError, Result};

/// Delimiter between secret and challenge in the hashed input
const DELIMITER: &[u8] = b":";

/// Derives and validates CSRF tokens for a fixed secret
#[derive(Clone)]
pub struct CsrfDeriver {
    secret: Vec<u8>,
}

impl std::fmt::Debug for CsrfDeriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrfDeriver")
            .field("secret", &"[redacted]")
            .finish()
    }
}

impl CsrfDeriver {
    /// Create a deriver from a non-empty secret
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(CoreError::EmptySecret);
        }
        Ok(Self {
            secret: secret.to_vec(),
        })
    }

    /// Token for `challenge`
    pub fn derive(&self, challenge: &str) -> String {
        derive(&self.secret, challenge)
    }

    /// Check a presented token against `challenge`
    pub fn validate(&self, challenge: &str, presented: &str) -> bool {
        validate(&self.secret, challenge, presented)
    }
}

/// Derive the CSRF token for a (secret, challenge) pair
pub fn derive(secret: &[u8], challenge: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret);
    hasher.update(DELIMITER);
    hasher.update(challenge.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

/// Recompute the token and compare it to `presented` in constant time
pub fn validate(secret: &[u8], challenge: &str, presented: &str) -> bool {
    let expected = derive(secret, challenge);
    expected.as_bytes().ct_eq(presented.as_bytes()).into()
}
