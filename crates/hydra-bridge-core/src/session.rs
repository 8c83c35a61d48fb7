//! Bridge session tokens
//!
//! The bridge keeps no server-side session table. A [`BridgeSession`] lives
//! entirely inside the cookie value produced by [`SessionCodec::sign`]:
//!
//! ```text
//! base64url(json(session)) "." base64url(HMAC-SHA256(secret, json(session)))
//! ```
//!
//! Every read re-verifies the tag, the expiry and the subject. Any failure
//! collapses to `None` so callers cannot tell a forged cookie from a missing one.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::{CoreError, Result, SessionError};
use crate::Claims;

type HmacSha256 = Hmac<Sha256>;

/// Separator between payload and tag. Not a member of the base64url alphabet.
pub const TOKEN_SEPARATOR: char = '.';

/// The single-sign-on record carried in the bridge cookie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeSession {
    /// Subject identifier (becomes the OIDC `sub`)
    pub sub: String,

    /// Claims returned by the verifier at login time
    #[serde(default, skip_serializing_if = "Claims::is_empty")]
    pub claims: Claims,

    /// Issued-at, unix seconds
    pub iat: i64,

    /// Expiry, unix seconds. Zero means no expiry.
    pub exp: i64,
}

impl BridgeSession {
    /// Create a session issued now that expires after `ttl_secs`
    pub fn new(sub: impl Into<String>, claims: Claims, ttl_secs: i64) -> Self {
        Self::issued_at(sub, claims, Utc::now().timestamp(), ttl_secs)
    }

    /// Create a session with an explicit issue time
    ///
    /// Expiry saturates at `i64::MAX` rather than wrapping.
    pub fn issued_at(sub: impl Into<String>, claims: Claims, iat: i64, ttl_secs: i64) -> Self {
        Self {
            sub: sub.into(),
            claims,
            iat,
            exp: iat.saturating_add(ttl_secs),
        }
    }

    /// Seconds left before expiry at `now`, never negative
    ///
    /// Returns `None` for sessions without an expiry.
    pub fn remaining_secs(&self, now: i64) -> Option<i64> {
        if self.exp > 0 {
            Some((self.exp - now).max(0))
        } else {
            None
        }
    }

    fn is_expired_at(&self, now: i64) -> bool {
        self.exp > 0 && now > self.exp
    }
}

/// Signs and verifies bridge session tokens with a server-held secret
#[derive(Clone)]
pub struct SessionCodec {
    secret: Vec<u8>,
}

impl std::fmt::Debug for SessionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCodec")
            .field("secret", &"[redacted]")
            .finish()
    }
}

impl SessionCodec {
    /// Create a codec from a non-empty secret
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(CoreError::EmptySecret);
        }
        Ok(Self {
            secret: secret.to_vec(),
        })
    }

    /// Serialize and sign a session record
    pub fn sign(&self, session: &BridgeSession) -> Result<String> {
        if session.sub.is_empty() {
            return Err(CoreError::InvalidSession("subject is empty".into()));
        }

        let payload = serde_json::to_vec(session)?;
        let tag = self.tag(&payload);

        Ok(format!(
            "{}{}{}",
            URL_SAFE_NO_PAD.encode(&payload),
            TOKEN_SEPARATOR,
            URL_SAFE_NO_PAD.encode(tag)
        ))
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> Option<BridgeSession> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify a token as of `now` (unix seconds)
    pub fn verify_at(&self, token: &str, now: i64) -> Option<BridgeSession> {
        match self.decode(token, now) {
            Ok(session) => Some(session),
            Err(reason) => {
                debug!(reason = %reason, "Bridge session rejected");
                None
            }
        }
    }

    fn decode(&self, token: &str, now: i64) -> std::result::Result<BridgeSession, SessionError> {
        let mut parts = token.split(TOKEN_SEPARATOR);
        let (payload_b64, tag_b64) = match (parts.next(), parts.next(), parts.next()) {
            (Some(payload), Some(tag), None) => (payload, tag),
            _ => return Err(SessionError::Malformed),
        };

        let payload = URL_SAFE_NO_PAD
            .decode(payload_b64)
            .map_err(|_| SessionError::Encoding)?;
        let tag = URL_SAFE_NO_PAD
            .decode(tag_b64)
            .map_err(|_| SessionError::Encoding)?;

        let expected = self.tag(&payload);
        if !bool::from(expected.as_slice().ct_eq(tag.as_slice())) {
            return Err(SessionError::BadSignature);
        }

        let session: BridgeSession =
            serde_json::from_slice(&payload).map_err(|_| SessionError::Payload)?;

        if session.is_expired_at(now) {
            return Err(SessionError::Expired(session.exp));
        }
        if session.sub.is_empty() {
            return Err(SessionError::MissingSubject);
        }

        Ok(session)
    }

    fn tag(&self, payload: &[u8]) -> Vec<u8> {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC can take key of any size");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn codec() -> SessionCodec {
        SessionCodec::new("cookie-auth-secret").unwrap()
    }

    fn claims() -> Claims {
        let mut claims = Claims::new();
        claims.insert("email".into(), json!("hai@x.local"));
        claims
    }

    #[test]
    fn test_sign_and_verify() {
        let codec = codec();
        let session = BridgeSession::issued_at("user-12345", claims(), 1_000, 3_600);

        let token = codec.sign(&session).unwrap();
        assert_eq!(token.matches(TOKEN_SEPARATOR).count(), 1);

        let verified = codec.verify_at(&token, 2_000).unwrap();
        assert_eq!(verified, session);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let session = BridgeSession::issued_at("user-1", Claims::new(), 1_000, i64::MAX);
        assert_eq!(session.exp, i64::MAX);
        assert!(session.exp > session.iat);

        let token = codec().sign(&session).unwrap();
        assert!(codec().verify_at(&token, 2_000).is_some());
    }

    #[test]
    fn test_expiry_boundary() {
        let codec = codec();
        let session = BridgeSession::issued_at("user-1", Claims::new(), 1_000, 100);
        let token = codec.sign(&session).unwrap();

        // now == exp is still valid
        assert!(codec.verify_at(&token, 1_100).is_some());
        assert!(codec.verify_at(&token, 1_101).is_none());
    }

    #[test]
    fn test_zero_expiry_never_expires() {
        let codec = codec();
        let session = BridgeSession {
            sub: "user-1".into(),
            claims: Claims::new(),
            iat: 0,
            exp: 0,
        };
        let token = codec.sign(&session).unwrap();
        assert!(codec.verify_at(&token, i64::MAX).is_some());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let session = BridgeSession::issued_at("user-1", Claims::new(), 1_000, 100);
        let token = codec().sign(&session).unwrap();

        let other = SessionCodec::new("another-secret").unwrap();
        assert_eq!(other.decode(&token, 1_000), Err(SessionError::BadSignature));
    }

    #[test]
    fn test_malformed_tokens() {
        let codec = codec();
        assert_eq!(codec.decode("", 0), Err(SessionError::Malformed));
        assert_eq!(codec.decode("abc", 0), Err(SessionError::Malformed));
        assert_eq!(codec.decode("a.b.c", 0), Err(SessionError::Malformed));
        assert_eq!(codec.decode("!!!.???", 0), Err(SessionError::Encoding));
    }

    #[test]
    fn test_signed_garbage_payload_rejected() {
        let codec = codec();
        let payload = b"not json";
        let token = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode(codec.tag(payload))
        );
        assert_eq!(codec.decode(&token, 0), Err(SessionError::Payload));
    }

    #[test]
    fn test_signed_empty_subject_rejected() {
        let codec = codec();
        let payload = br#"{"sub":"","iat":0,"exp":0}"#;
        let token = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode(codec.tag(payload))
        );
        assert_eq!(codec.decode(&token, 0), Err(SessionError::MissingSubject));
    }

    #[test]
    fn test_sign_refuses_empty_subject() {
        let session = BridgeSession::issued_at("", Claims::new(), 0, 10);
        assert!(matches!(
            codec().sign(&session),
            Err(CoreError::InvalidSession(_))
        ));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(SessionCodec::new(""), Err(CoreError::EmptySecret)));
    }

    #[test]
    fn test_remaining_secs() {
        let session = BridgeSession::issued_at("user-1", Claims::new(), 1_000, 600);
        assert_eq!(session.remaining_secs(1_100), Some(500));
        assert_eq!(session.remaining_secs(5_000), Some(0));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", codec());
        assert!(!rendered.contains("cookie-auth-secret"));
    }
}
