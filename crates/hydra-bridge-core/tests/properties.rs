//! Property-Based Tests for Session and CSRF Tokens
//!
//! These tests verify the security properties of the stateless primitives:
//! 1. ROUND TRIP: a signed, unexpired session verifies to the same record
//! 2. TAMPER DETECTION: any single bit flip invalidates the token
//! 3. EXPIRY: an expired session never verifies, whatever its signature
//! 4. CSRF DETERMINISM: same inputs, same token; different inputs, different token
//!
//! Uses proptest for property-based testing with arbitrary inputs.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hydra_bridge_core::{csrf, BridgeSession, Claims, SessionCodec};
use proptest::prelude::*;

const NOW: i64 = 1_700_000_000;

// =============================================================================
// Test Helpers
// =============================================================================

fn arb_claims() -> impl Strategy<Value = Claims> {
    prop::collection::btree_map("[a-z_]{1,12}", "[ -~]{0,24}", 0..6).prop_map(|m| {
        m.into_iter()
            .map(|(k, v)| (k, serde_json::Value::String(v)))
            .collect()
    })
}

fn arb_session() -> impl Strategy<Value = BridgeSession> {
    ("[a-zA-Z0-9_-]{1,32}", arb_claims(), 0..NOW, 1..10_000_000i64).prop_map(
        |(sub, claims, iat, lifetime)| BridgeSession {
            sub,
            claims,
            iat,
            exp: NOW + lifetime,
        },
    )
}

fn split(token: &str) -> (Vec<u8>, Vec<u8>) {
    let (payload, tag) = token.split_once('.').expect("token has a separator");
    (
        URL_SAFE_NO_PAD.decode(payload).unwrap(),
        URL_SAFE_NO_PAD.decode(tag).unwrap(),
    )
}

fn join(payload: &[u8], tag: &[u8]) -> String {
    format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(payload),
        URL_SAFE_NO_PAD.encode(tag)
    )
}

// =============================================================================
// ROUND TRIP
// =============================================================================

proptest! {
    #[test]
    fn prop_verify_inverts_sign(
        secret in "[ -~]{1,64}",
        session in arb_session(),
    ) {
        let codec = SessionCodec::new(&secret).unwrap();
        let token = codec.sign(&session).unwrap();

        prop_assert_eq!(codec.verify_at(&token, NOW), Some(session));
    }
}

// =============================================================================
// TAMPER DETECTION
// =============================================================================

proptest! {
    /// Flipping one bit of the decoded payload must break verification
    #[test]
    fn prop_payload_bit_flip_detected(
        session in arb_session(),
        bit in any::<prop::sample::Index>(),
    ) {
        let codec = SessionCodec::new("tamper-secret").unwrap();
        let token = codec.sign(&session).unwrap();
        let (mut payload, tag) = split(&token);

        let bit = bit.index(payload.len() * 8);
        payload[bit / 8] ^= 1 << (bit % 8);

        prop_assert_eq!(codec.verify_at(&join(&payload, &tag), NOW), None);
    }

    /// Flipping one bit of the decoded tag must break verification
    #[test]
    fn prop_tag_bit_flip_detected(
        session in arb_session(),
        bit in any::<prop::sample::Index>(),
    ) {
        let codec = SessionCodec::new("tamper-secret").unwrap();
        let token = codec.sign(&session).unwrap();
        let (payload, mut tag) = split(&token);

        let bit = bit.index(tag.len() * 8);
        tag[bit / 8] ^= 1 << (bit % 8);

        prop_assert_eq!(codec.verify_at(&join(&payload, &tag), NOW), None);
    }

    /// Flipping one bit of the raw token text must also be rejected
    #[test]
    fn prop_token_text_bit_flip_detected(
        session in arb_session(),
        bit in any::<prop::sample::Index>(),
    ) {
        let codec = SessionCodec::new("tamper-secret").unwrap();
        let mut token = codec.sign(&session).unwrap().into_bytes();

        let bit = bit.index(token.len() * 8);
        token[bit / 8] ^= 1 << (bit % 8);
        let tampered = String::from_utf8_lossy(&token).into_owned();

        prop_assert_eq!(codec.verify_at(&tampered, NOW), None);
    }
}

// =============================================================================
// EXPIRY
// =============================================================================

proptest! {
    #[test]
    fn prop_expired_session_rejected(
        sub in "[a-z0-9-]{1,16}",
        exp in 1..NOW,
        lag in 1..1_000_000i64,
    ) {
        let codec = SessionCodec::new("expiry-secret").unwrap();
        let session = BridgeSession { sub, claims: Claims::new(), iat: 0, exp };
        let token = codec.sign(&session).unwrap();

        prop_assert_eq!(codec.verify_at(&token, exp + lag), None);
    }
}

// =============================================================================
// CSRF DETERMINISM
// =============================================================================

proptest! {
    #[test]
    fn prop_csrf_deterministic(
        secret in "[ -~]{1,32}",
        challenge in "[a-zA-Z0-9]{1,64}",
    ) {
        let a = csrf::derive(secret.as_bytes(), &challenge);
        let b = csrf::derive(secret.as_bytes(), &challenge);
        prop_assert_eq!(&a, &b);
        prop_assert!(csrf::validate(secret.as_bytes(), &challenge, &a));
    }

    #[test]
    fn prop_csrf_differs_across_challenges(
        challenge_a in "[a-zA-Z0-9]{1,64}",
        challenge_b in "[a-zA-Z0-9]{1,64}",
    ) {
        prop_assume!(challenge_a != challenge_b);

        let token = csrf::derive(b"csrf-secret", &challenge_a);
        prop_assert_ne!(&token, &csrf::derive(b"csrf-secret", &challenge_b));
        prop_assert!(!csrf::validate(b"csrf-secret", &challenge_b, &token));
    }

    #[test]
    fn prop_csrf_differs_across_secrets(
        secret_a in "[a-zA-Z0-9]{1,32}",
        secret_b in "[a-zA-Z0-9]{1,32}",
    ) {
        prop_assume!(secret_a != secret_b);

        prop_assert_ne!(
            csrf::derive(secret_a.as_bytes(), "challenge"),
            csrf::derive(secret_b.as_bytes(), "challenge")
        );
    }
}
