//! # Hydra Bridge Core
//!
//! Stateless trust primitives for the login/consent bridge.
//!
//! ## Key Concepts
//!
//! - **Bridge session**: the bridge's own SSO record, carried entirely inside
//!   an HMAC-signed cookie value. There is no server-side session store.
//! - **CSRF token**: a digest of the signing secret and an authorization-server
//!   challenge. Every authorization flow gets its own token without any
//!   per-request state on the bridge.
//!
//! Both primitives are pure functions of their input and a read-only secret,
//! so they are shared between request handlers without locking.

pub mod csrf;
pub mod error;
pub mod session;

pub use csrf::CsrfDeriver;
pub use error::{CoreError, Result, SessionError};
pub use session::{BridgeSession, SessionCodec};

/// Claim name to claim value mapping
///
/// Backed by an ordered map, so serialization is canonical.
pub type Claims = serde_json::Map<String, serde_json::Value>;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
