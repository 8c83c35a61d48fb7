//! Credential Verifiers
//!
//! Turns raw end-user credentials into a verified subject and claim set.
//!
//! ## Architecture
//!
//! The bridge keeps a registry of named verifiers. The login form names the
//! provider to use (or the configured default applies), and the registry
//! routes the credentials to it:
//!
//! - **HTTP**: posts credentials to a separate credential authority
//! - **Static**: checks an in-memory user table (development and tests)
//!
//! ## Usage
//!
//! ```ignore
//! use hydra_bridge_auth::verifiers::HttpVerifier;
//! use hydra_bridge_auth::{AuthContext, Credentials, VerifierRegistryBuilder};
//!
//! let registry = VerifierRegistryBuilder::new()
//!     .with_verifier(HttpVerifier::new("http://login-api:8090")?)
//!     .build();
//!
//! let auth = registry
//!     .authenticate("internal", &AuthContext::new(challenge), &Credentials::new("hai", "123"))
//!     .await?;
//! println!("Subject: {}", auth.subject);
//! ```

pub mod error;
pub mod registry;
pub mod types;
pub mod verifiers;

pub use error::{Result, VerifierError};
pub use registry::{CredentialVerifier, VerifierRegistry, VerifierRegistryBuilder};
pub use types::{AuthContext, AuthResult, Credentials, DEFAULT_AUTH_TIMEOUT};
