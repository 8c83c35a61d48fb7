//! Credential verifiers shipped with the bridge

pub mod fixed;
pub mod http;

pub use fixed::{StaticUser, StaticVerifier, STATIC_PROVIDER};
pub use http::{HttpVerifier, DEFAULT_HTTP_TIMEOUT, INTERNAL_PROVIDER};
