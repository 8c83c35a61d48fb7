//! Hydra Bridge Server
//!
//! The login and consent app for an OAuth2 authorization server. It:
//! - Answers login challenges from a signed SSO cookie or a credential form
//! - Delegates credential checks to pluggable verifiers
//! - Grants consent and injects user claims into the issued tokens
//!
//! ## Security properties
//!
//! 1. **Forgery resistance**: bridge sessions are HMAC-signed; a bad
//!    signature, malformed payload or expired session is treated as no session
//! 2. **CSRF binding**: every form carries a token derived from its challenge,
//!    so a token from one authorization flow is useless in another
//! 3. **Opaque failures**: users only see generic error categories
//!
//! ## API Endpoints
//!
//! - `GET /healthz` - Liveness check
//! - `GET /login?login_challenge=...&provider=...` - Start a login challenge
//! - `POST /login` - Submit credentials
//! - `GET /consent?consent_challenge=...` - Start a consent challenge
//! - `POST /consent` - Confirm consent

pub mod api;
pub mod config;
pub mod flow;
pub mod hydra;

pub use api::{create_router, AppState};
pub use config::{BridgeConfig, ConfigError};
pub use flow::{FlowError, FlowOrchestrator, FlowSettings};
pub use hydra::{AdminApi, GatewayError, HydraAdminClient};
