//! HTTP surface of the bridge

pub mod cookies;
pub mod error;
pub mod handlers;
pub mod pages;

use axum::{routing::get, Json, Router};
use hydra_bridge_auth::verifiers::{
    HttpVerifier, StaticVerifier, INTERNAL_PROVIDER, STATIC_PROVIDER,
};
use hydra_bridge_auth::VerifierRegistry;
use hydra_bridge_core::{CsrfDeriver, SessionCodec};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{BridgeConfig, ConfigError};
use crate::flow::FlowOrchestrator;
use crate::hydra::{AdminApi, HydraAdminClient};
use cookies::CookieSettings;

/// Application state shared across handlers
pub struct AppState {
    /// Login and consent orchestration
    pub flows: FlowOrchestrator,
    /// Session cookie attributes
    pub cookies: CookieSettings,
}

impl AppState {
    /// Wire up the gateway, verifiers and signing keys from configuration
    pub fn from_config(config: &BridgeConfig) -> Result<Self, ConfigError> {
        let gateway = HydraAdminClient::with_timeout(&config.hydra_admin_url, config.hydra_timeout)
            .map_err(|e| ConfigError::Invalid {
                key: "HYDRA_ADMIN_URL",
                message: e.to_string(),
            })?;

        let verifiers = VerifierRegistry::new();

        let internal = HttpVerifier::with_timeout(&config.login_api_url, config.login_api_timeout)
            .map_err(|e| ConfigError::Invalid {
                key: "LOGIN_API_URL",
                message: e.to_string(),
            })?;
        verifiers.register(INTERNAL_PROVIDER, Arc::new(internal));

        if let Some(table) = &config.static_users {
            let users = StaticVerifier::from_table(table).map_err(|e| ConfigError::Invalid {
                key: "STATIC_USERS",
                message: e.to_string(),
            })?;
            info!(users = users.len(), "Static verifier enabled");
            verifiers.register(STATIC_PROVIDER, Arc::new(users));
        }

        if !verifiers.contains(&config.default_provider) {
            return Err(ConfigError::Invalid {
                key: "DEFAULT_PROVIDER",
                message: format!("no verifier named '{}'", config.default_provider),
            });
        }

        let key = config.cookie_auth_key.as_bytes();
        let invalid_key = |e: hydra_bridge_core::CoreError| ConfigError::Invalid {
            key: "COOKIE_AUTH_KEY",
            message: e.to_string(),
        };

        Ok(Self::new(
            Arc::new(gateway),
            Arc::new(verifiers),
            SessionCodec::new(key).map_err(invalid_key)?,
            CsrfDeriver::new(key).map_err(invalid_key)?,
            config,
        ))
    }

    /// Build state around an arbitrary gateway and registry
    pub fn new(
        gateway: Arc<dyn AdminApi>,
        verifiers: Arc<VerifierRegistry>,
        sessions: SessionCodec,
        csrf: CsrfDeriver,
        config: &BridgeConfig,
    ) -> Self {
        Self {
            flows: FlowOrchestrator::new(
                gateway,
                verifiers,
                sessions,
                csrf,
                config.flow_settings(),
            ),
            cookies: config.cookie_settings(),
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Liveness check
///
/// GET /healthz
pub async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/login", get(handlers::get_login).post(handlers::post_login))
        .route("/consent", get(handlers::get_consent).post(handlers::post_consent))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
