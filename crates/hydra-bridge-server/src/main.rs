//! Hydra Bridge Binary
//!
//! Runs the login/consent HTTP server in front of the authorization server.

use std::env;
use std::process;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use hydra_bridge_server::{create_router, AppState, BridgeConfig};

#[tokio::main]
async fn main() {
    // Initialize logging
    let log_level = env::var("BRIDGE_LOG_LEVEL")
        .unwrap_or_else(|_| "info".into())
        .parse()
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let config = match BridgeConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            process::exit(1);
        }
    };

    let state = match AppState::from_config(&config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!(error = %e, "Failed to initialize bridge");
            process::exit(1);
        }
    };

    info!(
        hydra_admin_url = %config.hydra_admin_url,
        default_provider = %config.default_provider,
        verifiers = ?state.flows.verifiers().names(),
        session_ttl_secs = config.session_ttl_secs,
        "Starting hydra bridge"
    );

    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&config.addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.addr, error = %e, "Failed to bind");
            process::exit(1);
        }
    };

    info!(addr = %config.addr, "Hydra bridge listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        process::exit(1);
    }
}
