//! siwe-gateway application entry point.
//!
//! Bootstraps the server:
//! 1. Load configuration from environment
//! 2. Build the signature verification client
//! 3. Build router with the SIWE and domain-verification endpoints
//! 4. Apply security headers middleware
//! 5. Start Axum server

use siwe_gateway::{
    auth::middleware::AppState, auth::signature::SignatureVerifier, config::Config,
    middleware::security_headers, routes,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() {
    // Initialize tracing with env filter support (RUST_LOG)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load config from environment
    let config = Config::from_env().expect("Failed to load config");
    tracing::info!(
        environment = ?config.environment,
        "Starting siwe-gateway on {}",
        config.bind_addr
    );

    // Chain-aware verification client; the contract-wallet path is only
    // active when an RPC endpoint is configured.
    let verifier =
        SignatureVerifier::from_config(&config).expect("Failed to build signature verifier");
    if config.rpc_url.is_none() {
        tracing::warn!("RPC_URL not set, contract-wallet signatures will not verify");
    }

    // Build shared state
    let state = AppState {
        config: Arc::new(config.clone()),
        verifier: Arc::new(verifier),
    };

    // Explicit CORS: deny all cross-origin requests (the web client is
    // served same-origin behind the dev proxy / production frontend).
    let cors = CorsLayer::new();

    let app = routes::api_router()
        .layer(cors)
        .layer(axum::middleware::from_fn(security_headers))
        .with_state(state);

    // Bind to configured address
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
