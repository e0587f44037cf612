//! API route handlers.

pub mod domain;
pub mod siwe;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::middleware::AppState;

/// Build the API router. All endpoints live under the `/api` prefix.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // SIWE authentication flow
        .route("/api/siwe/nonce", get(siwe::issue_nonce))
        .route("/api/siwe", post(siwe::authenticate))
        .route("/api/siwe/logout", post(siwe::logout))
        .route("/api/me", get(siwe::me))
        // Domain ownership verification
        .route("/api/verify-domain", get(domain::verify_domain))
}
