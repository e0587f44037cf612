//! Axum extractors for authenticated sessions.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::auth::cookie::{cookie_value, AUTH_COOKIE};
use crate::auth::signature::SignatureVerifier;
use crate::auth::token;
use crate::config::Config;
use crate::error::AppError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: Arc<SignatureVerifier>,
}

/// Authenticated session extractor.
///
/// Extracts and validates the session credential from the `auth` cookie.
/// Absence of the cookie ("Not authenticated") is reported distinctly
/// from a cookie that fails validation ("Invalid token"); both are 401.
pub struct AuthSession {
    pub address: String,
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|header| cookie_value(header, AUTH_COOKIE))
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;

        let address = token::validate(token, &state.config.jwt_secret)
            .map_err(|_| AppError::Unauthorized("Invalid token".to_string()))?;

        Ok(AuthSession { address })
    }
}
