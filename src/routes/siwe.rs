//! SIWE authentication endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::auth::cookie::{auth_cookie, clear_auth_cookie};
use crate::auth::middleware::{AppState, AuthSession};
use crate::auth::signature::SignatureCheck;
use crate::auth::{message::SiweMessage, nonce, token};
use crate::error::AppError;
use crate::models::{AuthResponse, MeResponse, MessageResponse, SiweAuthRequest};

/// GET /api/siwe/nonce — Fresh challenge nonce, plain text.
pub async fn issue_nonce() -> String {
    nonce::issue_nonce()
}

/// POST /api/siwe — Verify a signed SIWE message and start a session.
pub async fn authenticate(
    State(state): State<AppState>,
    payload: Result<Json<SiweAuthRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e.body_text())))?;

    // A message that doesn't parse can never verify; same rejection as a
    // bad signature so callers learn nothing about which check failed.
    let message = match SiweMessage::parse(&req.message) {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(action = "auth_failed", error = %e, "Unparseable SIWE message");
            return Err(AppError::Unauthorized("Invalid signature".to_string()));
        }
    };

    match state
        .verifier
        .verify(&req.message, message.address, &req.signature)
        .await
    {
        Ok(SignatureCheck::Valid) => {}
        Ok(SignatureCheck::Invalid) => {
            tracing::warn!(
                action = "auth_failed",
                address = %message.address_raw,
                chain_id = message.chain_id,
                "Invalid signature"
            );
            return Err(AppError::Unauthorized("Invalid signature".to_string()));
        }
        Err(e) => {
            // Backend failure, not a forgery; logged as such but the
            // client still only sees an authentication failure.
            tracing::error!(
                action = "auth_backend_error",
                address = %message.address_raw,
                error = %e,
                "Signature verification backend failure"
            );
            return Err(AppError::Unauthorized("Invalid signature".to_string()));
        }
    }

    let jwt = token::issue(
        &message.address_raw,
        &state.config.jwt_secret,
        state.config.session_ttl_secs,
    )
    .map_err(|e| AppError::Internal(format!("Token issuance failed: {}", e)))?;

    tracing::info!(
        action = "auth_success",
        address = %message.address_raw,
        chain_id = message.chain_id,
        domain = %message.domain,
        "User authenticated"
    );

    Ok((
        [(header::SET_COOKIE, auth_cookie(&jwt))],
        Json(AuthResponse {
            message: "Authenticated".to_string(),
            address: message.address_raw,
        }),
    ))
}

/// POST /api/siwe/logout — Clear the session cookie.
///
/// Stateless sessions have nothing to delete server-side; the clearing
/// cookie (expiry in the past) is the whole transition.
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, clear_auth_cookie())],
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}

/// GET /api/me — Report the authenticated identity, or 401.
pub async fn me(session: AuthSession) -> Json<MeResponse> {
    Json(MeResponse {
        address: session.address,
        authenticated: true,
    })
}
