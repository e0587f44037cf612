//! JWT session credentials.
//!
//! The session is stateless: the signed token is the only session state,
//! so a credential cannot be revoked server-side before its expiry.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Registered claims carried by a session credential.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated address.
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign session token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("invalid token")]
    Invalid,
}

/// Issue a signed session credential for a verified address.
pub fn issue(subject: &str, secret: &str, ttl_secs: u64) -> Result<String, TokenError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let claims = Claims {
        sub: subject.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

/// Validate a session credential and return the embedded subject.
///
/// Malformed, forged, and expired tokens all collapse to
/// [`TokenError::Invalid`]; the caller responds 401 either way.
pub fn validate(token: &str, secret: &str) -> Result<String, TokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims.sub)
    .map_err(|_| TokenError::Invalid)
}
