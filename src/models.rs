//! Request and response models for the API.
//!
//! All models use serde for serialization/deserialization.

use serde::{Deserialize, Serialize};

/// Request to authenticate with a signed SIWE message.
#[derive(Debug, Deserialize)]
pub struct SiweAuthRequest {
    /// Raw EIP-4361 message text, exactly as signed by the wallet.
    pub message: String,
    /// Hex-encoded signature over the message.
    pub signature: String,
}

/// Response after successful authentication.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub address: String,
}

/// Generic message-only response (logout).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for the current-session endpoint.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub address: String,
    pub authenticated: bool,
}

/// Query parameters for domain verification.
///
/// Both fields are optional so a missing parameter surfaces as a 400
/// with the envelope body rather than an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct VerifyDomainParams {
    pub domain: Option<String>,
    pub token: Option<String>,
}

/// Domain verification result envelope.
///
/// DNS failures are reported inside a 200 response with `verified: false`.
#[derive(Debug, Serialize)]
pub struct VerifyDomainResponse {
    pub verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Underlying resolver error, included only in development mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl VerifyDomainResponse {
    pub fn ok(verified: bool) -> Self {
        VerifyDomainResponse {
            verified,
            error: None,
            detail: None,
        }
    }

    pub fn failed(error: impl Into<String>, detail: Option<String>) -> Self {
        VerifyDomainResponse {
            verified: false,
            error: Some(error.into()),
            detail,
        }
    }
}
