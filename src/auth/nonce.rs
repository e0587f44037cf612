//! Nonce generation for SIWE challenges.

use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Nonce length in characters. EIP-4361 requires at least 8 alphanumeric
/// characters; 32 gives ~190 bits of entropy.
const NONCE_LEN: usize = 32;

/// Generate a fresh unpredictable nonce for a SIWE challenge.
///
/// Alphanumeric only, so the value embeds directly into the message's
/// `Nonce:` field. Issued nonces are not tracked server-side.
pub fn issue_nonce() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}
