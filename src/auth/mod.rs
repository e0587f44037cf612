//! Authentication layer: SIWE message parsing, signature verification,
//! and JWT session credentials.

pub mod cookie;
pub mod message;
pub mod middleware;
pub mod nonce;
pub mod signature;
pub mod token;

pub use message::SiweMessage;
pub use middleware::{AppState, AuthSession};
pub use nonce::issue_nonce;
pub use signature::{SignatureCheck, SignatureVerifier};
