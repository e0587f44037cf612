//! Chain-aware signature verification.
//!
//! Verifies that a claimed address produced a signature over a SIWE
//! message. Key-pair wallets are checked by ECDSA recovery over the
//! EIP-191 digest; smart-contract wallets fall back to an ERC-1271
//! `isValidSignature` call against the configured RPC endpoint.

use std::str::FromStr;
use std::time::Duration;

use ethers::abi::{encode, Token};
use ethers::providers::{Http, Middleware, Provider};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, RecoveryMessage, Signature, TransactionRequest};
use ethers::utils::hash_message;

use crate::config::Config;

/// `bytes4(keccak256("isValidSignature(bytes32,bytes)"))`, returned by
/// ERC-1271 wallets on success.
const ERC1271_MAGIC: [u8; 4] = [0x16, 0x26, 0xba, 0x7e];

/// Outcome of a signature check against the claimed address.
///
/// Distinct from [`VerifyError`]: `Invalid` means the cryptography says
/// no, an error means the check could not be carried out at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCheck {
    Valid,
    Invalid,
}

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("verification backend error: {0}")]
    Backend(String),

    #[error("verification timed out after {0:?}")]
    Timeout(Duration),
}

/// Verification client, built once at startup and shared via `Arc`.
pub struct SignatureVerifier {
    provider: Option<Provider<Http>>,
    timeout: Duration,
}

impl SignatureVerifier {
    pub fn from_config(config: &Config) -> Result<Self, VerifyError> {
        let provider = match &config.rpc_url {
            Some(url) => Some(
                Provider::<Http>::try_from(url.as_str())
                    .map_err(|e| VerifyError::Backend(format!("invalid RPC URL: {}", e)))?,
            ),
            None => None,
        };
        Ok(SignatureVerifier {
            provider,
            timeout: config.verify_timeout,
        })
    }

    /// Check `signature_hex` over `message_text` against `claimed`.
    ///
    /// A malformed signature (bad hex, wrong length) is `Invalid`, not an
    /// error: the caller cannot tell garbage from forgery and must reject
    /// both the same way.
    pub async fn verify(
        &self,
        message_text: &str,
        claimed: Address,
        signature_hex: &str,
    ) -> Result<SignatureCheck, VerifyError> {
        let digest = hash_message(message_text);

        let signature = match Signature::from_str(signature_hex) {
            Ok(sig) => sig,
            Err(_) => return Ok(SignatureCheck::Invalid),
        };

        // Key-pair wallet path: recover the signer and compare.
        if let Ok(recovered) = signature.recover(RecoveryMessage::Hash(digest)) {
            if recovered == claimed {
                return Ok(SignatureCheck::Valid);
            }
        }

        // Contract-wallet path, only when an RPC endpoint is configured.
        let Some(provider) = &self.provider else {
            return Ok(SignatureCheck::Invalid);
        };

        let calldata = erc1271_calldata(digest.as_bytes(), &signature.to_vec());
        let tx: TypedTransaction = TransactionRequest::new()
            .to(claimed)
            .data(calldata)
            .into();

        match tokio::time::timeout(self.timeout, provider.call(&tx, None)).await {
            Err(_) => Err(VerifyError::Timeout(self.timeout)),
            Ok(Ok(returned)) => {
                // Calling a non-contract address returns empty bytes.
                Ok(if returned.len() >= 4 && returned[..4] == ERC1271_MAGIC {
                    SignatureCheck::Valid
                } else {
                    SignatureCheck::Invalid
                })
            }
            Ok(Err(e)) => {
                // ERC-1271 wallets may revert instead of returning a
                // non-magic value; that is a rejection, not an outage.
                let msg = e.to_string();
                if msg.contains("revert") {
                    Ok(SignatureCheck::Invalid)
                } else {
                    Err(VerifyError::Backend(msg))
                }
            }
        }
    }
}

/// ABI-encode an `isValidSignature(bytes32,bytes)` call.
fn erc1271_calldata(digest: &[u8], signature: &[u8]) -> Vec<u8> {
    let mut calldata = ERC1271_MAGIC.to_vec();
    calldata.extend(encode(&[
        Token::FixedBytes(digest.to_vec()),
        Token::Bytes(signature.to_vec()),
    ]));
    calldata
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::signers::{LocalWallet, Signer};

    fn offline_verifier() -> SignatureVerifier {
        SignatureVerifier {
            provider: None,
            timeout: Duration::from_secs(5),
        }
    }

    fn test_wallet() -> LocalWallet {
        LocalWallet::new(&mut rand::thread_rng())
    }

    #[tokio::test]
    async fn test_valid_signature_verifies() {
        let wallet = test_wallet();
        let message = "registry.example.com wants you to sign in";
        let signature = wallet.sign_message(message).await.unwrap();

        let check = offline_verifier()
            .verify(message, wallet.address(), &signature.to_string())
            .await
            .unwrap();
        assert_eq!(check, SignatureCheck::Valid);
    }

    #[tokio::test]
    async fn test_wrong_signer_is_invalid() {
        let wallet = test_wallet();
        let other = test_wallet();
        let message = "registry.example.com wants you to sign in";
        let signature = wallet.sign_message(message).await.unwrap();

        let check = offline_verifier()
            .verify(message, other.address(), &signature.to_string())
            .await
            .unwrap();
        assert_eq!(check, SignatureCheck::Invalid);
    }

    #[tokio::test]
    async fn test_mutated_signature_is_invalid() {
        let wallet = test_wallet();
        let message = "registry.example.com wants you to sign in";
        let mut bytes = wallet.sign_message(message).await.unwrap().to_vec();
        bytes[10] ^= 0x01;
        let mutated = format!("0x{}", ethers::utils::hex::encode(bytes));

        let check = offline_verifier()
            .verify(message, wallet.address(), &mutated)
            .await
            .unwrap();
        assert_eq!(check, SignatureCheck::Invalid);
    }

    #[tokio::test]
    async fn test_mutated_message_is_invalid() {
        let wallet = test_wallet();
        let signature = wallet.sign_message("original message").await.unwrap();

        let check = offline_verifier()
            .verify("tampered message", wallet.address(), &signature.to_string())
            .await
            .unwrap();
        assert_eq!(check, SignatureCheck::Invalid);
    }

    #[tokio::test]
    async fn test_garbage_signature_is_invalid_not_error() {
        let wallet = test_wallet();
        for garbage in ["", "0x1234", "not-hex-at-all", "0xzz"] {
            let check = offline_verifier()
                .verify("message", wallet.address(), garbage)
                .await
                .unwrap();
            assert_eq!(check, SignatureCheck::Invalid);
        }
    }

    #[test]
    fn test_erc1271_calldata_layout() {
        let digest = [0xab; 32];
        let signature = [0xcd; 65];
        let calldata = erc1271_calldata(&digest, &signature);

        // selector + two-word head + digest word + bytes offset/len/payload
        assert_eq!(&calldata[..4], &ERC1271_MAGIC);
        assert_eq!(&calldata[4..36], &digest);
        // dynamic bytes offset points past the two head words
        assert_eq!(calldata[4 + 63], 0x40);
    }
}
