//! EIP-4361 (Sign-In-With-Ethereum) message parsing.
//!
//! A SIWE message is a line-oriented text blob signed by the wallet. The
//! raw text is what gets digested for signature verification; this module
//! only extracts the structured fields the server needs.

use ethers::types::Address;

const HEADER_SUFFIX: &str = " wants you to sign in with your Ethereum account:";
const MIN_NONCE_LEN: usize = 8;

/// A parsed SIWE challenge message. Immutable once parsed.
#[derive(Debug, Clone)]
pub struct SiweMessage {
    pub domain: String,
    /// Claimed signer, parsed and validated.
    pub address: Address,
    /// Address exactly as it appeared in the message (preserves EIP-55
    /// casing for echoing back to the client).
    pub address_raw: String,
    pub statement: Option<String>,
    pub uri: String,
    pub version: String,
    pub chain_id: u64,
    pub nonce: String,
    pub issued_at: String,
    pub expiration_time: Option<String>,
    pub not_before: Option<String>,
    pub request_id: Option<String>,
    pub resources: Vec<String>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("message is empty or truncated")]
    UnexpectedEnd,

    #[error("first line is not a valid SIWE header")]
    MalformedHeader,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid chain id: {0}")]
    InvalidChainId(String),

    #[error("unsupported message version: {0}")]
    UnsupportedVersion(String),

    #[error("invalid nonce: {0}")]
    InvalidNonce(String),
}

impl SiweMessage {
    /// Parse a raw SIWE message.
    ///
    /// Required fields (`URI`, `Version`, `Chain ID`, `Nonce`, `Issued At`)
    /// must appear in grammar order. Temporal fields are carried verbatim
    /// and not enforced here.
    pub fn parse(raw: &str) -> Result<SiweMessage, ParseError> {
        let mut lines = raw.lines();

        let header = lines.next().ok_or(ParseError::UnexpectedEnd)?;
        let domain = header
            .strip_suffix(HEADER_SUFFIX)
            .filter(|d| !d.is_empty())
            .ok_or(ParseError::MalformedHeader)?
            .to_string();

        let address_raw = lines
            .next()
            .ok_or(ParseError::UnexpectedEnd)?
            .trim()
            .to_string();
        let address = address_raw
            .parse::<Address>()
            .map_err(|_| ParseError::InvalidAddress(address_raw.clone()))?;

        let rest: Vec<&str> = lines.collect();

        // Everything between the address and the URI field is the optional
        // statement block (blank separator lines excluded).
        let uri_idx = rest
            .iter()
            .position(|l| l.starts_with("URI: "))
            .ok_or(ParseError::MissingField("URI"))?;
        let statement_lines: Vec<&str> = rest[..uri_idx]
            .iter()
            .copied()
            .filter(|l| !l.trim().is_empty())
            .collect();
        let statement = if statement_lines.is_empty() {
            None
        } else {
            Some(statement_lines.join("\n"))
        };

        let mut fields = rest[uri_idx..].iter().copied();

        let uri = required_field(fields.next(), "URI")?;
        let version = required_field(fields.next(), "Version")?;
        if version != "1" {
            return Err(ParseError::UnsupportedVersion(version));
        }

        let chain_id_raw = required_field(fields.next(), "Chain ID")?;
        let chain_id = chain_id_raw
            .parse::<u64>()
            .map_err(|_| ParseError::InvalidChainId(chain_id_raw))?;

        let nonce = required_field(fields.next(), "Nonce")?;
        if nonce.len() < MIN_NONCE_LEN || !nonce.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ParseError::InvalidNonce(nonce));
        }

        let issued_at = required_field(fields.next(), "Issued At")?;

        let mut expiration_time = None;
        let mut not_before = None;
        let mut request_id = None;
        let mut resources = Vec::new();
        let mut in_resources = false;

        for line in fields {
            if in_resources {
                if let Some(resource) = line.strip_prefix("- ") {
                    resources.push(resource.to_string());
                }
                continue;
            }
            if let Some(v) = line.strip_prefix("Expiration Time: ") {
                expiration_time = Some(v.to_string());
            } else if let Some(v) = line.strip_prefix("Not Before: ") {
                not_before = Some(v.to_string());
            } else if let Some(v) = line.strip_prefix("Request ID: ") {
                request_id = Some(v.to_string());
            } else if line == "Resources:" {
                in_resources = true;
            }
        }

        Ok(SiweMessage {
            domain,
            address,
            address_raw,
            statement,
            uri,
            version,
            chain_id,
            nonce,
            issued_at,
            expiration_time,
            not_before,
            request_id,
            resources,
        })
    }
}

/// Extract `"{name}: value"` from a line, erroring when the line is absent
/// or carries a different field.
fn required_field(line: Option<&str>, name: &'static str) -> Result<String, ParseError> {
    let line = line.ok_or(ParseError::MissingField(name))?;
    let prefix = format!("{}: ", name);
    line.strip_prefix(&prefix)
        .map(str::to_string)
        .ok_or(ParseError::MissingField(name))
}
