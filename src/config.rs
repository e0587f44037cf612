use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Fixed development fallback secret. Refused at startup in production mode.
const DEV_JWT_SECRET: &str = "dev-secret-key-change-in-production";

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_SESSION_TTL_SECS: u64 = 86_400;
const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 5;
const DEFAULT_DNS_TIMEOUT_SECS: u64 = 5;

/// Deployment mode, selected via `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{}'", other)),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub environment: Environment,

    // Server
    pub bind_addr: SocketAddr,

    // Session signing
    pub jwt_secret: String,
    pub session_ttl_secs: u64,

    // Optional JSON-RPC endpoint for contract-wallet (ERC-1271) verification
    pub rpc_url: Option<String>,

    // Bounded timeouts for external calls
    pub verify_timeout: Duration,
    pub dns_timeout: Duration,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("environment", &self.environment)
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"[REDACTED]")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("rpc_url", &self.rpc_url.as_ref().map(|_| "[REDACTED]"))
            .field("verify_timeout", &self.verify_timeout)
            .field("dns_timeout", &self.dns_timeout)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Attempt to load .env file, but don't fail if it doesn't exist
        // (env vars may be set directly in production)
        let _ = dotenvy::dotenv();

        let environment = match env::var("APP_ENV") {
            Ok(raw) => raw
                .parse::<Environment>()
                .map_err(|e| ConfigError::InvalidValue("APP_ENV".to_string(), e))?,
            Err(_) => Environment::Development,
        };

        let port = parse_var("PORT", DEFAULT_PORT)?;
        let bind_addr = SocketAddr::from(([0, 0, 0, 0], port));

        let jwt_secret = resolve_jwt_secret(environment, env::var("JWT_SECRET").ok())?;

        let session_ttl_secs = parse_var("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;
        if session_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let rpc_url = env::var("RPC_URL").ok().filter(|u| !u.is_empty());

        let verify_timeout =
            Duration::from_secs(parse_var("VERIFY_TIMEOUT_SECS", DEFAULT_VERIFY_TIMEOUT_SECS)?);
        let dns_timeout =
            Duration::from_secs(parse_var("DNS_TIMEOUT_SECS", DEFAULT_DNS_TIMEOUT_SECS)?);

        Ok(Config {
            environment,
            bind_addr,
            jwt_secret,
            session_ttl_secs,
            rpc_url,
            verify_timeout,
            dns_timeout,
        })
    }
}

/// Resolve the session-signing secret.
///
/// Production refuses to start without an explicit, non-empty `JWT_SECRET`.
/// Development falls back to a fixed non-secret literal.
fn resolve_jwt_secret(
    environment: Environment,
    raw: Option<String>,
) -> Result<String, ConfigError> {
    match raw.filter(|s| !s.is_empty()) {
        Some(secret) => Ok(secret),
        None if environment.is_development() => {
            tracing::warn!("JWT_SECRET not set, using development fallback secret");
            Ok(DEV_JWT_SECRET.to_string())
        }
        None => Err(ConfigError::MissingVar("JWT_SECRET".to_string())),
    }
}

/// Parse an optional env var, falling back to a default when unset.
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::ParseError(name.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}
