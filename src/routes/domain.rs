//! Domain ownership verification via DNS TXT records.

use std::time::Duration;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use trust_dns_resolver::TokioAsyncResolver;

use crate::auth::middleware::AppState;
use crate::models::{VerifyDomainParams, VerifyDomainResponse};

#[derive(Debug, thiserror::Error)]
enum DnsError {
    #[error("resolver error: {0}")]
    Resolve(#[from] trust_dns_resolver::error::ResolveError),

    #[error("lookup timed out after {0:?}")]
    Timeout(Duration),
}

/// GET /api/verify-domain?domain=<d>&token=<t>
///
/// Succeeds when any TXT record on the domain equals or contains the
/// token. Lookup failures are reported inside a 200 envelope with
/// `verified: false`; only a missing parameter is an HTTP error.
pub async fn verify_domain(
    State(state): State<AppState>,
    Query(params): Query<VerifyDomainParams>,
) -> impl IntoResponse {
    let (Some(domain), Some(token)) = (params.domain, params.token) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(VerifyDomainResponse::failed("Missing domain or token", None)),
        );
    };

    match lookup_txt(&domain, state.config.dns_timeout).await {
        Ok(records) => {
            let verified = any_record_matches(&records, &token);
            tracing::debug!(
                action = "domain_verified",
                domain = %domain,
                records = records.len(),
                verified,
                "TXT lookup completed"
            );
            (StatusCode::OK, Json(VerifyDomainResponse::ok(verified)))
        }
        Err(e) => {
            tracing::warn!(action = "dns_lookup_failed", domain = %domain, error = %e, "DNS lookup failed");
            let detail = state
                .config
                .environment
                .is_development()
                .then(|| e.to_string());
            (
                StatusCode::OK,
                Json(VerifyDomainResponse::failed("DNS lookup failed", detail)),
            )
        }
    }
}

/// Resolve TXT records for `domain` with a bounded timeout. No retries;
/// a single failure surfaces to the caller.
async fn lookup_txt(domain: &str, timeout: Duration) -> Result<Vec<String>, DnsError> {
    let resolver = TokioAsyncResolver::tokio_from_system_conf()?;
    let lookup = tokio::time::timeout(timeout, resolver.txt_lookup(domain.to_string()))
        .await
        .map_err(|_| DnsError::Timeout(timeout))??;
    Ok(lookup.iter().map(|record| record.to_string()).collect())
}

fn any_record_matches(records: &[String], token: &str) -> bool {
    records.iter().any(|record| record.contains(token))
}
