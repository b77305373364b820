//! Errors an adapter can raise, mapped by `estimator-service` into the
//! taxonomy of SPEC_FULL.md §7.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("benefit catalog not found for this query")]
    BenefitsNotFound,
    #[error("member not found: {0}")]
    MemberNotFound(String),
    #[error("transport error calling {endpoint}: {source}")]
    Transport { endpoint: String, #[source] source: reqwest::Error },
    #[error("{endpoint} returned {status}")]
    UnexpectedStatus { endpoint: String, status: u16 },
    #[error("circuit open for {0}")]
    CircuitOpen(String),
    #[error("authentication expired")]
    AuthExpired,
    #[error("failed to obtain bearer token: {0}")]
    AuthFailure(String),
    #[error("response body did not match the expected shape: {0}")]
    Decode(#[from] serde_json::Error),
}
