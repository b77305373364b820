//! Error taxonomy (SPEC_FULL.md §7) mapped onto HTTP status codes at the
//! outermost boundary — everywhere else in the crate a closed `thiserror`
//! enum, matching the teacher's `forest_key_management::Error` style.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use estimator_engine::EngineError;
use estimator_sources::SourceError;

#[derive(Debug, Error, Clone)]
pub enum ServiceError {
    #[error("malformed request: {0}")]
    RequestInvalid(String),
    #[error("member not found")]
    MemberNotFound,
    #[error("no benefit catalog for this query")]
    BenefitsNotFound,
    #[error("no negotiated rate for this provider/service")]
    RateMissing,
    #[error("upstream source unavailable: {0}")]
    SourceUnavailable(String),
    #[error("upstream authentication expired")]
    AuthExpired,
    #[error("engine configuration error: {0}")]
    EngineConfig(String),
    #[error("request deadline exceeded")]
    Cancelled,
}

impl ServiceError {
    /// The taxonomy kind name (SPEC_FULL.md §7), surfaced verbatim in the
    /// `exception.code` field of an error entry.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::RequestInvalid(_) => "RequestInvalid",
            ServiceError::MemberNotFound => "MemberNotFound",
            ServiceError::BenefitsNotFound => "BenefitsNotFound",
            ServiceError::RateMissing => "RateMissing",
            ServiceError::SourceUnavailable(_) => "SourceUnavailable",
            ServiceError::AuthExpired => "AuthExpired",
            ServiceError::EngineConfig(_) => "EngineConfig",
            ServiceError::Cancelled => "Cancelled",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ServiceError::RequestInvalid(_) => StatusCode::BAD_REQUEST,
            ServiceError::MemberNotFound => StatusCode::NOT_FOUND,
            ServiceError::BenefitsNotFound => StatusCode::NOT_FOUND,
            ServiceError::RateMissing => StatusCode::NOT_FOUND,
            ServiceError::SourceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::AuthExpired => StatusCode::BAD_GATEWAY,
            ServiceError::EngineConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl From<SourceError> for ServiceError {
    fn from(error: SourceError) -> Self {
        match error {
            SourceError::BenefitsNotFound => ServiceError::BenefitsNotFound,
            SourceError::MemberNotFound(_) => ServiceError::MemberNotFound,
            SourceError::Transport { .. } | SourceError::UnexpectedStatus { .. } | SourceError::CircuitOpen(_) => {
                ServiceError::SourceUnavailable(error.to_string())
            }
            SourceError::AuthExpired | SourceError::AuthFailure(_) => ServiceError::AuthExpired,
            SourceError::Decode(_) => ServiceError::SourceUnavailable(error.to_string()),
        }
    }
}

impl From<EngineError> for ServiceError {
    fn from(error: EngineError) -> Self {
        ServiceError::EngineConfig(error.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "code": self.code(), "message": self.to_string() }));
        (status, body).into_response()
    }
}
