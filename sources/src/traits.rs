//! The three source contracts (SPEC_FULL.md §6.3). Kept as small
//! `async_trait` interfaces, mirroring the teacher's `Provider` trait
//! (`blockchain/message_pool/src/msgpool/provider.rs`) — callers depend on
//! the trait object, never on the concrete `reqwest` adapter.

use async_trait::async_trait;
use estimator_types::{AccumulatorBundle, Benefit, NegotiatedRate};

use crate::error::SourceError;

#[derive(Debug, Clone)]
pub struct BenefitQuery {
    pub zip_code: String,
    pub benefit_product_type: String,
    pub service_code: String,
    pub service_type: String,
    pub place_of_service_code: String,
}

#[derive(Debug, Clone)]
pub struct RateCriteria {
    pub provider_id: String,
    pub network_id: String,
    pub service_code: String,
}

/// Returns the full benefit catalog applicable to one query; the Matcher
/// then filters it per provider.
#[async_trait]
pub trait BenefitSource: Send + Sync {
    async fn get_benefit(&self, query: &BenefitQuery) -> Result<Vec<Benefit>, SourceError>;
}

/// Returns all of a member's accumulators in one call.
#[async_trait]
pub trait AccumulatorSource: Send + Sync {
    async fn get_accumulators(&self, membership_id: &str) -> Result<AccumulatorBundle, SourceError>;
}

/// Returns the negotiated rate for one provider/service pair. A rate that
/// simply doesn't exist is an in-band `found = false`, not a `SourceError`.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn get_rate(&self, criteria: &RateCriteria) -> Result<NegotiatedRate, SourceError>;
}
