//! Adapter layer: the Benefit/Accumulator/Rate source contracts (SPEC_FULL.md
//! §6.3) and a `reqwest`-backed reference implementation.

pub mod auth;
pub mod circuit_breaker;
pub mod error;
pub mod http;
pub mod retry;
pub mod traits;

pub use error::SourceError;
pub use http::{HttpAccumulatorSource, HttpBenefitSource, HttpRateSource};
pub use traits::{AccumulatorSource, BenefitQuery, BenefitSource, RateCriteria, RateSource};
