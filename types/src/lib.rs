//! Shared data model for the cost-share estimator.
//!
//! This crate carries no behavior beyond small derived accessors — the
//! calculation engine (`estimator-engine`), the matcher (`estimator-matcher`)
//! and the orchestrator (`estimator-service`) all build on these shapes.

pub mod accum;
pub mod accumulator;
pub mod benefit;
pub mod money;
pub mod provider;
pub mod rate;

pub use accum::{AccumCode, AccumCodeSet, AccumLevel, AccumLevelSet, AccumulatorCode, AccumulatorLevel};
pub use accumulator::{Accumulator, AccumulatorBundle};
pub use benefit::{Benefit, NetworkCategory, RelatedAccumulatorRef, ServiceProviderEntry};
pub use money::Money;
pub use provider::Provider;
pub use rate::{NegotiatedRate, RateType};
