//! The Benefit entity, as returned by the benefit source (SPEC_FULL.md §3.2, §6.3).

use crate::money::Money;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkCategory {
    InNetwork,
    OutOfNetwork,
}

impl NetworkCategory {
    pub fn is_out_of_network(self) -> bool {
        matches!(self, NetworkCategory::OutOfNetwork)
    }
}

/// One `relatedAccumulator` reference on a benefit: which member accumulator
/// this benefit's cost-share rules must consult (SPEC_FULL.md §4.2 "Accumulator
/// binding"). `code` is matched verbatim against an empty string treated as
/// `"Limit"` by the matcher, so it is kept as a raw `String` here rather than
/// the closed [`crate::accum::AccumCode`] enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedAccumulatorRef {
    pub code: String,
    pub level: String,
    #[serde(default)]
    pub deductible_code: Option<String>,
    #[serde(default)]
    pub accum_ex_code: Option<String>,
    #[serde(default)]
    pub network_indicator_code: Option<String>,
}

/// One entry of a benefit's `serviceProvider` list. The matcher's designation
/// parity rule consults the first entry with a non-empty `provider_designation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServiceProviderEntry {
    #[serde(default)]
    pub provider_designation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Benefit {
    pub network_category: NetworkCategory,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub service_provider: Vec<ServiceProviderEntry>,

    pub is_service_covered: bool,

    #[serde(default)]
    pub cost_share_copay: Money,
    /// Integer percent in 0..100; values outside that range are a
    /// configuration error surfaced by the engine's N11, not here.
    #[serde(default)]
    pub cost_share_coinsurance: u8,

    #[serde(default)]
    pub is_deductible_before_copay: bool,
    #[serde(default)]
    pub copay_applies_oop: bool,
    #[serde(default)]
    pub coins_applies_oop: bool,
    #[serde(default)]
    pub deductible_applies_oop: bool,
    #[serde(default)]
    pub copay_count_to_deductible: bool,
    #[serde(default)]
    pub copay_continue_when_deductible_met: bool,
    #[serde(default)]
    pub copay_continue_when_oop_met: bool,

    /// `"dollar"` | `"counter"` | anything else. Kept as a raw, lowercased
    /// string: an unrecognized value is a *runtime* `EngineConfig` error
    /// raised by N2, not a deserialization failure (SPEC_FULL.md §4.1.2 N2).
    #[serde(default)]
    pub limit_type: Option<String>,

    #[serde(default)]
    pub individuals_met: Option<u32>,
    #[serde(default)]
    pub individuals_needed: Option<u32>,

    #[serde(default)]
    pub related_accumulators: Vec<RelatedAccumulatorRef>,
}

impl Benefit {
    /// The benefit's provider designation: the first non-empty
    /// `service_provider[].provider_designation` entry, if any.
    pub fn designation(&self) -> Option<&str> {
        self.service_provider
            .iter()
            .filter_map(|sp| sp.provider_designation.as_deref())
            .find(|d| !d.is_empty())
    }
}
