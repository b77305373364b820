//! The Accumulator entity, as returned by the accumulator source (SPEC_FULL.md §3.2).

use crate::accum::{AccumulatorCode, AccumulatorLevel};
use crate::money::{sub_clamped, Money};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Accumulator {
    pub code: AccumulatorCode,
    pub level: AccumulatorLevel,
    #[serde(default)]
    pub deductible_code: Option<String>,
    #[serde(default)]
    pub accum_ex_code: Option<String>,
    #[serde(default)]
    pub network_indicator_code: Option<String>,

    pub limit_value: Money,
    pub current_value: Money,
}

impl Accumulator {
    /// `limit - current`, clamped at zero.
    pub fn calculated_value(&self) -> Money {
        sub_clamped(&self.limit_value, &self.current_value)
    }
}

/// All of a member's accumulators for a request, as returned in one shot by
/// the accumulator source.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AccumulatorBundle {
    pub accumulators: Vec<Accumulator>,
}
