//! Accumulator kind/level vocabulary shared by benefits, accumulators and the
//! calculation record's `accum_code` / `accum_level` sets.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AccumCode {
    Oopmax,
    Deductible,
    Limit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccumLevel {
    OopmaxFamily,
    OopmaxIndividual,
    DeductibleIndividual,
    DeductibleFamily,
}

pub type AccumCodeSet = HashSet<AccumCode>;
pub type AccumLevelSet = HashSet<AccumLevel>;

/// The accumulator entity's own `code`, as returned by the accumulator
/// source. A superset of [`AccumCode`] — accumulators can carry kinds the
/// engine doesn't reason about directly (e.g. a plain "Limit" counter has no
/// dollar/percent distinction at this layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum AccumulatorCode {
    Deductible,
    #[serde(rename = "OOP Max")]
    #[strum(serialize = "OOP Max")]
    OopMax,
    Limit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum AccumulatorLevel {
    Individual,
    Family,
}
