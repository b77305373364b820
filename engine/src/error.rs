use thiserror::Error;

/// Engine-level failures. These are raised before any mutation — a
/// `Record` is never left partially settled (SPEC_FULL.md §7 "Propagation
/// policy").
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("unrecognized limit_type {0:?} (expected \"dollar\" or \"counter\")")]
    UnknownLimitType(String),
    #[error("cost_share_coinsurance {0} out of range 0..=100")]
    CoinsurancePercentOutOfRange(u8),
    #[error("node {0} visited twice in a single run; graph wiring is broken")]
    GraphCycle(&'static str),
}
