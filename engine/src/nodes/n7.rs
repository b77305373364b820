use estimator_types::money::zero;

use crate::error::EngineError;
use crate::record::{NodeId, Record};

/// N7 Cost-Share Router (SPEC_FULL.md §4.1.2).
pub fn run(mut rec: Record) -> Result<(Record, Option<NodeId>), EngineError> {
    if rec.copay_continue_when_deductible_met && rec.cost_share_copay > zero() {
        rec.push_trace(NodeId::N7CostShareRouter, "copay_continues", None);
        return Ok((rec, Some(NodeId::N8DeductibleCopay)));
    }
    rec.push_trace(NodeId::N7CostShareRouter, "to_coinsurance", None);
    Ok((rec, Some(NodeId::N11Coinsurance)))
}
