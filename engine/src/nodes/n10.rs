use estimator_types::money::zero;

use super::coinsurance::apply_coinsurance;
use super::copay_simple::apply_copay_settlement;
use crate::error::EngineError;
use crate::record::{NodeId, Record};

/// N10 Pre-Deductible Cost Share (SPEC_FULL.md §4.1.2): composite of N9
/// (copay, no deductible in play) followed by N11 (coinsurance) on the
/// residual. Only reached from N5 when the benefit has no deductible
/// accumulator at all.
pub fn run(mut rec: Record) -> Result<(Record, Option<NodeId>), EngineError> {
    if rec.cost_share_copay > zero() {
        apply_copay_settlement(&mut rec);
        rec.push_trace(NodeId::N9PreDeductibleCopay, "copay_settled", None);
    }
    if rec.cost_share_coinsurance > 0 && rec.service_amount > zero() {
        apply_coinsurance(&mut rec)?;
        rec.push_trace(NodeId::N11Coinsurance, "coinsurance_settled", None);
    }
    rec.calculation_complete = true;
    rec.push_trace(NodeId::N10PreDeductibleCostShare, "complete", None);
    Ok((rec, None))
}
