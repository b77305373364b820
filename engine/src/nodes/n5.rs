use estimator_types::money::zero;

use super::helpers::{deductible_family_applies, deductible_individual_applies};
use crate::error::EngineError;
use crate::record::{NodeId, Record};
use estimator_types::AccumCode;

/// N5 Deductible-Gate (SPEC_FULL.md §4.1.2).
pub fn run(mut rec: Record) -> Result<(Record, Option<NodeId>), EngineError> {
    if !rec.accum_code.contains(&AccumCode::Deductible) {
        rec.push_trace(NodeId::N5DeductibleGate, "no_deductible", None);
        return Ok((rec, Some(NodeId::N10PreDeductibleCostShare)));
    }

    let family_met = deductible_family_applies(&rec) && rec.deductible_family_calculated == Some(zero());
    let individual_met =
        deductible_individual_applies(&rec) && rec.deductible_individual_calculated == Some(zero());

    if family_met || rec.embedded_deductible_satisfied() || individual_met {
        rec.push_trace(NodeId::N5DeductibleGate, "deductible_met", None);
        return Ok((rec, Some(NodeId::N7CostShareRouter)));
    }

    if !rec.is_deductible_before_copay && rec.cost_share_copay > zero() {
        rec.push_trace(NodeId::N5DeductibleGate, "copay_before_deductible", None);
        return Ok((rec, Some(NodeId::N8DeductibleCopay)));
    }

    rec.push_trace(NodeId::N5DeductibleGate, "deductible_not_met", None);
    Ok((rec, Some(NodeId::N6DeductibleOopm)))
}
