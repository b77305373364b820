use super::helpers::oopm_already_met;
use crate::error::EngineError;
use crate::record::{NodeId, Record};
use estimator_types::AccumCode;

/// N3 OOPM-Gate (SPEC_FULL.md §4.1.2).
pub fn run(mut rec: Record) -> Result<(Record, Option<NodeId>), EngineError> {
    if !rec.accum_code.contains(&AccumCode::Oopmax) {
        rec.push_trace(NodeId::N3OopmGate, "no_oopmax", None);
        return Ok((rec, Some(NodeId::N5DeductibleGate)));
    }
    if oopm_already_met(&rec) {
        rec.push_trace(NodeId::N3OopmGate, "oopm_met", None);
        return Ok((rec, Some(NodeId::N4OopmCopay)));
    }
    rec.push_trace(NodeId::N3OopmGate, "oopm_not_met", None);
    Ok((rec, Some(NodeId::N5DeductibleGate)))
}
