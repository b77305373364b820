use super::oopm_copay::apply_oopm_copay;
use crate::error::EngineError;
use crate::record::{NodeId, Record};

/// N4 OOPM-Copay (SPEC_FULL.md §4.1.2).
pub fn run(mut rec: Record) -> Result<(Record, Option<NodeId>), EngineError> {
    apply_oopm_copay(&mut rec);
    rec.calculation_complete = true;
    rec.push_trace(NodeId::N4OopmCopay, "settled", None);
    Ok((rec, None))
}
