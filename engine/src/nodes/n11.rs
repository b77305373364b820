use super::coinsurance::apply_coinsurance;
use crate::error::EngineError;
use crate::record::{NodeId, Record};

/// N11 Coinsurance (SPEC_FULL.md §4.1.2), the standalone node reached from
/// N6, N7 or N8.
pub fn run(mut rec: Record) -> Result<(Record, Option<NodeId>), EngineError> {
    apply_coinsurance(&mut rec)?;
    rec.calculation_complete = true;
    rec.push_trace(NodeId::N11Coinsurance, "settled", None);
    Ok((rec, None))
}
