use estimator_types::money::zero;

use crate::error::EngineError;
use crate::record::{NodeId, Record};

/// N1 Coverage (SPEC_FULL.md §4.1.2).
pub fn run(mut rec: Record) -> Result<(Record, Option<NodeId>), EngineError> {
    if !rec.is_service_covered {
        let s = rec.service_amount.clone();
        rec.member_pays = &rec.member_pays + &s;
        rec.service_amount = zero();
        rec.calculation_complete = true;
        rec.push_trace(NodeId::N1Coverage, "not_covered", Some(s));
        return Ok((rec, None));
    }
    rec.push_trace(NodeId::N1Coverage, "covered", None);
    Ok((rec, Some(NodeId::N2Limit)))
}
