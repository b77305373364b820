//! The eleven decision nodes (SPEC_FULL.md §4.1.2). Each is a plain function
//! `Record -> Result<(Record, Option<NodeId>), EngineError>`: the returned
//! `NodeId` is the successor to hand off to, `None` means terminal. The
//! graph itself — which hand-offs are admissible — lives in [`crate::graph`].

mod coinsurance;
mod copay_simple;
mod helpers;
mod n1;
mod n10;
mod n11;
mod n2;
mod n3;
mod n4;
mod n5;
mod n6;
mod n7;
mod n8;
mod oopm_copay;

use crate::error::EngineError;
use crate::record::{NodeId, Record};

pub fn dispatch(node: NodeId, rec: Record) -> Result<(Record, Option<NodeId>), EngineError> {
    match node {
        NodeId::N1Coverage => n1::run(rec),
        NodeId::N2Limit => n2::run(rec),
        NodeId::N3OopmGate => n3::run(rec),
        NodeId::N4OopmCopay => n4::run(rec),
        NodeId::N5DeductibleGate => n5::run(rec),
        NodeId::N6DeductibleOopm => n6::run(rec),
        NodeId::N7CostShareRouter => n7::run(rec),
        NodeId::N8DeductibleCopay => n8::run(rec),
        NodeId::N9PreDeductibleCopay => {
            // N9 is never dispatched standalone; it only runs as part of
            // N10's composite. Reaching it here would be a graph-wiring
            // bug, not a data problem.
            unreachable!("N9 is only invoked internally by N10")
        }
        NodeId::N10PreDeductibleCostShare => n10::run(rec),
        NodeId::N11Coinsurance => n11::run(rec),
    }
}
