//! The fixed node transition table (SPEC_FULL.md §4.1.3). A `Record` enters
//! at N1 and is driven through successive `dispatch` calls until a node
//! returns `None` (terminal) or sets `calculation_complete`.

use std::collections::HashSet;

use crate::error::EngineError;
use crate::nodes::dispatch;
use crate::record::{NodeId, Record};

pub fn run(mut rec: Record) -> Result<Record, EngineError> {
    let mut current = NodeId::N1Coverage;
    let mut visited = HashSet::new();

    loop {
        if rec.calculation_complete {
            return Ok(rec);
        }
        if !visited.insert(current) {
            return Err(EngineError::GraphCycle(current.as_str()));
        }

        let (next_rec, next) = dispatch(current, rec)?;
        rec = next_rec;

        match next {
            Some(node) => current = node,
            None => return Ok(rec),
        }
    }
}
