use estimator_types::money::zero;

use super::helpers::{decrement_family_deductible, decrement_individual_deductible, decrement_oopm};
use crate::error::EngineError;
use crate::record::{NodeId, Record};

/// N6 Deductible-OOPM (SPEC_FULL.md §4.1.2).
///
/// `d` is `deductible_individual_calculated`; if the benefit tracks only a
/// family deductible (no individual accumulator bound) `d` defaults to zero,
/// which degenerates to "deductible already met" on the individual axis —
/// see DESIGN.md for this edge-case decision.
pub fn run(mut rec: Record) -> Result<(Record, Option<NodeId>), EngineError> {
    let d = rec.deductible_individual_calculated.clone().unwrap_or_else(zero);
    let s = rec.service_amount.clone();

    if s < d {
        rec.member_pays = &rec.member_pays + &s;
        decrement_individual_deductible(&mut rec, &s);
        decrement_family_deductible(&mut rec, &s);
        if rec.deductible_applies_oop {
            decrement_oopm(&mut rec, &s);
        }
        rec.service_amount = zero();
        rec.calculation_complete = true;
        rec.push_trace(NodeId::N6DeductibleOopm, "deductible_partial", Some(s));
        return Ok((rec, None));
    }

    rec.member_pays = &rec.member_pays + &d;
    rec.deductible_individual_calculated = Some(zero());
    decrement_family_deductible(&mut rec, &d);
    if rec.deductible_applies_oop {
        decrement_oopm(&mut rec, &d);
    }
    rec.service_amount = &s - &d;
    rec.push_trace(NodeId::N6DeductibleOopm, "deductible_exhausted", Some(d));

    let next = if rec.is_deductible_before_copay {
        NodeId::N7CostShareRouter
    } else {
        NodeId::N11Coinsurance
    };
    Ok((rec, Some(next)))
}
