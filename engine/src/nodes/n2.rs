use estimator_types::money::{sub_clamped, zero, Money};

use super::helpers::{individual_oopm_applies, family_oopm_applies};
use super::oopm_copay::apply_oopm_copay;
use crate::error::EngineError;
use crate::record::{NodeId, Record};
use estimator_types::AccumCode;

/// Mirrors N3's gate condition, but only to decide whether to run the N4
/// copay-continuation settlement inline — used solely by N2's dollar-limit
/// branch so that an already-met OOPM is not silently skipped while a limit
/// is in force (SPEC_FULL.md §4.1.2 N2 "Before applying...").
fn presettle_oopm_if_met(rec: &mut Record) {
    if !rec.accum_code.contains(&AccumCode::Oopmax) {
        return;
    }
    let family_met = family_oopm_applies(rec) && rec.oopmax_family_calculated == Some(zero());
    let individual_met = individual_oopm_applies(rec) && rec.oopmax_individual_calculated == Some(zero());
    if family_met || individual_met {
        apply_oopm_copay(rec);
    }
}

/// N2 Limit (SPEC_FULL.md §4.1.2).
pub fn run(mut rec: Record) -> Result<(Record, Option<NodeId>), EngineError> {
    if !rec.accum_code.contains(&AccumCode::Limit) {
        rec.push_trace(NodeId::N2Limit, "no_limit", None);
        return Ok((rec, Some(NodeId::N3OopmGate)));
    }

    let limit = rec.limit_calculated.clone();
    if limit.is_none() || limit == Some(zero()) {
        let s = rec.service_amount.clone();
        rec.member_pays = &rec.member_pays + &s;
        rec.service_amount = zero();
        rec.calculation_complete = true;
        rec.push_trace(NodeId::N2Limit, "limit_exhausted", Some(s));
        return Ok((rec, None));
    }
    let limit = limit.unwrap();

    match rec.limit_type.as_deref() {
        Some("dollar") => {
            presettle_oopm_if_met(&mut rec);
            if rec.service_amount > limit {
                let excess: Money = sub_clamped(&rec.service_amount, &limit);
                rec.member_pays = &rec.member_pays + &excess;
                rec.service_amount = zero();
                rec.limit_calculated = Some(zero());
                rec.push_trace(NodeId::N2Limit, "dollar_limit_exceeded", Some(excess));
            } else {
                let new_limit = sub_clamped(&limit, &rec.service_amount);
                rec.limit_calculated = Some(new_limit);
                rec.service_amount = zero();
                rec.push_trace(NodeId::N2Limit, "dollar_limit_absorbed", None);
            }
            rec.calculation_complete = true;
            Ok((rec, None))
        }
        Some("counter") => {
            let new_count = sub_clamped(&limit, &Money::from(1));
            rec.limit_calculated = Some(new_count);
            rec.calculation_complete = true;
            rec.push_trace(NodeId::N2Limit, "counter_consumed", None);
            Ok((rec, None))
        }
        other => Err(EngineError::UnknownLimitType(
            other.unwrap_or_default().to_string(),
        )),
    }
}
