use estimator_types::money::zero;

use super::helpers::{
    decrement_family_deductible, decrement_individual_deductible, decrement_oopm,
    family_oopm_applies, individual_oopm_applies, min_applicable_oopm, zero_oopm,
};
use crate::error::EngineError;
use crate::record::{NodeId, Record};

/// N8 Deductible-CoPay (SPEC_FULL.md §4.1.2). The most intricate node: copay
/// applied while the deductible is still "in view" — either not yet met
/// with copay-first ordering, or just met with continuation enabled.
pub fn run(mut rec: Record) -> Result<(Record, Option<NodeId>), EngineError> {
    // a. OOPM already met on an applicable axis: no copay charged.
    let family_met = family_oopm_applies(&rec) && rec.oopmax_family_calculated == Some(zero());
    let individual_met =
        individual_oopm_applies(&rec) && rec.oopmax_individual_calculated == Some(zero());
    if family_met || individual_met {
        rec.calculation_complete = true;
        rec.push_trace(NodeId::N8DeductibleCopay, "oopm_already_met", None);
        return Ok((rec, None));
    }

    let copay = rec.cost_share_copay.clone();
    let s = rec.service_amount.clone();

    if !rec.copay_applies_oop {
        if copay > s {
            rec.member_pays = &rec.member_pays + &s;
            rec.amount_copay = &rec.amount_copay + &s;
            rec.service_amount = zero();
            rec.cost_share_copay = &copay - &s;
            rec.calculation_complete = true;
            rec.push_trace(NodeId::N8DeductibleCopay, "copay_exceeds_service", Some(s));
            return Ok((rec, None));
        }
        rec.member_pays = &rec.member_pays + &copay;
        rec.amount_copay = &rec.amount_copay + &copay;
        rec.service_amount = &s - &copay;
        rec.cost_share_copay = zero();
        rec.push_trace(NodeId::N8DeductibleCopay, "copay_settled_no_oop", Some(copay.clone()));
        return route_after_copay(rec, &copay);
    }

    // copay_applies_oop == true from here on.
    let min_oop = min_applicable_oopm(&rec);

    if copay > s {
        match &min_oop {
            Some(cap) if &s >= cap => {
                rec.member_pays = &rec.member_pays + cap;
                rec.amount_copay = &rec.amount_copay + cap;
                rec.cost_share_copay = &copay - cap;
                rec.service_amount = &s - cap;
                zero_oopm(&mut rec);
                rec.push_trace(NodeId::N8DeductibleCopay, "copay_capped_by_oop", Some(cap.clone()));
                return Ok((rec, Some(NodeId::N4OopmCopay)));
            }
            _ => {
                rec.member_pays = &rec.member_pays + &s;
                rec.amount_copay = &rec.amount_copay + &s;
                decrement_oopm(&mut rec, &s);
                rec.service_amount = zero();
                rec.cost_share_copay = &copay - &s;
                rec.calculation_complete = true;
                rec.push_trace(NodeId::N8DeductibleCopay, "copay_exceeds_service_oop", Some(s));
                return Ok((rec, None));
            }
        }
    }

    // copay <= s
    if let Some(cap) = &min_oop {
        if &copay >= cap {
            rec.member_pays = &rec.member_pays + cap;
            rec.amount_copay = &rec.amount_copay + cap;
            rec.cost_share_copay = &copay - cap;
            rec.service_amount = &s - cap;
            zero_oopm(&mut rec);
            rec.push_trace(NodeId::N8DeductibleCopay, "copay_caps_oop", Some(cap.clone()));
            return Ok((rec, Some(NodeId::N4OopmCopay)));
        }
    }

    rec.member_pays = &rec.member_pays + &copay;
    rec.amount_copay = &rec.amount_copay + &copay;
    decrement_oopm(&mut rec, &copay);
    rec.service_amount = &s - &copay;
    rec.cost_share_copay = zero();
    rec.push_trace(NodeId::N8DeductibleCopay, "copay_settled_oop", Some(copay.clone()));
    route_after_copay(rec, &copay)
}

/// Shared tail of branches (b)-else and (d)-else: route to N11 if copay runs
/// before deductible, else optionally count the copay toward the deductible
/// and always continue to N6.
fn route_after_copay(
    mut rec: Record,
    copay_paid: &estimator_types::Money,
) -> Result<(Record, Option<NodeId>), EngineError> {
    if rec.is_deductible_before_copay {
        return Ok((rec, Some(NodeId::N11Coinsurance)));
    }
    if rec.copay_count_to_deductible {
        decrement_individual_deductible(&mut rec, copay_paid);
        decrement_family_deductible(&mut rec, copay_paid);
    }
    Ok((rec, Some(NodeId::N6DeductibleOopm)))
}
