use estimator_types::money::{min2, zero};

use crate::record::Record;

/// The core N4 settlement: copay continuation once OOPM has already been met
/// (SPEC_FULL.md §4.1.2 N4). Reusable from the standalone N4 node and from
/// N2's "settle OOPM before applying the dollar limit" pre-step, and from
/// N8's copay-then-OOPM-met continuation.
pub fn apply_oopm_copay(rec: &mut Record) {
    if rec.cost_share_copay <= zero() || !rec.copay_continue_when_oop_met {
        return;
    }
    let c = min2(&rec.cost_share_copay, &rec.service_amount);
    rec.member_pays = &rec.member_pays + &c;
    rec.amount_copay = &rec.amount_copay + &c;
    rec.service_amount = &rec.service_amount - &c;
    rec.cost_share_copay = &rec.cost_share_copay - &c;
}
