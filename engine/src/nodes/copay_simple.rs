use estimator_types::money::zero;

use super::helpers::decrement_oopm;
use crate::record::Record;

/// The core N9 settlement: copay applied with no deductible accumulator in
/// play, only invoked as part of N10's composite (SPEC_FULL.md §4.1.2 N9).
pub fn apply_copay_settlement(rec: &mut Record) {
    let copay = rec.cost_share_copay.clone();
    if copay <= zero() {
        return;
    }
    let s = rec.service_amount.clone();

    if copay > s {
        rec.member_pays = &rec.member_pays + &s;
        if rec.copay_applies_oop {
            decrement_oopm(rec, &s);
        }
        rec.service_amount = zero();
        rec.cost_share_copay = &copay - &s;
    } else {
        rec.member_pays = &rec.member_pays + &copay;
        rec.amount_copay = &rec.amount_copay + &copay;
        if rec.copay_applies_oop {
            decrement_oopm(rec, &copay);
        }
        rec.service_amount = &s - &copay;
        rec.cost_share_copay = zero();
    }
}
