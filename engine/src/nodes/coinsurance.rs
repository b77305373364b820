use estimator_types::money::{zero, Money};

use super::helpers::{decrement_oopm, min_applicable_oopm, oopm_already_met, zero_oopm};
use crate::error::EngineError;
use crate::record::Record;

/// The core N11 settlement, reusable from the standalone N11 node and from
/// N10's "coinsurance on the residual" composite step (SPEC_FULL.md §4.1.2
/// N11 / N10).
pub fn apply_coinsurance(rec: &mut Record) -> Result<(), EngineError> {
    let p = rec.cost_share_coinsurance;
    if p > 100 {
        return Err(EngineError::CoinsurancePercentOutOfRange(p));
    }
    if p == 0 {
        return Ok(());
    }

    let pct = Money::from(p);
    let hundred = Money::from(100);
    let c: Money = (&rec.service_amount * &pct) / &hundred;

    if !rec.coins_applies_oop {
        rec.member_pays = &rec.member_pays + &c;
        rec.amount_coinsurance = &rec.amount_coinsurance + &c;
        rec.service_amount = &rec.service_amount - &c;
        return Ok(());
    }

    if oopm_already_met(rec) {
        // Re-anchors member_pays to zero, overwriting prior accumulation on
        // this record. Intentional — see SPEC_FULL.md §9 open question 1.
        rec.member_pays = zero();
        return Ok(());
    }

    match min_applicable_oopm(rec) {
        None => {
            // coins_applies_oop is set but no OOPM accumulator is actually
            // present on this benefit: there is no cap to apply.
            rec.member_pays = &rec.member_pays + &c;
            rec.amount_coinsurance = &rec.amount_coinsurance + &c;
            rec.service_amount = &rec.service_amount - &c;
        }
        Some(cap) if c < cap => {
            rec.member_pays = &rec.member_pays + &c;
            rec.amount_coinsurance = &rec.amount_coinsurance + &c;
            decrement_oopm(rec, &c);
            rec.service_amount = &rec.service_amount - &c;
        }
        Some(cap) => {
            rec.member_pays = &rec.member_pays + &cap;
            rec.amount_coinsurance = &rec.amount_coinsurance + &cap;
            zero_oopm(rec);
            rec.service_amount = &rec.service_amount - &cap;
        }
    }
    Ok(())
}
