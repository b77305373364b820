use estimator_types::money::{min_applicable, sub_clamped, zero, Money};

use crate::record::Record;

/// Whether an individual-level OOPM is part of this benefit at all.
pub fn individual_oopm_applies(rec: &Record) -> bool {
    rec.oopmax_individual_calculated.is_some()
}

pub fn family_oopm_applies(rec: &Record) -> bool {
    rec.oopmax_family_calculated.is_some()
}

/// The smaller of the two *applicable* OOPM caps, `None` if neither applies.
pub fn min_applicable_oopm(rec: &Record) -> Option<Money> {
    min_applicable(
        rec.oopmax_individual_calculated.as_ref(),
        rec.oopmax_family_calculated.as_ref(),
    )
}

/// Either applicable OOPM already fully consumed.
pub fn oopm_already_met(rec: &Record) -> bool {
    (family_oopm_applies(rec) && rec.oopmax_family_calculated.as_ref() == Some(&zero()))
        || (individual_oopm_applies(rec) && rec.oopmax_individual_calculated.as_ref() == Some(&zero()))
}

/// Subtract `amount` from both applicable OOPM accumulators, clamped at zero.
pub fn decrement_oopm(rec: &mut Record, amount: &Money) {
    if let Some(v) = rec.oopmax_individual_calculated.as_ref() {
        rec.oopmax_individual_calculated = Some(sub_clamped(v, amount));
    }
    if let Some(v) = rec.oopmax_family_calculated.as_ref() {
        rec.oopmax_family_calculated = Some(sub_clamped(v, amount));
    }
}

/// Zero out both applicable OOPM accumulators.
pub fn zero_oopm(rec: &mut Record) {
    if rec.oopmax_individual_calculated.is_some() {
        rec.oopmax_individual_calculated = Some(zero());
    }
    if rec.oopmax_family_calculated.is_some() {
        rec.oopmax_family_calculated = Some(zero());
    }
}

pub fn deductible_family_applies(rec: &Record) -> bool {
    rec.deductible_family_calculated.is_some()
}

pub fn deductible_individual_applies(rec: &Record) -> bool {
    rec.deductible_individual_calculated.is_some()
}

/// Subtract `amount` from the family deductible, clamped at zero, if present.
pub fn decrement_family_deductible(rec: &mut Record, amount: &Money) {
    if let Some(v) = rec.deductible_family_calculated.as_ref() {
        rec.deductible_family_calculated = Some(sub_clamped(v, amount));
    }
}

pub fn decrement_individual_deductible(rec: &mut Record, amount: &Money) {
    if let Some(v) = rec.deductible_individual_calculated.as_ref() {
        rec.deductible_individual_calculated = Some(sub_clamped(v, amount));
    }
}
