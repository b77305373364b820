//! Decimal dollar amounts.
//!
//! The engine never touches `f64`: every dollar figure in the system is a
//! [`BigDecimal`], compared and subtracted exactly. See SPEC_FULL.md §4.1.2
//! ("Tie-breaks and numeric semantics").

use bigdecimal::BigDecimal;
use std::ops::Sub;

pub type Money = BigDecimal;

/// `a - b`, clamped at zero. Never produces a negative `Money`.
///
/// Nodes must clamp by construction rather than subtract-then-check, per
/// invariant 2 of SPEC_FULL.md §3.1.
pub fn sub_clamped(a: &Money, b: &Money) -> Money {
    if b >= a {
        Money::from(0)
    } else {
        a.sub(b)
    }
}

/// The lesser of two optional caps, treating `None` as "not applicable" and
/// therefore never the minimum unless both are `None`.
pub fn min_applicable(a: Option<&Money>, b: Option<&Money>) -> Option<Money> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if a <= b { a.clone() } else { b.clone() }),
        (Some(a), None) => Some(a.clone()),
        (None, Some(b)) => Some(b.clone()),
        (None, None) => None,
    }
}

/// The lesser of two (always-applicable) amounts.
pub fn min2(a: &Money, b: &Money) -> Money {
    if a <= b {
        a.clone()
    } else {
        b.clone()
    }
}

pub fn zero() -> Money {
    Money::from(0)
}

pub fn is_zero_or_less(m: &Money) -> bool {
    m <= &zero()
}
