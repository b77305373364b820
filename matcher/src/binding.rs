//! Accumulator binding (SPEC_FULL.md §4.2 "Accumulator binding"): for each
//! `relatedAccumulator` reference on a surviving benefit, find the first
//! member accumulator that matches on code, level, and the three optional
//! qualifier codes.

use std::str::FromStr;

use estimator_types::{Accumulator, AccumulatorCode, AccumulatorLevel, Benefit, RelatedAccumulatorRef};

/// Binds every `related_accumulators` entry on `benefit` to the first
/// matching accumulator in `accumulators`. A reference with no match is
/// simply dropped from the result — the engine defaults the corresponding
/// field to null rather than erroring (SPEC_FULL.md §4.2).
pub fn bind(benefit: &Benefit, accumulators: &[Accumulator]) -> Vec<Accumulator> {
    benefit
        .related_accumulators
        .iter()
        .filter_map(|r| find_match(r, accumulators))
        .cloned()
        .collect()
}

fn find_match<'a>(r: &RelatedAccumulatorRef, accumulators: &'a [Accumulator]) -> Option<&'a Accumulator> {
    let code = normalize_code(&r.code);
    let wanted_code = AccumulatorCode::from_str(&code).ok()?;
    let wanted_level = AccumulatorLevel::from_str(&r.level).ok()?;

    accumulators.iter().find(|a| {
        a.code == wanted_code
            && a.level == wanted_level
            && optional_matches(a.network_indicator_code.as_deref(), r.network_indicator_code.as_deref())
            && qualifier_matches(a.accum_ex_code.as_deref(), r.accum_ex_code.as_deref())
            && qualifier_matches(a.deductible_code.as_deref(), r.deductible_code.as_deref())
    })
}

fn normalize_code(raw: &str) -> String {
    if raw.trim().is_empty() {
        "Limit".to_string()
    } else {
        raw.to_string()
    }
}

/// Plain optional equality, used for `networkIndicatorCode`.
fn optional_matches(a: Option<&str>, r: Option<&str>) -> bool {
    a == r
}

/// `accumExCode` / `deductibleCode` qualifier rule: matches on equality, or
/// when the reference side is absent/empty and the accumulator side is null
/// (SPEC_FULL.md §4.2).
fn qualifier_matches(a: Option<&str>, r: Option<&str>) -> bool {
    if a == r {
        return true;
    }
    let r_is_empty = match r {
        None => true,
        Some(v) => v.is_empty(),
    };
    r_is_empty && a.is_none()
}
