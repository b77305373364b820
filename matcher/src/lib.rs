//! Benefit/accumulator matcher (SPEC_FULL.md §4.2).
//!
//! Filters a benefit catalog down to the candidates applicable to one
//! provider, then binds each surviving benefit to the member accumulators
//! its cost-share rules must consult. Pure and synchronous: no I/O, callable
//! directly from the orchestrator's CPU-bound worker pool.

mod binding;
mod filters;

use std::collections::HashSet;

use estimator_types::{Accumulator, Benefit, Provider};

/// One benefit that survived filtering, together with the accumulators the
/// engine should consult for it.
pub struct SelectedBenefit<'a> {
    pub benefit: &'a Benefit,
    pub matched_accumulators: Vec<Accumulator>,
}

/// Filters `benefits` against `provider` and binds accumulators for every
/// survivor, preserving the catalog's original order (SPEC_FULL.md §4.2,
/// P7 matcher idempotence).
pub fn select<'a>(
    benefits: &'a [Benefit],
    accumulators: &[Accumulator],
    provider: &Provider,
    out_of_network: bool,
    pcp_specialties: &HashSet<String>,
) -> Vec<SelectedBenefit<'a>> {
    benefits
        .iter()
        .filter(|benefit| filters::survives(benefit, provider, out_of_network, pcp_specialties))
        .map(|benefit| SelectedBenefit {
            benefit,
            matched_accumulators: binding::bind(benefit, accumulators),
        })
        .collect()
}

#[cfg(test)]
mod tests;
