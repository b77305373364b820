//! The three filter predicates (SPEC_FULL.md §4.2). Order of application is
//! immaterial to the result, but cheapest-first keeps the common case fast.

use std::collections::HashSet;

use estimator_types::{Benefit, NetworkCategory, Provider};

/// Network parity: an in-network provider passes only in-network benefits,
/// and vice versa.
pub fn network_parity(benefit: &Benefit, out_of_network: bool) -> bool {
    benefit.network_category.is_out_of_network() == out_of_network
}

/// Tier parity. A benefit with no tier always survives. A benefit with a
/// tier survives only against a provider that also carries one, and then
/// only on exact match — a tiered benefit against an untiered provider is
/// dropped outright rather than treated as a wildcard.
pub fn tier_parity(benefit: &Benefit, provider: &Provider) -> bool {
    match (&benefit.tier, &provider.tier) {
        (None, _) => true,
        (Some(_), None) => {
            tracing::warn!(provider_id = %provider.id, "benefit specifies a tier but provider has none; dropping");
            false
        }
        (Some(benefit_tier), Some(provider_tier)) => benefit_tier == provider_tier,
    }
}

/// Designation parity. The benefit survives if it carries no designation at
/// all, or if both sides have one and they match.
pub fn designation_parity(benefit: &Benefit, provider: &Provider, pcp_specialties: &HashSet<String>) -> bool {
    let provider_designation = provider.designation(pcp_specialties);
    match benefit.designation() {
        None => true,
        Some(benefit_designation) => provider_designation == Some(benefit_designation),
    }
}

/// All three predicates at once, in the order a reader would reach for them.
pub fn survives(
    benefit: &Benefit,
    provider: &Provider,
    out_of_network: bool,
    pcp_specialties: &HashSet<String>,
) -> bool {
    network_parity(benefit, out_of_network)
        && tier_parity(benefit, provider)
        && designation_parity(benefit, provider, pcp_specialties)
}
