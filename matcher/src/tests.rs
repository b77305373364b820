use std::collections::HashSet;

use estimator_types::money::zero;
use estimator_types::{
    Accumulator, AccumulatorCode, AccumulatorLevel, Benefit, NetworkCategory, Provider,
    RelatedAccumulatorRef, ServiceProviderEntry,
};

use crate::select;

fn benefit(network: NetworkCategory, tier: Option<&str>, designation: Option<&str>) -> Benefit {
    Benefit {
        network_category: network,
        tier: tier.map(str::to_string),
        service_provider: designation
            .map(|d| vec![ServiceProviderEntry { provider_designation: Some(d.to_string()) }])
            .unwrap_or_default(),
        is_service_covered: true,
        cost_share_copay: zero(),
        cost_share_coinsurance: 0,
        is_deductible_before_copay: false,
        copay_applies_oop: false,
        coins_applies_oop: false,
        deductible_applies_oop: false,
        copay_count_to_deductible: false,
        copay_continue_when_deductible_met: false,
        copay_continue_when_oop_met: false,
        limit_type: None,
        individuals_met: None,
        individuals_needed: None,
        related_accumulators: vec![],
    }
}

fn provider(specialty_code: &str, tier: Option<&str>) -> Provider {
    Provider {
        id: "prov-1".to_string(),
        specialty_code: specialty_code.to_string(),
        tier: tier.map(str::to_string),
        network_id: "net-1".to_string(),
        service_location: None,
    }
}

#[test]
fn network_mismatch_is_dropped() {
    let benefits = vec![benefit(NetworkCategory::InNetwork, None, None)];
    let provider = provider("200", None);
    let pcp = HashSet::new();

    let selected = select(&benefits, &[], &provider, true, &pcp);
    assert!(selected.is_empty());
}

#[test]
fn tiered_benefit_against_untiered_provider_is_dropped() {
    let benefits = vec![benefit(NetworkCategory::InNetwork, Some("gold"), None)];
    let provider = provider("200", None);
    let pcp = HashSet::new();

    let selected = select(&benefits, &[], &provider, false, &pcp);
    assert!(selected.is_empty());
}

#[test]
fn tier_exact_match_survives() {
    let benefits = vec![benefit(NetworkCategory::InNetwork, Some("gold"), None)];
    let provider = provider("200", Some("gold"));
    let pcp = HashSet::new();

    let selected = select(&benefits, &[], &provider, false, &pcp);
    assert_eq!(selected.len(), 1);
}

#[test]
fn designation_mismatch_is_dropped() {
    let benefits = vec![benefit(NetworkCategory::InNetwork, None, Some("PCP"))];
    let provider = provider("200", None);
    let pcp = HashSet::new();

    let selected = select(&benefits, &[], &provider, false, &pcp);
    assert!(selected.is_empty());
}

#[test]
fn designation_match_survives() {
    let benefits = vec![benefit(NetworkCategory::InNetwork, None, Some("PCP"))];
    let provider = provider("200", None);
    let mut pcp = HashSet::new();
    pcp.insert("200".to_string());

    let selected = select(&benefits, &[], &provider, false, &pcp);
    assert_eq!(selected.len(), 1);
}

#[test]
fn benefit_with_no_designation_survives_any_provider() {
    let benefits = vec![benefit(NetworkCategory::InNetwork, None, None)];
    let provider = provider("200", None);
    let mut pcp = HashSet::new();
    pcp.insert("200".to_string());

    let selected = select(&benefits, &[], &provider, false, &pcp);
    assert_eq!(selected.len(), 1);
}

#[test]
fn binds_the_first_matching_accumulator_and_drops_unmatched_refs() {
    let mut b = benefit(NetworkCategory::InNetwork, None, None);
    b.related_accumulators = vec![
        RelatedAccumulatorRef {
            code: "Deductible".to_string(),
            level: "Individual".to_string(),
            deductible_code: None,
            accum_ex_code: None,
            network_indicator_code: None,
        },
        RelatedAccumulatorRef {
            code: "OOP Max".to_string(),
            level: "Family".to_string(),
            deductible_code: None,
            accum_ex_code: None,
            network_indicator_code: None,
        },
    ];
    let benefits = vec![b];
    let accumulators = vec![Accumulator {
        code: AccumulatorCode::Deductible,
        level: AccumulatorLevel::Individual,
        deductible_code: None,
        accum_ex_code: None,
        network_indicator_code: None,
        limit_value: "1000".parse().unwrap(),
        current_value: "200".parse().unwrap(),
    }];
    let provider = provider("200", None);
    let pcp = HashSet::new();

    let selected = select(&benefits, &accumulators, &provider, false, &pcp);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].matched_accumulators.len(), 1);
    assert_eq!(selected[0].matched_accumulators[0].code, AccumulatorCode::Deductible);
}

#[test]
fn empty_related_code_binds_against_limit() {
    let mut b = benefit(NetworkCategory::InNetwork, None, None);
    b.related_accumulators = vec![RelatedAccumulatorRef {
        code: String::new(),
        level: "Individual".to_string(),
        deductible_code: None,
        accum_ex_code: None,
        network_indicator_code: None,
    }];
    let benefits = vec![b];
    let accumulators = vec![Accumulator {
        code: AccumulatorCode::Limit,
        level: AccumulatorLevel::Individual,
        deductible_code: None,
        accum_ex_code: None,
        network_indicator_code: None,
        limit_value: "3".parse().unwrap(),
        current_value: "1".parse().unwrap(),
    }];
    let provider = provider("200", None);
    let pcp = HashSet::new();

    let selected = select(&benefits, &accumulators, &provider, false, &pcp);
    assert_eq!(selected[0].matched_accumulators.len(), 1);
}

#[test]
fn p7_matcher_is_idempotent() {
    let mut b = benefit(NetworkCategory::InNetwork, Some("gold"), Some("PCP"));
    b.related_accumulators = vec![RelatedAccumulatorRef {
        code: "Deductible".to_string(),
        level: "Individual".to_string(),
        deductible_code: None,
        accum_ex_code: None,
        network_indicator_code: None,
    }];
    let benefits = vec![b];
    let accumulators = vec![Accumulator {
        code: AccumulatorCode::Deductible,
        level: AccumulatorLevel::Individual,
        deductible_code: None,
        accum_ex_code: None,
        network_indicator_code: None,
        limit_value: "1000".parse().unwrap(),
        current_value: "200".parse().unwrap(),
    }];
    let provider = provider("200", Some("gold"));
    let mut pcp = HashSet::new();
    pcp.insert("200".to_string());

    let first = select(&benefits, &accumulators, &provider, false, &pcp);
    let second = select(&benefits, &accumulators, &provider, false, &pcp);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.matched_accumulators.len(), b.matched_accumulators.len());
    }
}
