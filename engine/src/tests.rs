//! End-to-end scenarios and boundary behaviors from SPEC_FULL.md §8.

use estimator_types::money::{zero, Money};
use estimator_types::{
    Accumulator, AccumulatorCode, AccumulatorLevel, Benefit, NetworkCategory,
    RelatedAccumulatorRef,
};

use crate::engine::{evaluate, highest_member_pay, Candidate};

fn m(s: &str) -> Money {
    s.parse().expect("valid decimal literal")
}

fn base_benefit() -> Benefit {
    Benefit {
        network_category: NetworkCategory::InNetwork,
        tier: None,
        service_provider: vec![],
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

fn related(code: &str, level: &str) -> RelatedAccumulatorRef {
    RelatedAccumulatorRef {
        code: code.to_string(),
        level: level.to_string(),
        deductible_code: None,
        accum_ex_code: None,
        network_indicator_code: None,
    }
}

fn accumulator(code: AccumulatorCode, level: AccumulatorLevel, limit: &str, current: &str) -> Accumulator {
    Accumulator {
        code,
        level,
        deductible_code: None,
        accum_ex_code: None,
        network_indicator_code: None,
        limit_value: m(limit),
        current_value: m(current),
    }
}

fn run_single(rate: &str, benefit: Benefit, accumulators: Vec<Accumulator>) -> crate::Record {
    let candidate = Candidate { benefit: &benefit, matched_accumulators: &accumulators };
    evaluate(m(rate), &candidate).expect("engine run should not fail")
}

#[test]
fn s1_simple_copay_deductible_already_met() {
    let benefit = Benefit {
        cost_share_copay: m("25"),
        // Needed to reach N8 from N7 once the deductible is already met;
        // otherwise N7 routes straight past the copay to coinsurance.
        copay_continue_when_deductible_met: true,
        related_accumulators: vec![related("Deductible", "Individual"), related("OOP Max", "Individual")],
        ..base_benefit()
    };
    let accumulators = vec![
        accumulator(AccumulatorCode::Deductible, AccumulatorLevel::Individual, "0", "0"),
        accumulator(AccumulatorCode::OopMax, AccumulatorLevel::Individual, "5000", "0"),
    ];
    let record = run_single("900", benefit, accumulators);

    assert_eq!(record.member_pays, m("25"));
    assert_eq!(record.amount_copay, m("25"));
}

#[test]
fn s2_deductible_not_met_then_coinsurance() {
    let benefit = Benefit {
        cost_share_coinsurance: 20,
        deductible_applies_oop: true,
        coins_applies_oop: true,
        is_deductible_before_copay: true,
        related_accumulators: vec![related("Deductible", "Individual"), related("OOP Max", "Individual")],
        ..base_benefit()
    };
    let accumulators = vec![
        accumulator(AccumulatorCode::Deductible, AccumulatorLevel::Individual, "1000", "500"),
        accumulator(AccumulatorCode::OopMax, AccumulatorLevel::Individual, "5000", "0"),
    ];
    let record = run_single("900", benefit, accumulators);

    assert_eq!(record.member_pays, m("580"));
    assert_eq!(record.amount_coinsurance, m("80"));
    assert_eq!(record.oopmax_individual_calculated, Some(m("4420")));
}

#[test]
fn s3_oopm_already_met() {
    let benefit = Benefit {
        cost_share_copay: m("100"),
        copay_continue_when_oop_met: false,
        related_accumulators: vec![related("OOP Max", "Family")],
        ..base_benefit()
    };
    let accumulators = vec![accumulator(AccumulatorCode::OopMax, AccumulatorLevel::Family, "1000", "1000")];
    let record = run_single("900", benefit, accumulators);

    assert_eq!(record.member_pays, zero());
}

#[test]
fn s4_dollar_limit_partial_coverage() {
    let benefit = Benefit {
        limit_type: Some("dollar".to_string()),
        cost_share_copay: m("25"),
        related_accumulators: vec![related("Limit", "")],
        ..base_benefit()
    };
    let accumulators = vec![accumulator(AccumulatorCode::Limit, AccumulatorLevel::Individual, "600", "0")];
    let record = run_single("900", benefit, accumulators);

    assert_eq!(record.member_pays, m("300"));
    assert_eq!(record.limit_calculated, Some(zero()));
}

#[test]
fn s5_deductible_copay_oopm_cap_interaction() {
    let benefit = Benefit {
        cost_share_copay: m("100"),
        copay_applies_oop: true,
        deductible_applies_oop: true,
        is_deductible_before_copay: true,
        copay_continue_when_oop_met: false,
        // Needed for N7 to hand off to N8 once the deductible settles.
        copay_continue_when_deductible_met: true,
        related_accumulators: vec![related("Deductible", "Individual"), related("OOP Max", "Individual")],
        ..base_benefit()
    };
    let accumulators = vec![
        accumulator(AccumulatorCode::Deductible, AccumulatorLevel::Individual, "1000", "500"),
        accumulator(AccumulatorCode::OopMax, AccumulatorLevel::Individual, "570", "0"),
    ];
    let record = run_single("900", benefit, accumulators);

    assert_eq!(record.member_pays, m("570"));
    assert_eq!(record.oopmax_individual_calculated, Some(zero()));
}

#[test]
fn s6_counter_limit_consumes_a_visit() {
    let benefit = Benefit {
        limit_type: Some("counter".to_string()),
        cost_share_copay: m("25"),
        related_accumulators: vec![related("Limit", "")],
        ..base_benefit()
    };
    let accumulators = vec![accumulator(AccumulatorCode::Limit, AccumulatorLevel::Individual, "3", "0")];
    let record = run_single("900", benefit, accumulators);

    assert_eq!(record.limit_calculated, Some(m("2")));
    assert_eq!(record.member_pays, zero());
    assert!(record.calculation_complete);
}

#[test]
fn boundary_zero_service_amount() {
    let benefit = Benefit { cost_share_coinsurance: 20, ..base_benefit() };
    let record = run_single("0", benefit, vec![]);
    assert_eq!(record.member_pays, zero());
}

#[test]
fn boundary_zero_copay_and_coinsurance() {
    let benefit = base_benefit();
    let record = run_single("500", benefit, vec![]);
    assert_eq!(record.member_pays, zero());
}

#[test]
fn boundary_not_covered_pays_full_service_amount() {
    let benefit = Benefit { is_service_covered: false, ..base_benefit() };
    let record = run_single("500", benefit, vec![]);
    assert_eq!(record.member_pays, m("500"));
    assert!(record.calculation_complete);
}

#[test]
fn boundary_coinsurance_one_hundred_percent() {
    let benefit = Benefit { cost_share_coinsurance: 100, ..base_benefit() };
    let record = run_single("500", benefit, vec![]);
    assert_eq!(record.member_pays, m("500"));
}

#[test]
fn boundary_oopm_individual_exactly_equals_settlement_cap() {
    let benefit = Benefit {
        cost_share_coinsurance: 20,
        coins_applies_oop: true,
        related_accumulators: vec![related("OOP Max", "Individual")],
        ..base_benefit()
    };
    let accumulators = vec![accumulator(AccumulatorCode::OopMax, AccumulatorLevel::Individual, "100", "0")];
    let record = run_single("500", benefit, accumulators);

    assert_eq!(record.member_pays, m("100"));
    assert_eq!(record.oopmax_individual_calculated, Some(zero()));
}

#[test]
fn boundary_family_oopm_lower_than_individual_constrains_the_cap() {
    let benefit = Benefit {
        cost_share_coinsurance: 20,
        coins_applies_oop: true,
        related_accumulators: vec![related("OOP Max", "Individual"), related("OOP Max", "Family")],
        ..base_benefit()
    };
    let accumulators = vec![
        accumulator(AccumulatorCode::OopMax, AccumulatorLevel::Individual, "1000", "0"),
        accumulator(AccumulatorCode::OopMax, AccumulatorLevel::Family, "80", "0"),
    ];
    let record = run_single("500", benefit, accumulators);

    // 20% of 500 is 100, but the lower family cap of 80 binds instead.
    assert_eq!(record.member_pays, m("80"));
    assert_eq!(record.oopmax_family_calculated, Some(zero()));
    assert_eq!(record.oopmax_individual_calculated, Some(zero()));
}

#[test]
fn boundary_dollar_limit_exactly_equals_service_amount() {
    let benefit = Benefit {
        limit_type: Some("dollar".to_string()),
        cost_share_copay: m("25"),
        related_accumulators: vec![related("Limit", "")],
        ..base_benefit()
    };
    let accumulators = vec![accumulator(AccumulatorCode::Limit, AccumulatorLevel::Individual, "300", "0")];
    let record = run_single("300", benefit, accumulators);

    assert_eq!(record.member_pays, zero());
    assert_eq!(record.limit_calculated, Some(zero()));
}

#[test]
fn boundary_counter_limit_at_exactly_one_does_not_charge() {
    let benefit = Benefit {
        limit_type: Some("counter".to_string()),
        cost_share_copay: m("25"),
        related_accumulators: vec![related("Limit", "")],
        ..base_benefit()
    };
    let accumulators = vec![accumulator(AccumulatorCode::Limit, AccumulatorLevel::Individual, "1", "0")];
    let record = run_single("900", benefit, accumulators);

    assert_eq!(record.limit_calculated, Some(zero()));
    assert_eq!(record.member_pays, zero());
    assert!(record.calculation_complete);
}

#[test]
fn boundary_counter_limit_at_exactly_zero_charges_full_amount() {
    let benefit = Benefit {
        limit_type: Some("counter".to_string()),
        cost_share_copay: m("25"),
        related_accumulators: vec![related("Limit", "")],
        ..base_benefit()
    };
    let accumulators = vec![accumulator(AccumulatorCode::Limit, AccumulatorLevel::Individual, "0", "0")];
    let record = run_single("900", benefit, accumulators);

    assert_eq!(record.member_pays, m("900"));
    assert!(record.calculation_complete);
}

#[test]
fn boundary_deductible_exactly_equals_service_amount() {
    let benefit = Benefit {
        is_deductible_before_copay: true,
        related_accumulators: vec![related("Deductible", "Individual")],
        ..base_benefit()
    };
    let accumulators = vec![accumulator(AccumulatorCode::Deductible, AccumulatorLevel::Individual, "100", "0")];
    let record = run_single("100", benefit, accumulators);

    assert_eq!(record.member_pays, m("100"));
    assert_eq!(record.deductible_individual_calculated, Some(zero()));
}

#[test]
fn boundary_limit_type_unknown_is_engine_config_error() {
    let benefit = Benefit {
        limit_type: Some("weeks".to_string()),
        related_accumulators: vec![related("Limit", "")],
        ..base_benefit()
    };
    let accumulators = vec![accumulator(AccumulatorCode::Limit, AccumulatorLevel::Individual, "3", "0")];
    let candidate = Candidate { benefit: &benefit, matched_accumulators: &accumulators };
    let err = evaluate(m("500"), &candidate).unwrap_err();
    assert!(matches!(err, crate::EngineError::UnknownLimitType(_)));
}

#[test]
fn p2_non_negative_even_when_copay_exceeds_service_amount() {
    let benefit = Benefit { cost_share_copay: m("1000"), ..base_benefit() };
    let record = run_single("500", benefit, vec![]);
    assert!(record.service_amount >= zero());
    assert!(record.member_pays >= zero());
}

#[test]
fn highest_member_pay_picks_the_worst_case_and_breaks_ties_by_index() {
    let covered = base_benefit();
    let not_covered = Benefit { is_service_covered: false, ..base_benefit() };
    let candidates = vec![
        Candidate { benefit: &covered, matched_accumulators: &[] },
        Candidate { benefit: &not_covered, matched_accumulators: &[] },
    ];
    let outcome = highest_member_pay(m("500"), &candidates);
    let (index, record) = outcome.winner.expect("at least one candidate succeeds");
    assert_eq!(index, 1);
    assert_eq!(record.member_pays, m("500"));
    assert!(outcome.failures.is_empty());
}

#[test]
fn highest_member_pay_isolates_a_failing_candidate() {
    let bad = Benefit {
        limit_type: Some("bogus".to_string()),
        related_accumulators: vec![related("Limit", "")],
        ..base_benefit()
    };
    let bad_accumulators = vec![accumulator(AccumulatorCode::Limit, AccumulatorLevel::Individual, "3", "0")];
    let good = Benefit { cost_share_copay: m("10"), copay_continue_when_deductible_met: true, ..base_benefit() };

    let candidates = vec![
        Candidate { benefit: &bad, matched_accumulators: &bad_accumulators },
        Candidate { benefit: &good, matched_accumulators: &[] },
    ];
    let outcome = highest_member_pay(m("500"), &candidates);

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].index, 0);
    let (index, record) = outcome.winner.expect("the good candidate still wins");
    assert_eq!(index, 1);
    assert_eq!(record.member_pays, m("10"));
}
