//! The per-benefit calculation record (SPEC_FULL.md §3.1).

use estimator_types::money::{zero, Money};
use estimator_types::{
    Accumulator, AccumCode, AccumCodeSet, AccumLevel, AccumLevelSet, AccumulatorCode,
    AccumulatorLevel, Benefit,
};

/// Which node produced a trace entry. Mirrors SPEC_FULL.md §4.1.2/§4.1.3 one
/// variant per node; there is no "NodeId::default" — every entry names a
/// real node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeId {
    N1Coverage,
    N2Limit,
    N3OopmGate,
    N4OopmCopay,
    N5DeductibleGate,
    N6DeductibleOopm,
    N7CostShareRouter,
    N8DeductibleCopay,
    N9PreDeductibleCopay,
    N10PreDeductibleCostShare,
    N11Coinsurance,
}

impl NodeId {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeId::N1Coverage => "N1",
            NodeId::N2Limit => "N2",
            NodeId::N3OopmGate => "N3",
            NodeId::N4OopmCopay => "N4",
            NodeId::N5DeductibleGate => "N5",
            NodeId::N6DeductibleOopm => "N6",
            NodeId::N7CostShareRouter => "N7",
            NodeId::N8DeductibleCopay => "N8",
            NodeId::N9PreDeductibleCopay => "N9",
            NodeId::N10PreDeductibleCostShare => "N10",
            NodeId::N11Coinsurance => "N11",
        }
    }
}

/// One append-only trace entry: which node ran, what it decided, and the
/// dollar value (if any) involved in the decision.
#[derive(Debug, Clone)]
pub struct TraceEntry {
    pub node: NodeId,
    pub decision: &'static str,
    pub value: Option<Money>,
}

/// The mutable per-benefit calculation state that flows through the node
/// graph. One `Record` is built per candidate benefit per provider per
/// request, mutated by the nodes it visits, and discarded after the
/// [`crate::engine`] reads its final `member_pays` (SPEC_FULL.md §3.1
/// "Lifecycle").
#[derive(Debug, Clone)]
pub struct Record {
    pub service_amount: Money,
    pub member_pays: Money,
    pub amount_copay: Money,
    pub amount_coinsurance: Money,

    pub cost_share_copay: Money,
    /// Integer percent, 0..=100 by contract; values outside that range are
    /// rejected by N11 as an `EngineConfig` error.
    pub cost_share_coinsurance: u8,

    pub is_service_covered: bool,
    pub is_deductible_before_copay: bool,
    pub copay_applies_oop: bool,
    pub coins_applies_oop: bool,
    pub deductible_applies_oop: bool,
    pub copay_count_to_deductible: bool,
    pub copay_continue_when_deductible_met: bool,
    pub copay_continue_when_oop_met: bool,

    pub deductible_individual_calculated: Option<Money>,
    pub deductible_family_calculated: Option<Money>,
    pub oopmax_individual_calculated: Option<Money>,
    pub oopmax_family_calculated: Option<Money>,

    /// Raw, lowercased `"dollar"` / `"counter"` / anything else. An
    /// unrecognized value is only rejected once N2 actually runs
    /// (SPEC_FULL.md §4.1.2 N2), so it is not validated here.
    pub limit_type: Option<String>,
    pub limit_calculated: Option<Money>,

    pub accum_code: AccumCodeSet,
    pub accum_level: AccumLevelSet,

    pub individuals_met: Option<u32>,
    pub individuals_needed: Option<u32>,

    pub calculation_complete: bool,
    pub trace: Vec<TraceEntry>,
}

impl Record {
    /// Builds the initial record for one candidate benefit, defaulting
    /// fields absent from the benefit per SPEC_FULL.md §3.1 invariant 5.
    ///
    /// `rate_effective` is the negotiated rate already adjusted for
    /// percentage rate types (see [`estimator_types::NegotiatedRate::effective_amount`]).
    /// `matched_accumulators` is the matcher's binding output for this
    /// benefit (SPEC_FULL.md §4.2 "Accumulator binding").
    pub fn from_benefit(
        rate_effective: Money,
        benefit: &Benefit,
        matched_accumulators: &[Accumulator],
    ) -> Self {
        let mut accum_code = AccumCodeSet::new();
        let mut accum_level = AccumLevelSet::new();

        for r in &benefit.related_accumulators {
            let code = normalize_ref_code(&r.code);
            match code.as_str() {
                "oop max" | "oopmax" => {
                    accum_code.insert(AccumCode::Oopmax);
                }
                "deductible" => {
                    accum_code.insert(AccumCode::Deductible);
                }
                "limit" => {
                    accum_code.insert(AccumCode::Limit);
                }
                _ => {}
            }
            if let Some(level) = accum_level_for(&code, &r.level) {
                accum_level.insert(level);
            }
        }

        let find = |wanted_code: AccumulatorCode, wanted_level: AccumulatorLevel| {
            matched_accumulators
                .iter()
                .find(|a| a.code == wanted_code && a.level == wanted_level)
                .map(Accumulator::calculated_value)
        };

        // A kind declared in accum_code but with no bound accumulator (a
        // matcher binding miss) is treated as already exhausted (0) rather
        // than "unlimited" — see DESIGN.md for the rationale.
        let deductible_individual_calculated = accum_level
            .contains(&AccumLevel::DeductibleIndividual)
            .then(|| find(AccumulatorCode::Deductible, AccumulatorLevel::Individual).unwrap_or_else(zero));
        let deductible_family_calculated = accum_level
            .contains(&AccumLevel::DeductibleFamily)
            .then(|| find(AccumulatorCode::Deductible, AccumulatorLevel::Family).unwrap_or_else(zero));
        let oopmax_individual_calculated = accum_level
            .contains(&AccumLevel::OopmaxIndividual)
            .then(|| find(AccumulatorCode::OopMax, AccumulatorLevel::Individual).unwrap_or_else(zero));
        let oopmax_family_calculated = accum_level
            .contains(&AccumLevel::OopmaxFamily)
            .then(|| find(AccumulatorCode::OopMax, AccumulatorLevel::Family).unwrap_or_else(zero));

        let limit_calculated = accum_code.contains(&AccumCode::Limit).then(|| {
            matched_accumulators
                .iter()
                .find(|a| a.code == AccumulatorCode::Limit)
                .map(Accumulator::calculated_value)
                .unwrap_or_else(zero)
        });

        Record {
            service_amount: rate_effective,
            member_pays: zero(),
            amount_copay: zero(),
            amount_coinsurance: zero(),

            cost_share_copay: benefit.cost_share_copay.clone(),
            cost_share_coinsurance: benefit.cost_share_coinsurance,

            is_service_covered: benefit.is_service_covered,
            is_deductible_before_copay: benefit.is_deductible_before_copay,
            copay_applies_oop: benefit.copay_applies_oop,
            coins_applies_oop: benefit.coins_applies_oop,
            deductible_applies_oop: benefit.deductible_applies_oop,
            copay_count_to_deductible: benefit.copay_count_to_deductible,
            copay_continue_when_deductible_met: benefit.copay_continue_when_deductible_met,
            copay_continue_when_oop_met: benefit.copay_continue_when_oop_met,

            deductible_individual_calculated,
            deductible_family_calculated,
            oopmax_individual_calculated,
            oopmax_family_calculated,

            limit_type: benefit.limit_type.as_deref().map(|s| s.to_lowercase()),
            limit_calculated,

            accum_code,
            accum_level,

            individuals_met: benefit.individuals_met,
            individuals_needed: benefit.individuals_needed,

            calculation_complete: false,
            trace: Vec::new(),
        }
    }

    pub fn push_trace(&mut self, node: NodeId, decision: &'static str, value: Option<Money>) {
        self.trace.push(TraceEntry { node, decision, value });
    }

    /// Embedded-deductible rule: `individuals_met == individuals_needed`
    /// when both are present, else `false` (SPEC_FULL.md §4.1.2 N5).
    pub fn embedded_deductible_satisfied(&self) -> bool {
        matches!((self.individuals_met, self.individuals_needed), (Some(m), Some(n)) if m == n)
    }
}

fn normalize_ref_code(raw: &str) -> String {
    if raw.trim().is_empty() {
        "limit".to_string()
    } else {
        raw.to_lowercase()
    }
}

fn accum_level_for(normalized_code: &str, raw_level: &str) -> Option<AccumLevel> {
    let level = raw_level.to_lowercase();
    match (normalized_code, level.as_str()) {
        ("deductible", "individual") => Some(AccumLevel::DeductibleIndividual),
        ("deductible", "family") => Some(AccumLevel::DeductibleFamily),
        ("oop max" | "oopmax", "individual") => Some(AccumLevel::OopmaxIndividual),
        ("oop max" | "oopmax", "family") => Some(AccumLevel::OopmaxFamily),
        _ => None,
    }
}
