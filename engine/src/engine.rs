//! The calculation engine's public API (SPEC_FULL.md §4.1.4): run one
//! candidate through the graph, or run a set of candidates and keep the one
//! with the highest member-pay.

use estimator_types::{Accumulator, Benefit, Money};

use crate::error::EngineError;
use crate::graph;
use crate::record::Record;

/// Below this many candidates, evaluating sequentially avoids the overhead
/// of spinning up `rayon`'s work-stealing pool for what is, in practice,
/// almost always a one- or two-benefit matcher result.
const PARALLEL_THRESHOLD: usize = 4;

/// One candidate benefit plus the member accumulators the matcher bound to
/// it (SPEC_FULL.md §4.2 "Accumulator binding").
pub struct Candidate<'a> {
    pub benefit: &'a Benefit,
    pub matched_accumulators: &'a [Accumulator],
}

/// Runs one candidate benefit through the node graph.
pub fn evaluate(rate_effective: Money, candidate: &Candidate<'_>) -> Result<Record, EngineError> {
    let record = Record::from_benefit(rate_effective, candidate.benefit, candidate.matched_accumulators);
    graph::run(record)
}

/// A candidate that failed engine evaluation; excluded from the maximum but
/// reported back so the caller can log/surface it (SPEC_FULL.md §4.1.4).
pub struct CandidateFailure {
    pub index: usize,
    pub error: EngineError,
}

pub struct HighestMemberPayOutcome {
    /// The winning candidate's index (into the original slice) and record.
    /// `None` only when every candidate failed.
    pub winner: Option<(usize, Record)>,
    pub failures: Vec<CandidateFailure>,
}

/// Runs every candidate independently and keeps the one with the highest
/// `member_pays`, ties broken by lowest index. A node-level failure on one
/// candidate does not affect the others (SPEC_FULL.md §4.1.4).
pub fn highest_member_pay(
    rate_effective: Money,
    candidates: &[Candidate<'_>],
) -> HighestMemberPayOutcome {
    let results: Vec<Result<Record, EngineError>> = if candidates.len() > PARALLEL_THRESHOLD {
        use rayon::prelude::*;
        candidates
            .par_iter()
            .map(|c| evaluate(rate_effective.clone(), c))
            .collect()
    } else {
        candidates
            .iter()
            .map(|c| evaluate(rate_effective.clone(), c))
            .collect()
    };

    let mut winner: Option<(usize, Record)> = None;
    let mut failures = Vec::new();

    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(record) => {
                let replace = match &winner {
                    Some((_, best)) => record.member_pays > best.member_pays,
                    None => true,
                };
                if replace {
                    winner = Some((index, record));
                }
            }
            Err(error) => {
                tracing::warn!(candidate_index = index, %error, "candidate evaluation failed");
                failures.push(CandidateFailure { index, error });
            }
        }
    }

    HighestMemberPayOutcome { winner, failures }
}
