//! The estimator orchestrator (SPEC_FULL.md §4.3, component C6): fans out
//! to the three sources, runs the Matcher and Engine per provider on a
//! bounded worker pool, and assembles the response in request order.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use estimator_engine::engine::{self, Candidate};
use estimator_matcher as matcher;
use estimator_sources::{AccumulatorSource, BenefitQuery, BenefitSource, RateCriteria, RateSource, SourceError};
use estimator_types::{Accumulator, Benefit, NegotiatedRate};
use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::cache::RefreshingCache;
use crate::error::ServiceError;
use crate::request::{EstimateRequest, ProviderInfoRequest};
use crate::response::{self, CostEstimateEntry, EstimateResponse, ServiceEcho};

pub struct Orchestrator {
    pub benefit_source: Arc<dyn BenefitSource>,
    pub accumulator_source: Arc<dyn AccumulatorSource>,
    pub rate_source: Arc<dyn RateSource>,
    pub pcp_specialties: Arc<RefreshingCache<HashSet<String>>>,
    pub provider_semaphore: Arc<Semaphore>,
    pub request_deadline: Duration,
}

impl Orchestrator {
    /// Runs the whole per-request algorithm of SPEC_FULL.md §4.3 under a
    /// single deadline; on timeout the entire pipeline is abandoned
    /// (§5 "Cancellation & timeouts" — the engine and matcher are pure, so
    /// dropping in-flight work is always safe).
    pub async fn estimate(&self, request: EstimateRequest) -> Result<EstimateResponse, ServiceError> {
        tokio::time::timeout(self.request_deadline, self.estimate_inner(request))
            .await
            .map_err(|_| ServiceError::Cancelled)?
    }

    async fn estimate_inner(&self, request: EstimateRequest) -> Result<EstimateResponse, ServiceError> {
        let benefit_query = BenefitQuery {
            zip_code: request.zip_code.clone(),
            benefit_product_type: request.benefit_product_type.clone(),
            service_code: request.service.code.clone(),
            service_type: request.service.service_type.clone(),
            place_of_service_code: request.service.place_of_service.code.clone(),
        };

        let rate_futures = request.provider_info.iter().map(|provider_info| {
            let criteria = RateCriteria {
                provider_id: provider_info.provider_identification_number.clone(),
                network_id: provider_info.provider_networks.network_id.clone(),
                service_code: request.service.code.clone(),
            };
            async move { self.rate_source.get_rate(&criteria).await }
        });

        let (benefit_result, accumulator_result, rate_results) = tokio::join!(
            self.benefit_source.get_benefit(&benefit_query),
            self.accumulator_source.get_accumulators(&request.membership_id),
            join_all(rate_futures),
        );

        // Accumulator-source failure fails the whole request: every
        // provider's engine run needs the member's accumulators
        // (SPEC_FULL.md §4.3 "Failure isolation").
        let accumulator_bundle = accumulator_result.map_err(ServiceError::from)?;

        let benefit_result = Arc::new(benefit_result);
        let accumulators = Arc::new(accumulator_bundle.accumulators);
        let pcp_specialties = self.pcp_specialties.get();
        let billed_amount = Arc::new(request.service.billed_amount.clone());

        let mut handles = Vec::with_capacity(request.provider_info.len());
        for (index, (provider_info, rate_result)) in request.provider_info.iter().cloned().zip(rate_results).enumerate() {
            let benefit_result = Arc::clone(&benefit_result);
            let accumulators = Arc::clone(&accumulators);
            let pcp_specialties = Arc::clone(&pcp_specialties);
            let billed_amount = Arc::clone(&billed_amount);
            let semaphore = Arc::clone(&self.provider_semaphore);
            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.expect("semaphore is never closed");
                let entry = build_entry(&provider_info, &benefit_result, rate_result, &accumulators, &pcp_specialties, &billed_amount);
                (index, entry)
            }));
        }

        let mut entries: Vec<Option<CostEstimateEntry>> = (0..handles.len()).map(|_| None).collect();
        for handle in handles {
            let (index, entry) = handle.await.expect("provider worker task panicked");
            entries[index] = Some(entry);
        }
        let cost_estimate = entries.into_iter().map(|entry| entry.expect("every provider slot filled")).collect();

        Ok(EstimateResponse { service: ServiceEcho::from(&request.service), cost_estimate })
    }
}

/// Steps 3a-3e of SPEC_FULL.md §4.3 for one provider.
fn build_entry(
    provider_info: &ProviderInfoRequest,
    benefit_result: &Result<Vec<Benefit>, SourceError>,
    rate_result: Result<NegotiatedRate, SourceError>,
    accumulators: &[Accumulator],
    pcp_specialties: &HashSet<String>,
    billed_amount: &estimator_types::Money,
) -> CostEstimateEntry {
    let benefits = match benefit_result {
        Ok(benefits) => benefits,
        Err(error) => return response::error_entry(provider_info, &ServiceError::from_cloned(error)),
    };

    let rate = match rate_result {
        Ok(rate) => rate,
        Err(error) => return response::error_entry(provider_info, &ServiceError::from(error)),
    };
    if !rate.found {
        return response::error_entry(provider_info, &ServiceError::RateMissing);
    }

    let provider = provider_info.to_provider();
    let selected = matcher::select(benefits, accumulators, &provider, provider_info.out_of_network(), pcp_specialties);
    if selected.is_empty() {
        return response::error_entry(provider_info, &ServiceError::BenefitsNotFound);
    }

    let rate_effective = rate.effective_amount(billed_amount);
    let candidates: Vec<Candidate<'_>> = selected
        .iter()
        .map(|s| Candidate { benefit: s.benefit, matched_accumulators: &s.matched_accumulators })
        .collect();

    let outcome = engine::highest_member_pay(rate_effective.clone(), &candidates);
    for failure in &outcome.failures {
        tracing::warn!(provider_id = %provider.id, candidate_index = failure.index, error = %failure.error, "candidate evaluation failed");
    }

    match outcome.winner {
        Some((index, record)) => {
            response::success_entry(provider_info, &record, &rate_effective, &rate, &selected[index].matched_accumulators)
        }
        None => response::error_entry(provider_info, &ServiceError::from(outcome.failures.into_iter().next().expect("selected is non-empty").error)),
    }
}

impl ServiceError {
    /// `SourceError` isn't `Clone`; this reconstructs an equivalent
    /// `ServiceError` from a borrowed reference for the benefit-lookup
    /// failure path, where the original error is shared across every
    /// provider's worker task.
    fn from_cloned(error: &SourceError) -> ServiceError {
        match error {
            SourceError::BenefitsNotFound => ServiceError::BenefitsNotFound,
            SourceError::MemberNotFound(_) => ServiceError::MemberNotFound,
            SourceError::Transport { .. } | SourceError::UnexpectedStatus { .. } | SourceError::CircuitOpen(_) => {
                ServiceError::SourceUnavailable(error.to_string())
            }
            SourceError::AuthExpired | SourceError::AuthFailure(_) => ServiceError::AuthExpired,
            SourceError::Decode(_) => ServiceError::SourceUnavailable(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use estimator_types::money::zero;
    use estimator_types::{AccumulatorBundle, NetworkCategory, RateType};
    use std::str::FromStr;

    use crate::request::{
        PlaceOfService, ProviderInfoRequest, ProviderNetworkParticipationRequest, ProviderNetworksRequest, ServiceRequest,
        SpecialtyRequest,
    };

    fn money(s: &str) -> estimator_types::Money {
        estimator_types::Money::from_str(s).unwrap()
    }

    fn covered_benefit() -> Benefit {
        Benefit {
            network_category: NetworkCategory::InNetwork,
            tier: None,
            service_provider: vec![],
            is_service_covered: true,
            cost_share_copay: money("25"),
            cost_share_coinsurance: 0,
            is_deductible_before_copay: false,
            copay_applies_oop: true,
            coins_applies_oop: true,
            deductible_applies_oop: true,
            copay_count_to_deductible: false,
            copay_continue_when_deductible_met: true,
            copay_continue_when_oop_met: true,
            limit_type: None,
            individuals_met: None,
            individuals_needed: None,
            related_accumulators: vec![],
        }
    }

    fn provider_info(id: &str) -> ProviderInfoRequest {
        ProviderInfoRequest {
            service_location: None,
            provider_type: None,
            specialty: SpecialtyRequest { code: "207Q00000X".to_string() },
            provider_networks: ProviderNetworksRequest { network_id: "NET1".to_string() },
            provider_identification_number: id.to_string(),
            provider_network_participation: Some(ProviderNetworkParticipationRequest { provider_tier: None, in_network: true }),
        }
    }

    fn request(providers: Vec<ProviderInfoRequest>) -> EstimateRequest {
        EstimateRequest {
            membership_id: "M1".to_string(),
            zip_code: "10001".to_string(),
            benefit_product_type: "PPO".to_string(),
            language_code: None,
            service: ServiceRequest {
                code: "99213".to_string(),
                service_type: "office visit".to_string(),
                description: None,
                place_of_service: PlaceOfService { code: "11".to_string() },
                billed_amount: zero(),
            },
            provider_info: providers,
        }
    }

    struct FixedBenefitSource(Result<Vec<Benefit>, SourceError>);

    #[async_trait]
    impl BenefitSource for FixedBenefitSource {
        async fn get_benefit(&self, _query: &BenefitQuery) -> Result<Vec<Benefit>, SourceError> {
            self.0.as_ref().map(|v| v.clone()).map_err(|_| SourceError::BenefitsNotFound)
        }
    }

    struct FixedAccumulatorSource(Result<AccumulatorBundle, ()>);

    #[async_trait]
    impl AccumulatorSource for FixedAccumulatorSource {
        async fn get_accumulators(&self, membership_id: &str) -> Result<AccumulatorBundle, SourceError> {
            self.0.clone().map_err(|_| SourceError::MemberNotFound(membership_id.to_string()))
        }
    }

    /// Returns `found = false` for provider id `"no-rate"`, a transport
    /// error for `"down"`, and a $100 flat rate otherwise.
    struct PerProviderRateSource;

    #[async_trait]
    impl RateSource for PerProviderRateSource {
        async fn get_rate(&self, criteria: &RateCriteria) -> Result<NegotiatedRate, SourceError> {
            match criteria.provider_id.as_str() {
                "no-rate" => Ok(NegotiatedRate { amount: zero(), rate_type: RateType::Amount, payment_method_code: None, found: false }),
                "down" => Err(SourceError::UnexpectedStatus { endpoint: "/rates".to_string(), status: 503 }),
                _ => Ok(NegotiatedRate { amount: money("100"), rate_type: RateType::Amount, payment_method_code: None, found: true }),
            }
        }
    }

    fn orchestrator(benefit_result: Result<Vec<Benefit>, SourceError>, accumulator_result: Result<AccumulatorBundle, ()>) -> Orchestrator {
        Orchestrator {
            benefit_source: Arc::new(FixedBenefitSource(benefit_result)),
            accumulator_source: Arc::new(FixedAccumulatorSource(accumulator_result)),
            rate_source: Arc::new(PerProviderRateSource),
            pcp_specialties: RefreshingCache::new("pcp", HashSet::new()),
            provider_semaphore: Arc::new(Semaphore::new(12)),
            request_deadline: Duration::from_secs(5),
        }
    }

    #[tokio::test]
    async fn one_failing_provider_does_not_sink_the_others() {
        let orchestrator = orchestrator(Ok(vec![covered_benefit()]), Ok(AccumulatorBundle::default()));
        let req = request(vec![provider_info("good"), provider_info("no-rate"), provider_info("down")]);

        let response = orchestrator.estimate(req).await.expect("request-level success");
        assert_eq!(response.cost_estimate.len(), 3);
        assert!(matches!(response.cost_estimate[0], CostEstimateEntry::Success(_)));
        match &response.cost_estimate[1] {
            CostEstimateEntry::Error(e) => assert_eq!(e.exception.code, "RateMissing"),
            other => panic!("expected a RateMissing error entry, got {other:?}"),
        }
        match &response.cost_estimate[2] {
            CostEstimateEntry::Error(e) => assert_eq!(e.exception.code, "SourceUnavailable"),
            other => panic!("expected a SourceUnavailable error entry, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn accumulator_source_failure_fails_the_whole_request() {
        let orchestrator = orchestrator(Ok(vec![covered_benefit()]), Err(()));
        let req = request(vec![provider_info("good")]);

        let error = orchestrator.estimate(req).await.expect_err("accumulator failure must fail the whole request");
        assert_eq!(error.code(), "MemberNotFound");
    }

    #[tokio::test]
    async fn benefit_catalog_miss_becomes_a_per_provider_error() {
        let orchestrator = orchestrator(Err(SourceError::BenefitsNotFound), Ok(AccumulatorBundle::default()));
        let req = request(vec![provider_info("good")]);

        let response = orchestrator.estimate(req).await.expect("request-level success");
        match &response.cost_estimate[0] {
            CostEstimateEntry::Error(e) => assert_eq!(e.exception.code, "BenefitsNotFound"),
            other => panic!("expected a BenefitsNotFound error entry, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn results_preserve_original_provider_order() {
        let orchestrator = orchestrator(Ok(vec![covered_benefit()]), Ok(AccumulatorBundle::default()));
        let req = request(vec![provider_info("no-rate"), provider_info("good"), provider_info("down")]);

        let response = orchestrator.estimate(req).await.expect("request-level success");
        match &response.cost_estimate[0] {
            CostEstimateEntry::Error(e) => assert_eq!(e.exception.code, "RateMissing"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(response.cost_estimate[1], CostEstimateEntry::Success(_)));
        match &response.cost_estimate[2] {
            CostEstimateEntry::Error(e) => assert_eq!(e.exception.code, "SourceUnavailable"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
