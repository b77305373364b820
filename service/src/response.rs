//! Response Builder (SPEC_FULL.md §6.2, component C8): projects one engine
//! [`Record`] plus the negotiated rate and matched accumulators into the
//! wire response shape.

use estimator_engine::Record;
use estimator_types::money::{is_zero_or_less, sub_clamped, zero};
use estimator_types::{Accumulator, AccumulatorCode, AccumulatorLevel, Money, NegotiatedRate, RateType};
use serde::Serialize;

use crate::error::ServiceError;
use crate::request::{ProviderInfoRequest, ServiceRequest};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub service: ServiceEcho,
    pub cost_estimate: Vec<CostEstimateEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEcho {
    pub code: String,
    #[serde(rename = "type")]
    pub service_type: String,
    pub description: Option<String>,
    pub billed_amount: Money,
}

impl From<&ServiceRequest> for ServiceEcho {
    fn from(service: &ServiceRequest) -> Self {
        ServiceEcho {
            code: service.code.clone(),
            service_type: service.service_type.clone(),
            description: service.description.clone(),
            billed_amount: service.billed_amount.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfoEcho {
    pub service_location: Option<String>,
    pub provider_type: Option<String>,
    pub specialty_code: String,
    pub network_id: String,
    pub provider_identification_number: String,
    pub provider_tier: Option<String>,
}

impl From<&ProviderInfoRequest> for ProviderInfoEcho {
    fn from(provider_info: &ProviderInfoRequest) -> Self {
        ProviderInfoEcho {
            service_location: provider_info.service_location.clone(),
            provider_type: provider_info.provider_type.clone(),
            specialty_code: provider_info.specialty.code.clone(),
            network_id: provider_info.provider_networks.network_id.clone(),
            provider_identification_number: provider_info.provider_identification_number.clone(),
            provider_tier: provider_info.provider_network_participation.as_ref().and_then(|p| p.provider_tier.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum CostEstimateEntry {
    Success(Box<CostEstimateSuccess>),
    Error(CostEstimateError),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimateSuccess {
    pub provider_info: ProviderInfoEcho,
    pub coverage: Coverage,
    pub cost: Cost,
    pub health_claim_line: HealthClaimLine,
    pub accumulators: Vec<AccumulatorEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostEstimateError {
    pub provider_info: ProviderInfoEcho,
    pub exception: Exception,
}

#[derive(Debug, Serialize)]
pub struct Exception {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    pub is_service_covered: bool,
    pub cost_share_copay: Money,
    pub cost_share_coinsurance: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cost {
    pub in_network_costs: Money,
    pub in_network_costs_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthClaimLine {
    pub amount_copay: Money,
    pub amount_coinsurance: Money,
    pub amount_responsibility: Money,
    pub percent_responsibility: Money,
    pub amount_payable: Money,
}

#[derive(Debug, Serialize)]
pub struct AccumulatorEntry {
    pub accumulator: AccumulatorEcho,
    pub accumulator_calculation: AccumulatorCalculation,
}

#[derive(Debug, Serialize)]
pub struct AccumulatorEcho {
    pub code: &'static str,
    pub level: Option<&'static str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccumulatorCalculation {
    pub remaining_value: Money,
    pub applied_value: Money,
}

fn rate_type_label(rate_type: RateType) -> &'static str {
    match rate_type {
        RateType::Amount => "Amount",
        RateType::Percentage => "Percentage",
    }
}

/// `amount / rate * 100`, rounded to one decimal place. Zero when `rate` is
/// not positive, since the ratio is meaningless there (SPEC_FULL.md §6.2).
fn percent_of(amount: &Money, rate: &Money) -> Money {
    if is_zero_or_less(rate) {
        return zero();
    }
    (amount / rate * Money::from(100)).round(1)
}

fn applied_against(matched: &[Accumulator], code: AccumulatorCode, level: AccumulatorLevel, remaining: &Money) -> Money {
    matched
        .iter()
        .find(|a| a.code == code && a.level == level)
        .map(|a| sub_clamped(&a.calculated_value(), remaining))
        .unwrap_or_else(zero)
}

fn push_if_present(
    entries: &mut Vec<AccumulatorEntry>,
    remaining: Option<&Money>,
    code: AccumulatorCode,
    level: AccumulatorLevel,
    code_label: &'static str,
    level_label: &'static str,
    matched: &[Accumulator],
) {
    if let Some(remaining) = remaining {
        entries.push(AccumulatorEntry {
            accumulator: AccumulatorEcho { code: code_label, level: Some(level_label) },
            accumulator_calculation: AccumulatorCalculation {
                remaining_value: remaining.clone(),
                applied_value: applied_against(matched, code, level, remaining),
            },
        });
    }
}

fn build_accumulator_entries(record: &Record, matched: &[Accumulator]) -> Vec<AccumulatorEntry> {
    let mut entries = Vec::new();
    push_if_present(
        &mut entries,
        record.deductible_individual_calculated.as_ref(),
        AccumulatorCode::Deductible,
        AccumulatorLevel::Individual,
        "Deductible",
        "Individual",
        matched,
    );
    push_if_present(
        &mut entries,
        record.deductible_family_calculated.as_ref(),
        AccumulatorCode::Deductible,
        AccumulatorLevel::Family,
        "Deductible",
        "Family",
        matched,
    );
    push_if_present(
        &mut entries,
        record.oopmax_individual_calculated.as_ref(),
        AccumulatorCode::OopMax,
        AccumulatorLevel::Individual,
        "OOP Max",
        "Individual",
        matched,
    );
    push_if_present(
        &mut entries,
        record.oopmax_family_calculated.as_ref(),
        AccumulatorCode::OopMax,
        AccumulatorLevel::Family,
        "OOP Max",
        "Family",
        matched,
    );
    if let Some(remaining) = &record.limit_calculated {
        let applied = matched
            .iter()
            .find(|a| a.code == AccumulatorCode::Limit)
            .map(|a| sub_clamped(&a.calculated_value(), remaining))
            .unwrap_or_else(zero);
        entries.push(AccumulatorEntry {
            accumulator: AccumulatorEcho { code: "Limit", level: None },
            accumulator_calculation: AccumulatorCalculation { remaining_value: remaining.clone(), applied_value: applied },
        });
    }
    entries
}

/// Builds a success entry for the winning candidate of one provider's
/// engine run (SPEC_FULL.md §6.2).
pub fn success_entry(
    provider_info: &ProviderInfoRequest,
    record: &Record,
    rate_effective: &Money,
    rate: &NegotiatedRate,
    matched_accumulators: &[Accumulator],
) -> CostEstimateEntry {
    let amount_responsibility = record.member_pays.clone();
    let amount_payable = sub_clamped(rate_effective, &amount_responsibility);
    let percent_responsibility = percent_of(&amount_responsibility, rate_effective);

    CostEstimateEntry::Success(Box::new(CostEstimateSuccess {
        provider_info: ProviderInfoEcho::from(provider_info),
        coverage: Coverage {
            is_service_covered: record.is_service_covered,
            cost_share_copay: record.cost_share_copay.clone(),
            cost_share_coinsurance: record.cost_share_coinsurance,
        },
        cost: Cost { in_network_costs: rate_effective.clone(), in_network_costs_type: rate_type_label(rate.rate_type) },
        health_claim_line: HealthClaimLine {
            amount_copay: record.amount_copay.clone(),
            amount_coinsurance: record.amount_coinsurance.clone(),
            amount_responsibility,
            percent_responsibility,
            amount_payable,
        },
        accumulators: build_accumulator_entries(record, matched_accumulators),
    }))
}

/// Builds a per-provider error entry (SPEC_FULL.md §7: every failure kind
/// except `MemberNotFound`/`Cancelled` is scoped to a single provider).
pub fn error_entry(provider_info: &ProviderInfoRequest, error: &ServiceError) -> CostEstimateEntry {
    CostEstimateEntry::Error(CostEstimateError {
        provider_info: ProviderInfoEcho::from(provider_info),
        exception: Exception { code: error.code(), message: error.to_string() },
    })
}
