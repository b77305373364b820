//! Inbound `POST /v1/estimate` request shape (SPEC_FULL.md §6.1).

use estimator_types::money::zero;
use estimator_types::{Money, Provider};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub membership_id: String,
    pub zip_code: String,
    pub benefit_product_type: String,
    #[serde(default)]
    pub language_code: Option<String>,
    pub service: ServiceRequest,
    pub provider_info: Vec<ProviderInfoRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequest {
    pub code: String,
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub description: Option<String>,
    pub place_of_service: PlaceOfService,
    /// Not named in SPEC_FULL.md §6.1's field list, but required by
    /// `NegotiatedRate::effective_amount` for a `Percentage` rate; defaults
    /// to zero so an `Amount`-rate request can omit it.
    #[serde(default = "zero")]
    pub billed_amount: Money,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOfService {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderInfoRequest {
    #[serde(default)]
    pub service_location: Option<String>,
    #[serde(default)]
    pub provider_type: Option<String>,
    pub specialty: SpecialtyRequest,
    pub provider_networks: ProviderNetworksRequest,
    pub provider_identification_number: String,
    #[serde(default)]
    pub provider_network_participation: Option<ProviderNetworkParticipationRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpecialtyRequest {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderNetworksRequest {
    pub network_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderNetworkParticipationRequest {
    #[serde(default)]
    pub provider_tier: Option<String>,
    /// Not named in SPEC_FULL.md §6.1's field list either, but the matcher's
    /// network-parity filter (§4.2) needs an explicit in/out-of-network flag
    /// per provider; defaults to in-network.
    #[serde(default = "default_true")]
    pub in_network: bool,
}

fn default_true() -> bool {
    true
}

impl ProviderInfoRequest {
    pub fn to_provider(&self) -> Provider {
        Provider {
            id: self.provider_identification_number.clone(),
            specialty_code: self.specialty.code.clone(),
            tier: self.provider_network_participation.as_ref().and_then(|p| p.provider_tier.clone()),
            network_id: self.provider_networks.network_id.clone(),
            service_location: self.service_location.clone(),
        }
    }

    pub fn out_of_network(&self) -> bool {
        !self.provider_network_participation.as_ref().map(|p| p.in_network).unwrap_or(true)
    }
}
