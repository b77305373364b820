//! Reference `reqwest`-backed implementations of the three source traits
//! (SPEC_FULL.md §6.3). Each wraps the shared bearer-token cache, a
//! per-source circuit breaker, and the retry policy in [`crate::retry`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use estimator_types::{AccumulatorBundle, Benefit, NegotiatedRate};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::auth::TokenCache;
use crate::circuit_breaker::CircuitBreaker;
use crate::error::SourceError;
use crate::retry::with_retry;
use crate::traits::{AccumulatorSource, BenefitQuery, BenefitSource, RateCriteria, RateSource};

const SOURCE_TIMEOUT: Duration = Duration::from_secs(2);

struct HttpCaller {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<TokenCache>,
    breaker: CircuitBreaker,
}

impl HttpCaller {
    fn new(http: reqwest::Client, base_url: impl Into<String>, tokens: Arc<TokenCache>, breaker_name: &str) -> Self {
        Self { http, base_url: base_url.into(), tokens, breaker: CircuitBreaker::new(breaker_name, 5, Duration::from_secs(30)) }
    }

    /// GETs `path` with `query`, mapping a 404 to `not_found`, retrying
    /// transient failures, and refreshing the bearer token once on a 401
    /// (SPEC_FULL.md §4.3, §7).
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        not_found: SourceError,
    ) -> Result<T, SourceError> {
        self.breaker.before_call()?;

        let outcome = with_retry(|| self.call_with_auth_retry(path, query, &not_found)).await;
        match &outcome {
            Ok(_) => self.breaker.on_success(),
            Err(SourceError::BenefitsNotFound) | Err(SourceError::MemberNotFound(_)) => self.breaker.on_success(),
            Err(_) => self.breaker.on_failure(),
        }
        outcome
    }

    async fn call_with_auth_retry<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        not_found: &SourceError,
    ) -> Result<T, SourceError> {
        match self.call_once(path, query, not_found).await {
            Err(SourceError::AuthExpired) => self.call_once(path, query, not_found).await,
            other => other,
        }
    }

    async fn call_once<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        not_found: &SourceError,
    ) -> Result<T, SourceError> {
        let token = self.tokens.token(&self.http).await?;
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&token.value)
            .query(query)
            .timeout(SOURCE_TIMEOUT)
            .send()
            .await
            .map_err(|source| SourceError::Transport { endpoint: path.to_string(), source })?;

        match response.status() {
            StatusCode::UNAUTHORIZED => {
                self.tokens.refresh(&self.http).await?;
                Err(SourceError::AuthExpired)
            }
            StatusCode::NOT_FOUND => Err(clone_not_found(not_found)),
            status if status.is_success() => response
                .json::<T>()
                .await
                .map_err(|source| SourceError::Transport { endpoint: path.to_string(), source }),
            status => Err(SourceError::UnexpectedStatus { endpoint: path.to_string(), status: status.as_u16() }),
        }
    }
}

fn clone_not_found(e: &SourceError) -> SourceError {
    match e {
        SourceError::BenefitsNotFound => SourceError::BenefitsNotFound,
        SourceError::MemberNotFound(id) => SourceError::MemberNotFound(id.clone()),
        _ => SourceError::BenefitsNotFound,
    }
}

pub struct HttpBenefitSource {
    caller: HttpCaller,
}

impl HttpBenefitSource {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, tokens: Arc<TokenCache>) -> Self {
        Self { caller: HttpCaller::new(http, base_url, tokens, "benefit-source") }
    }
}

#[async_trait]
impl BenefitSource for HttpBenefitSource {
    async fn get_benefit(&self, query: &BenefitQuery) -> Result<Vec<Benefit>, SourceError> {
        let params = [
            ("zipCode", query.zip_code.clone()),
            ("benefitProductType", query.benefit_product_type.clone()),
            ("serviceCode", query.service_code.clone()),
            ("serviceType", query.service_type.clone()),
            ("placeOfServiceCode", query.place_of_service_code.clone()),
        ];
        self.caller.get_json("/benefits", &params, SourceError::BenefitsNotFound).await
    }
}

pub struct HttpAccumulatorSource {
    caller: HttpCaller,
}

impl HttpAccumulatorSource {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, tokens: Arc<TokenCache>) -> Self {
        Self { caller: HttpCaller::new(http, base_url, tokens, "accumulator-source") }
    }
}

#[async_trait]
impl AccumulatorSource for HttpAccumulatorSource {
    async fn get_accumulators(&self, membership_id: &str) -> Result<AccumulatorBundle, SourceError> {
        let params = [("membershipId", membership_id.to_string())];
        self.caller
            .get_json("/accumulators", &params, SourceError::MemberNotFound(membership_id.to_string()))
            .await
    }
}

pub struct HttpRateSource {
    caller: HttpCaller,
}

impl HttpRateSource {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, tokens: Arc<TokenCache>) -> Self {
        Self { caller: HttpCaller::new(http, base_url, tokens, "rate-source") }
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn get_rate(&self, criteria: &RateCriteria) -> Result<NegotiatedRate, SourceError> {
        let params = [
            ("providerId", criteria.provider_id.clone()),
            ("networkId", criteria.network_id.clone()),
            ("serviceCode", criteria.service_code.clone()),
        ];
        // A missing rate is a `found = false` body, not a transport-level
        // not-found — there is no dedicated `SourceError` variant for it.
        self.caller.get_json("/rates", &params, SourceError::UnexpectedStatus { endpoint: "/rates".into(), status: 404 }).await
    }
}
