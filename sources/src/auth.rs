//! OAuth bearer token cache (SPEC_FULL.md §4.3 "Caching", §5 "Shared
//! resource policy"). One `TokenCache` is shared across all three adapters;
//! readers clone the `Arc<CachedToken>` under a brief read lock and drop it
//! immediately — the clone-and-drop-lock discipline the spec calls for.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Deserialize;

use crate::error::SourceError;

#[derive(Debug, Clone)]
pub struct CachedToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_ttl_secs")]
    expires_in: i64,
}

fn default_ttl_secs() -> i64 {
    59 * 60
}

pub struct TokenCache {
    token_url: String,
    client_id: String,
    client_secret: String,
    current: RwLock<Arc<CachedToken>>,
}

impl TokenCache {
    pub fn new(token_url: impl Into<String>, client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        let expired = CachedToken { value: String::new(), expires_at: Utc::now() - chrono::Duration::seconds(1) };
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            current: RwLock::new(Arc::new(expired)),
        }
    }

    /// The cached token, refreshing first if it has expired.
    pub async fn token(&self, http: &reqwest::Client) -> Result<Arc<CachedToken>, SourceError> {
        let snapshot = self.current.read().clone();
        if !snapshot.expired() {
            return Ok(snapshot);
        }
        self.refresh(http).await
    }

    /// Forces a refresh regardless of the cached token's age — used on a
    /// 401 from a source adapter (SPEC_FULL.md §4.3 "a 401 during a request
    /// triggers a single-shot refresh-and-retry").
    pub async fn refresh(&self, http: &reqwest::Client) -> Result<Arc<CachedToken>, SourceError> {
        let response = http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|source| SourceError::Transport { endpoint: self.token_url.clone(), source })?;

        if !response.status().is_success() {
            return Err(SourceError::AuthFailure(format!("token endpoint returned {}", response.status())));
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|source| SourceError::Transport { endpoint: self.token_url.clone(), source })?;

        let token = Arc::new(CachedToken {
            value: body.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(body.expires_in),
        });
        *self.current.write() = token.clone();
        Ok(token)
    }
}
