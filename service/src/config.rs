//! Process configuration (SPEC_FULL.md §6.4): a TOML file with `Default`
//! fallbacks for everything, overridden by environment variables for the
//! handful of operationally-hot knobs, mirroring the teacher's
//! `forest/shared/src/cli/config.rs` layering.

use std::path::Path;

use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub benefit_base_url: String,
    pub accumulator_base_url: String,
    pub rate_base_url: String,
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            benefit_base_url: "http://localhost:9001".to_string(),
            accumulator_base_url: "http://localhost:9002".to_string(),
            rate_base_url: "http://localhost:9003".to_string(),
            token_url: "http://localhost:9000/oauth/token".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// Bounded worker pool size for per-provider matcher+engine work
    /// (SPEC_FULL.md §5 Tier 2).
    pub provider_workers: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { provider_workers: 12 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub request_deadline_secs: u64,
    pub source_timeout_secs: u64,
    pub token_ttl_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_deadline_secs: 5, source_timeout_secs: 2, token_ttl_secs: 59 * 60 }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub pcp_refresh_secs: u64,
    pub payment_method_refresh_secs: u64,
    pub bearer_refresh_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        const ONE_DAY: u64 = 24 * 60 * 60;
        Self { pcp_refresh_secs: ONE_DAY, payment_method_refresh_secs: ONE_DAY, bearer_refresh_secs: 59 * 60 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Default for LogFormat {
    fn default() -> Self {
        LogFormat::Pretty
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `RUST_LOG`-style filter string; falls back to `"info"`.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { format: LogFormat::default(), filter: "info".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub sources: SourcesConfig,
    pub pool: PoolConfig,
    pub timeouts: TimeoutConfig,
    pub cache: CacheConfig,
    pub log: LogConfig,
    pub bind_address: BindAddress,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindAddress(pub String);

impl Default for BindAddress {
    fn default() -> Self {
        BindAddress("0.0.0.0:8080".to_string())
    }
}

impl AppConfig {
    /// Loads the optional TOML file (if present) and layers the CLI/env
    /// overrides in [`CliArgs`] on top.
    pub fn load(path: Option<&Path>, cli: &CliArgs) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                toml::from_str(&text)?
            }
            None => AppConfig::default(),
        };
        cli.apply_overrides(&mut config);
        Ok(config)
    }
}

/// The operationally-hot knobs a deploy may need to flip without touching
/// the TOML file: pool sizes, timeouts, source base URLs (SPEC_FULL.md §6.4,
/// §4.4 "Configuration").
#[derive(Debug, Parser)]
#[command(name = "estimator-server")]
pub struct CliArgs {
    #[arg(long, env = "ESTIMATOR_CONFIG")]
    pub config: Option<std::path::PathBuf>,

    #[arg(long, env = "ESTIMATOR_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    #[arg(long, env = "ESTIMATOR_PROVIDER_WORKERS")]
    pub provider_workers: Option<usize>,

    #[arg(long, env = "ESTIMATOR_REQUEST_DEADLINE_SECS")]
    pub request_deadline_secs: Option<u64>,

    #[arg(long, env = "ESTIMATOR_BENEFIT_BASE_URL")]
    pub benefit_base_url: Option<String>,

    #[arg(long, env = "ESTIMATOR_ACCUMULATOR_BASE_URL")]
    pub accumulator_base_url: Option<String>,

    #[arg(long, env = "ESTIMATOR_RATE_BASE_URL")]
    pub rate_base_url: Option<String>,

    #[arg(long, env = "ESTIMATOR_TOKEN_URL")]
    pub token_url: Option<String>,

    #[arg(long, env = "ESTIMATOR_CLIENT_ID")]
    pub client_id: Option<String>,

    #[arg(long, env = "ESTIMATOR_CLIENT_SECRET")]
    pub client_secret: Option<String>,
}

impl CliArgs {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(v) = &self.bind_address {
            config.bind_address = BindAddress(v.clone());
        }
        if let Some(v) = self.provider_workers {
            config.pool.provider_workers = v;
        }
        if let Some(v) = self.request_deadline_secs {
            config.timeouts.request_deadline_secs = v;
        }
        if let Some(v) = &self.benefit_base_url {
            config.sources.benefit_base_url = v.clone();
        }
        if let Some(v) = &self.accumulator_base_url {
            config.sources.accumulator_base_url = v.clone();
        }
        if let Some(v) = &self.rate_base_url {
            config.sources.rate_base_url = v.clone();
        }
        if let Some(v) = &self.token_url {
            config.sources.token_url = v.clone();
        }
        if let Some(v) = &self.client_id {
            config.sources.client_id = v.clone();
        }
        if let Some(v) = &self.client_secret {
            config.sources.client_secret = v.clone();
        }
    }
}
