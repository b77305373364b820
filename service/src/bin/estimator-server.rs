//! Process entry point (SPEC_FULL.md §4.4 "Ambient stack", §6.4
//! "Environment / configuration"). `tracing-subscriber` init mirrors the
//! teacher's `examples/index-car-file.rs`.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use estimator_service::cache::RefreshingCache;
use estimator_service::config::{AppConfig, CliArgs, LogFormat};
use estimator_service::http_api::{self, AppState};
use estimator_service::orchestrator::Orchestrator;
use estimator_sources::auth::TokenCache;
use estimator_sources::{HttpAccumulatorSource, HttpBenefitSource, HttpRateSource};
use tokio::sync::Semaphore;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliArgs::parse();
    let config = AppConfig::load(cli.config.as_deref(), &cli)?;
    init_tracing(&config)?;
    run(config).await
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(&config.log.filter);

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.init(),
    }
    Ok(())
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let http = reqwest::Client::builder().timeout(Duration::from_secs(config.timeouts.source_timeout_secs)).build()?;
    let tokens = Arc::new(TokenCache::new(
        config.sources.token_url.clone(),
        config.sources.client_id.clone(),
        config.sources.client_secret.clone(),
    ));

    let benefit_source = Arc::new(HttpBenefitSource::new(http.clone(), config.sources.benefit_base_url.clone(), tokens.clone()));
    let accumulator_source =
        Arc::new(HttpAccumulatorSource::new(http.clone(), config.sources.accumulator_base_url.clone(), tokens.clone()));
    let rate_source = Arc::new(HttpRateSource::new(http.clone(), config.sources.rate_base_url.clone(), tokens.clone()));

    let pcp_specialties: Arc<RefreshingCache<HashSet<String>>> = RefreshingCache::new("pcp-specialty-set", HashSet::new());
    // The reference build ships no PCP-roster source; operators wire one in
    // by replacing this closure. An empty set means every provider is
    // treated as non-PCP, which only narrows which benefits can match.
    pcp_specialties.spawn_refresh(Duration::from_secs(config.cache.pcp_refresh_secs), || async { Ok(HashSet::new()) });

    let orchestrator = Orchestrator {
        benefit_source,
        accumulator_source,
        rate_source,
        pcp_specialties: pcp_specialties.clone(),
        provider_semaphore: Arc::new(Semaphore::new(config.pool.provider_workers)),
        request_deadline: Duration::from_secs(config.timeouts.request_deadline_secs),
    };

    let state = Arc::new(AppState {
        orchestrator,
        pcp_specialties,
        readiness_staleness_budget: Duration::from_secs(config.cache.pcp_refresh_secs * 2),
    });

    let app = http_api::router(state, Duration::from_secs(config.timeouts.request_deadline_secs));
    let listener = tokio::net::TcpListener::bind(&config.bind_address.0).await?;
    tracing::info!(bind_address = %config.bind_address.0, "estimator-server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
