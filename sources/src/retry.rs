//! Exponential backoff around a source call (SPEC_FULL.md §5: "base ≈1 s,
//! cap ≈10 s, ≤3 attempts"), via `backon`.

use std::future::Future;
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

use crate::error::SourceError;

fn backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(1))
        .with_max_delay(Duration::from_secs(10))
        .with_max_times(3)
}

/// Retries `op` on transient failures only — a 4xx-shaped error (not found,
/// circuit open, auth failure) is not retried.
pub async fn with_retry<F, Fut, T>(op: F) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    op.retry(backoff())
        .when(is_transient)
        .await
}

fn is_transient(err: &SourceError) -> bool {
    matches!(err, SourceError::Transport { .. } | SourceError::UnexpectedStatus { .. })
}
