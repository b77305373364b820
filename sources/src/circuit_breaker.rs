//! A small per-source circuit breaker (SPEC_FULL.md §5 "retry with
//! exponential backoff ... wrapped in a per-source circuit breaker").
//! Hand-rolled rather than pulled from a crate: three states, no timers,
//! guarded by a `parking_lot::Mutex` matching the rest of the crate's
//! synchronization style.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::SourceError;

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Closed,
    Open,
    HalfOpen,
}

struct Inner {
    state: State,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
}

pub struct CircuitBreaker {
    name: String,
    failure_threshold: u32,
    open_duration: Duration,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, failure_threshold: u32, open_duration: Duration) -> Self {
        Self {
            name: name.into(),
            failure_threshold,
            open_duration,
            inner: Mutex::new(Inner { state: State::Closed, consecutive_failures: 0, opened_at: None }),
        }
    }

    /// Call before attempting the underlying request. `Err` means "don't
    /// even try"; the caller should surface `SourceError::SourceUnavailable`
    /// equivalent behavior upstream.
    pub fn before_call(&self) -> Result<(), SourceError> {
        let mut inner = self.inner.lock();
        match inner.state {
            State::Open => {
                let elapsed = inner.opened_at.map(|t| t.elapsed() >= self.open_duration).unwrap_or(false);
                if elapsed {
                    inner.state = State::HalfOpen;
                    Ok(())
                } else {
                    Err(SourceError::CircuitOpen(self.name.clone()))
                }
            }
            State::Closed | State::HalfOpen => Ok(()),
        }
    }

    pub fn on_success(&self) {
        let mut inner = self.inner.lock();
        inner.state = State::Closed;
        inner.consecutive_failures = 0;
        inner.opened_at = None;
    }

    pub fn on_failure(&self) {
        let mut inner = self.inner.lock();
        inner.consecutive_failures += 1;
        if inner.consecutive_failures >= self.failure_threshold || inner.state == State::HalfOpen {
            inner.state = State::Open;
            inner.opened_at = Some(Instant::now());
        }
    }
}
