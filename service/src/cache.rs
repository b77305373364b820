//! Process-wide caches refreshed on a background cadence and read
//! lock-free on the request path (SPEC_FULL.md §4.3 "Caching", §5 "Shared
//! resource policy", §9 "Global caches"). `parking_lot::RwLock<Arc<T>>`
//! clone-and-drop-lock discipline, the same shape as the teacher's
//! `node/db/src/rolling/impls.rs`.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

struct Inner<T> {
    value: Arc<T>,
    refreshed_at: Instant,
}

pub struct RefreshingCache<T> {
    name: &'static str,
    inner: RwLock<Inner<T>>,
}

impl<T: Send + Sync + 'static> RefreshingCache<T> {
    pub fn new(name: &'static str, initial: T) -> Arc<Self> {
        Arc::new(Self { name, inner: RwLock::new(Inner { value: Arc::new(initial), refreshed_at: Instant::now() }) })
    }

    /// Clones the cached `Arc` under a brief read lock and drops it
    /// immediately — never held across an `.await`.
    pub fn get(&self) -> Arc<T> {
        self.inner.read().value.clone()
    }

    /// How long it has been since the last successful refresh; `GET
    /// /readyz` reports this so an operator can see a stalled background
    /// task before it becomes a correctness problem.
    pub fn age(&self) -> Duration {
        self.inner.read().refreshed_at.elapsed()
    }

    fn set(&self, value: T) {
        let mut guard = self.inner.write();
        guard.value = Arc::new(value);
        guard.refreshed_at = Instant::now();
    }

    /// Spawns the single background refresher for this cache. Fetch
    /// failures are logged and the stale value is kept rather than poisoning
    /// the cache with an error.
    pub fn spawn_refresh<F, Fut>(self: &Arc<Self>, interval: Duration, mut fetch: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send,
    {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately; initial value already set by `new`
            loop {
                ticker.tick().await;
                match fetch().await {
                    Ok(value) => cache.set(value),
                    Err(error) => {
                        tracing::warn!(cache = cache.name, %error, "background cache refresh failed; keeping stale value")
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn get_returns_the_initial_value() {
        let cache = RefreshingCache::new("pcp", HashSet::from(["98".to_string()]));
        assert!(cache.get().contains("98"));
    }

    #[test]
    fn age_starts_near_zero() {
        let cache: Arc<RefreshingCache<HashSet<String>>> = RefreshingCache::new("pcp", HashSet::new());
        assert!(cache.age() < Duration::from_secs(1));
    }
}
