//! Cached-query façade.
//!
//! One method per data domain, all the same shape: check the cache
//! under `domain:discriminators`, on a miss run the caller-supplied
//! backend fetch and populate the cache with the domain's TTL. The
//! engine does not own the backend of record; fetches are arbitrary
//! async closures returning serializable data, and their errors
//! propagate untouched. Cache failures cannot reach the caller - the
//! store absorbs them.

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::cache::{CacheConfig, CacheStore};

/// Read-through helpers over the tiered cache, one per data domain.
#[derive(Debug, Clone)]
pub struct CachedQueries {
    store: Arc<CacheStore>,
}

impl CachedQueries {
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self { store }
    }

    /// A user's dashboard data.
    pub async fn dashboard<T, F, Fut>(&self, user_id: &str, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.read_through(&format!("dashboard:{user_id}"), CacheConfig::dashboard(), fetch)
            .await
    }

    /// A leaderboard page, keyed by scope and size.
    pub async fn leaderboard<T, F, Fut>(&self, scope: &str, limit: usize, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.read_through(
            &format!("leaderboard:{scope}:{limit}"),
            CacheConfig::leaderboard(),
            fetch,
        )
        .await
    }

    /// A user's profile.
    pub async fn profile<T, F, Fut>(&self, user_id: &str, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.read_through(&format!("profile:{user_id}"), CacheConfig::profile(), fetch)
            .await
    }

    /// A user's quiz results.
    pub async fn quiz_results<T, F, Fut>(&self, user_id: &str, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.read_through(&format!("quiz:{user_id}"), CacheConfig::quiz_results(), fetch)
            .await
    }

    /// A user's mission progress.
    pub async fn missions<T, F, Fut>(&self, user_id: &str, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.read_through(&format!("missions:{user_id}"), CacheConfig::missions(), fetch)
            .await
    }

    async fn read_through<T, F, Fut>(&self, key: &str, config: CacheConfig, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(cached) = self.store.get(key).await {
            match serde_json::from_value(cached) {
                Ok(value) => {
                    debug!(key, "query served from cache");
                    return Ok(value);
                }
                Err(e) => {
                    // Shape drifted since the entry was written; treat
                    // as a miss and refetch.
                    warn!(key, error = %e, "cached value failed to decode, refetching");
                }
            }
        }

        let fresh = fetch().await?;
        let value = serde_json::to_value(&fresh)?;
        self.store.set(key, value, config.ttl_seconds()).await;
        debug!(key, ttl = config.ttl_seconds(), "query cached");
        Ok(fresh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Dashboard {
        xp: u64,
        level: u32,
    }

    fn queries() -> CachedQueries {
        CachedQueries::new(Arc::new(CacheStore::new()))
    }

    #[tokio::test]
    async fn second_read_skips_the_backend() {
        let queries = queries();
        let fetches = AtomicUsize::new(0);

        for _ in 0..3 {
            let dashboard: Dashboard = queries
                .dashboard("u1", || async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok(Dashboard { xp: 900, level: 9 })
                })
                .await
                .unwrap();
            assert_eq!(dashboard, Dashboard { xp: 900, level: 9 });
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_forces_a_refetch() {
        let queries = queries();
        let fetches = AtomicUsize::new(0);

        let fetch = || async {
            fetches.fetch_add(1, Ordering::SeqCst);
            Ok(Dashboard { xp: 1, level: 1 })
        };

        let _: Dashboard = queries.dashboard("u1", fetch).await.unwrap();
        tokio::time::advance(Duration::from_secs(121)).await;
        let _: Dashboard = queries.dashboard("u1", fetch).await.unwrap();

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fetch_errors_propagate_and_cache_nothing() {
        let queries = queries();

        let result: Result<Dashboard> = queries
            .dashboard("u1", || async { anyhow::bail!("backend down") })
            .await;
        assert!(result.is_err());

        // The failure was not cached; a later fetch still runs.
        let dashboard: Dashboard = queries
            .dashboard("u1", || async { Ok(Dashboard { xp: 5, level: 2 }) })
            .await
            .unwrap();
        assert_eq!(dashboard.xp, 5);
    }

    #[tokio::test]
    async fn domains_do_not_share_keys() {
        let queries = queries();

        let profile: Dashboard = queries
            .profile("u1", || async { Ok(Dashboard { xp: 1, level: 1 }) })
            .await
            .unwrap();
        let dashboard: Dashboard = queries
            .dashboard("u1", || async { Ok(Dashboard { xp: 2, level: 2 }) })
            .await
            .unwrap();

        assert_eq!(profile.xp, 1);
        assert_eq!(dashboard.xp, 2);
    }
}
