//! Tiered cache store.
//!
//! Reads prefer the remote tier when one is configured; any remote
//! failure silently falls back to the in-process tier. Writes go to both
//! tiers so a fallback read stays consistent with what was last set. The
//! in-process tier is a cache-of-last-resort, not an authoritative
//! mirror, so the duplicate write is deliberate.

use serde_json::Value;
use tracing::{debug, info, warn};

use super::local::LocalTier;
use super::pattern::KeyPattern;
use super::remote::RemoteTier;
use crate::config::Config;

/// Two-tier key/value cache with per-entry TTLs.
#[derive(Debug)]
pub struct CacheStore {
    local: LocalTier,
    remote: Option<RemoteTier>,
}

/// Point-in-time observability snapshot.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub local_entries: usize,
    pub remote_configured: bool,
}

impl CacheStore {
    /// In-process-only store.
    pub fn new() -> Self {
        info!("cache store initialized (in-process tier only)");
        Self {
            local: LocalTier::new(),
            remote: None,
        }
    }

    /// Store with a remote tier. An invalid connection string degrades
    /// to in-process-only caching rather than failing construction; the
    /// first connection attempt happens on first use.
    pub fn with_remote(url: &str) -> Self {
        match RemoteTier::connect(url) {
            Ok(remote) => {
                info!("cache store initialized (remote + in-process tiers)");
                Self {
                    local: LocalTier::new(),
                    remote: Some(remote),
                }
            }
            Err(e) => {
                warn!(error = %e, "remote cache tier disabled, using in-process tier only");
                Self::new()
            }
        }
    }

    /// Build from application config: a configured `REDIS_URL` enables
    /// the remote tier, anything else is local-only.
    pub fn from_config(config: &Config) -> Self {
        match &config.redis_url {
            Some(url) => Self::with_remote(url),
            None => Self::new(),
        }
    }

    /// Read a key. Never returns an expired entry.
    pub async fn get(&self, key: &str) -> Option<Value> {
        if let Some(remote) = &self.remote {
            match remote.get(key).await {
                Ok(Some(value)) => {
                    debug!(key, "cache hit (remote)");
                    return Some(value);
                }
                Ok(None) => {}
                Err(e) => {
                    debug!(key, error = %e, "remote read failed, falling back");
                }
            }
        }
        let hit = self.local.get(key);
        debug!(key, hit = hit.is_some(), "cache read (in-process)");
        hit
    }

    /// Write a key with a TTL in seconds. Remote failures are absorbed;
    /// the in-process tier is always refreshed.
    pub async fn set(&self, key: &str, value: Value, ttl_seconds: u64) {
        if let Some(remote) = &self.remote {
            if let Err(e) = remote.set(key, &value, ttl_seconds).await {
                debug!(key, error = %e, "remote write failed, in-process tier keeps the entry");
            }
        }
        self.local.set(key, value, ttl_seconds);
        debug!(key, ttl_seconds, "cache set");
    }

    /// Delete every key matching the glob pattern from both tiers.
    pub async fn invalidate(&self, pattern: &str) {
        if let Some(remote) = &self.remote {
            match remote.invalidate(pattern).await {
                Ok(removed) => debug!(pattern, removed, "cache invalidated (remote)"),
                Err(e) => debug!(pattern, error = %e, "remote invalidation failed"),
            }
        }
        let removed = self.local.invalidate(&KeyPattern::compile(pattern));
        debug!(pattern, removed, "cache invalidated (in-process)");
    }

    /// Live probe of the remote tier; `false` when none is configured.
    #[allow(dead_code)]
    pub async fn is_remote_available(&self) -> bool {
        match &self.remote {
            Some(remote) => remote.is_available().await,
            None => false,
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            local_entries: self.local.len(),
            remote_configured: self.remote.is_some(),
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}
