//! In-process cache tier.
//!
//! A lock-free map of key to expiring entry. This tier is the fallback
//! when the remote tier is unreachable, and the cache-of-last-resort the
//! store always writes through to. It cannot fail: every operation is a
//! plain map access plus an expiry check.

use std::time::Duration;

use dashmap::DashMap;
use serde_json::Value;
use tracing::debug;

use super::entry::CacheEntry;
use super::pattern::KeyPattern;

/// In-process tier backed by a `DashMap`.
#[derive(Debug, Default)]
pub struct LocalTier {
    entries: DashMap<String, CacheEntry>,
}

impl LocalTier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a key. Expired entries are evicted and reported as absent.
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired() {
                return Some(entry.value().value().clone());
            }
            // Release the read guard before removing the key.
            drop(entry);
            self.entries.remove(key);
            debug!(key, "evicted expired entry");
        }
        None
    }

    /// Write or refresh a key with a TTL in seconds. A TTL of 0 expires
    /// immediately.
    pub fn set(&self, key: &str, value: Value, ttl_seconds: u64) {
        self.entries.insert(
            key.to_string(),
            CacheEntry::new(value, Duration::from_secs(ttl_seconds)),
        );
    }

    /// Remove every key matching the pattern. Returns how many were
    /// dropped.
    pub fn invalidate(&self, pattern: &KeyPattern) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| !pattern.matches(key));
        before - self.entries.len()
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn set_then_get_within_ttl() {
        let tier = LocalTier::new();
        tier.set("dashboard:u1", json!({"xp": 120}), 60);

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(tier.get("dashboard:u1"), Some(json!({"xp": 120})));
    }

    #[tokio::test(start_paused = true)]
    async fn read_past_ttl_is_absent_and_evicts() {
        let tier = LocalTier::new();
        tier.set("dashboard:u1", json!(1), 60);

        tokio::time::advance(Duration::from_secs(60)).await;
        assert_eq!(tier.get("dashboard:u1"), None);
        // Expiry-on-read removed the entry, not just hid it.
        assert_eq!(tier.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_ttl_expires_immediately() {
        let tier = LocalTier::new();
        tier.set("k", json!(true), 0);
        assert_eq!(tier.get("k"), None);
    }

    #[tokio::test]
    async fn set_refreshes_existing_key() {
        let tier = LocalTier::new();
        tier.set("k", json!(1), 60);
        tier.set("k", json!(2), 60);
        assert_eq!(tier.get("k"), Some(json!(2)));
        assert_eq!(tier.len(), 1);
    }

    #[tokio::test]
    async fn invalidate_removes_only_matching_keys() {
        let tier = LocalTier::new();
        tier.set("leaderboard:weekly:50", json!([]), 180);
        tier.set("leaderboard:monthly:50", json!([]), 180);
        tier.set("profile:u1", json!({}), 300);

        let removed = tier.invalidate(&KeyPattern::compile("leaderboard:*"));
        assert_eq!(removed, 2);
        assert_eq!(tier.get("leaderboard:weekly:50"), None);
        assert_eq!(tier.get("profile:u1"), Some(json!({})));
    }
}
