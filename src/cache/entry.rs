//! Cache entry with a per-entry expiry deadline.

use std::time::Duration;

use serde_json::Value;
use tokio::time::Instant;

/// A single cached value and the instant it stops being valid.
///
/// Entries are self-expiring: a read at or past `expires_at` is treated
/// as absence and the entry is evicted by the tier that holds it.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    /// Create an entry valid for `ttl` from now.
    ///
    /// A zero TTL produces an entry that is already expired: callers that
    /// pass 0 get immediate-expiry semantics rather than an error.
    pub fn new(value: Value, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    /// Whether the deadline has passed.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// The cached value.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn entry_expires_at_its_deadline() {
        let entry = CacheEntry::new(Value::from(42), Duration::from_secs(10));
        assert!(!entry.is_expired());

        tokio::time::advance(Duration::from_secs(9)).await;
        assert!(!entry.is_expired());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(entry.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_ttl_is_expired_immediately() {
        let entry = CacheEntry::new(Value::from("x"), Duration::ZERO);
        assert!(entry.is_expired());
    }
}
