//! Cache TTL policy per data domain.

use std::time::Duration;

/// TTL policy for one cached data domain.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// How long entries in this domain stay valid.
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300), // 5 minutes
        }
    }
}

impl CacheConfig {
    /// Set the TTL (builder pattern).
    #[must_use]
    #[allow(dead_code)]
    pub fn ttl(mut self, duration: Duration) -> Self {
        self.ttl = duration;
        self
    }

    /// TTL in whole seconds, as the store expects.
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl.as_secs()
    }

    /// Dashboard data: refreshed often, short TTL.
    pub fn dashboard() -> Self {
        Self {
            ttl: Duration::from_secs(120), // 2 minutes
        }
    }

    /// Leaderboard standings: tolerates slightly staler reads.
    pub fn leaderboard() -> Self {
        Self {
            ttl: Duration::from_secs(180), // 3 minutes
        }
    }

    /// Profile data: changes rarely.
    pub fn profile() -> Self {
        Self {
            ttl: Duration::from_secs(300), // 5 minutes
        }
    }

    /// Quiz results: immutable once written, longest TTL.
    pub fn quiz_results() -> Self {
        Self {
            ttl: Duration::from_secs(600), // 10 minutes
        }
    }

    /// Mission progress: advances with play, medium TTL.
    pub fn missions() -> Self {
        Self {
            ttl: Duration::from_secs(180), // 3 minutes
        }
    }
}
