//! Remote cache tier backed by Redis.
//!
//! Connections are pooled and acquired per operation, so the first use
//! establishes the connection lazily and every later operation retries
//! on its own. Failures never cross the store boundary: each method
//! returns a [`RemoteError`] that the store logs and absorbs by falling
//! back to the in-process tier.

use std::sync::atomic::{AtomicBool, Ordering};

use deadpool_redis::{Config as PoolConfig, Connection, Pool, Runtime};
use redis::AsyncCommands;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failures internal to the remote tier. Absorbed by the store.
#[derive(Debug, Error)]
pub(crate) enum RemoteError {
    #[error("invalid remote cache config: {0}")]
    Config(#[from] deadpool_redis::CreatePoolError),

    #[error("remote cache unreachable: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("remote cache command failed: {0}")]
    Command(#[from] redis::RedisError),

    #[error("remote cache payload is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Redis-backed tier. Values are stored as JSON strings with a native
/// TTL (`SET EX`), so expiry on this tier is the server's business.
pub(crate) struct RemoteTier {
    pool: Pool,
    /// Whether the last connection attempt succeeded. Reads drive the
    /// log level on failure (first failure warns, repeats stay at
    /// debug) and the health probe; every operation still re-attempts.
    available: AtomicBool,
}

impl RemoteTier {
    /// Build the tier from a connection string. The pool is created
    /// eagerly but no connection is attempted until first use.
    pub fn connect(url: &str) -> Result<Self, RemoteError> {
        let pool = PoolConfig::from_url(url).create_pool(Some(Runtime::Tokio1))?;
        Ok(Self {
            pool,
            available: AtomicBool::new(false),
        })
    }

    async fn conn(&self) -> Result<Connection, RemoteError> {
        match self.pool.get().await {
            Ok(conn) => {
                if !self.available.swap(true, Ordering::Relaxed) {
                    info!("remote cache tier reachable");
                }
                Ok(conn)
            }
            Err(e) => {
                if self.available.swap(false, Ordering::Relaxed) {
                    warn!(error = %e, "remote cache tier unreachable, in-process tier takes over");
                } else {
                    debug!(error = %e, "remote cache tier still unreachable");
                }
                Err(e.into())
            }
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<Value>, RemoteError> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn.get(key).await?;
        match raw {
            Some(payload) => Ok(Some(serde_json::from_str(&payload)?)),
            None => Ok(None),
        }
    }

    pub async fn set(&self, key: &str, value: &Value, ttl_seconds: u64) -> Result<(), RemoteError> {
        // SET EX rejects a zero expiry; a zero-TTL entry is dead on
        // arrival anyway, so skip the round trip.
        if ttl_seconds == 0 {
            return Ok(());
        }
        let payload = serde_json::to_string(value)?;
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(key, payload, ttl_seconds).await?;
        Ok(())
    }

    /// Delete every key matching the glob pattern via a cursored
    /// `SCAN MATCH`. Returns how many keys were removed.
    pub async fn invalidate(&self, pattern: &str) -> Result<usize, RemoteError> {
        let mut conn = self.conn().await?;
        let mut keys: Vec<String> = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            cursor = next;
            if cursor == 0 {
                break;
            }
        }
        if !keys.is_empty() {
            conn.del::<_, ()>(&keys).await?;
        }
        Ok(keys.len())
    }

    /// Current availability as seen by the last connection attempt, then
    /// refreshed with a live probe.
    pub async fn is_available(&self) -> bool {
        self.conn().await.is_ok()
    }
}

impl std::fmt::Debug for RemoteTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteTier")
            .field("available", &self.available.load(Ordering::Relaxed))
            .finish()
    }
}
