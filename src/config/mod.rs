//! Configuration module for the engine.
//!
//! Loads configuration from environment variables. Every variable is
//! optional: with nothing set the engine runs with in-process-only
//! caching and default budgets.

use std::env;
use std::time::Duration;

use tracing::warn;
use url::Url;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote cache tier connection string. `None` disables the remote
    /// tier entirely.
    pub redis_url: Option<String>,

    /// Per-task budget for worker computations.
    pub task_timeout: Duration,

    /// Fallback TTL for cache writes outside the per-domain presets.
    pub default_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            redis_url: None,
            task_timeout: Duration::from_secs(10),
            default_ttl: Duration::from_secs(300),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or invalid values fall back to defaults; an unparseable
    /// `REDIS_URL` disables the remote tier with a warning rather than
    /// failing startup.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let redis_url = env::var("REDIS_URL")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| match Url::parse(&s) {
                Ok(_) => Some(s),
                Err(e) => {
                    warn!(error = %e, "REDIS_URL is not a valid URL, remote cache tier disabled");
                    None
                }
            });

        Self {
            redis_url,
            task_timeout: duration_var("WORKER_TASK_TIMEOUT_SECS", 10),
            default_ttl: duration_var("CACHE_DEFAULT_TTL_SECS", 300),
        }
    }
}

fn duration_var(name: &str, default_secs: u64) -> Duration {
    let secs = env::var(name)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(default_secs);
    Duration::from_secs(secs)
}
