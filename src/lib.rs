//! Coinquest engine - background computation and tiered caching for a
//! gamified personal-finance learning app.
//!
//! The UI layer stays thin: data hooks read through [`CachedQueries`],
//! heavy computations are offloaded to the [`TaskWorkerPool`], and write
//! paths fire a [`WriteEvent`] so the [`InvalidationRuleEngine`] can
//! evict exactly the cache domains the mutation dirtied.
//!
//! ## Architecture
//!
//! - `config` - environment configuration (everything optional)
//! - `cache` - remote (Redis) + in-process tiers behind one store
//! - `invalidation` - rule-driven, event-keyed cache eviction
//! - `workers` - named isolated workers with correlated dispatch
//! - `queries` - per-domain read-through façade
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use coinquest::{
//!     CacheStore, CachedQueries, Config, InvalidationRuleEngine, TaskWorkerPool, WriteEvent,
//! };
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = Config::from_env();
//! let store = Arc::new(CacheStore::from_config(&config));
//! let queries = CachedQueries::new(Arc::clone(&store));
//! let engine = InvalidationRuleEngine::with_builtin_rules(Arc::clone(&store));
//! let pool = TaskWorkerPool::with_default_workers(&config);
//!
//! let dashboard: serde_json::Value = queries
//!     .dashboard("u1", || async { Ok(serde_json::json!({"xp": 900})) })
//!     .await?;
//!
//! // ... after a successful quiz write:
//! engine
//!     .smart_invalidate(&WriteEvent::new("quiz-completed").for_user("u1"))
//!     .await;
//! pool.terminate();
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod invalidation;
pub mod queries;
pub mod workers;

pub use cache::{CacheConfig, CacheStats, CacheStore, KeyPattern};
pub use config::Config;
pub use invalidation::{InvalidationRule, InvalidationRuleEngine, WriteEvent};
pub use queries::CachedQueries;
pub use workers::{TaskWorkerPool, WorkerError};
