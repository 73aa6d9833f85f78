//! Background computation worker pool.
//!
//! CPU-bound work (ranking math, leaderboard filtering, quiz scoring,
//! image URL rewriting) runs in named isolated workers, each with its
//! own request queue and a fixed table of pure operation handlers.
//! Dispatch is correlated: every task gets a pool-unique id, a pending
//! entry, and an independent timeout; responses match callers by id
//! only, so arrival order never matters.
//!
//! ## Architecture
//!
//! - [`TaskWorkerPool`] - explicit, constructed registry with lifecycle
//!   (`new`/`with_default_workers` … `terminate`)
//! - `worker` - the per-worker runtime (queue + blocking execution)
//! - `handlers` - pure operation tables per category
//! - [`WorkerError`] - the typed failure taxonomy callers match on

mod error;
mod handlers;
mod pool;
mod types;
mod worker;

pub use error::WorkerError;
pub use pool::TaskWorkerPool;
pub use types::{
    FilteredLeaderboard, ImageOptimizationPayload, LeaderboardFilters, LeaderboardQuery,
    OptimizedImages, PercentilesPayload, PlayerStanding, QuizAnswer, QuizHistoryPayload,
    QuizScore, QuizSession, QuizSessionPayload, QuizTrendReport, RankedPlayer, RankingMetrics,
    RankingPayload, SortMetric, TrendDirection, ValuePercentile,
};
