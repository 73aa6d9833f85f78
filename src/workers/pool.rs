//! Task worker pool: registry, correlation, and timeouts.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::error::WorkerError;
use super::handlers;
use super::types::{
    FilteredLeaderboard, ImageOptimizationPayload, LeaderboardQuery, OptimizedImages,
    PlayerStanding, QuizAnswer, QuizHistoryPayload, QuizScore, QuizSession, QuizSessionPayload,
    QuizTrendReport, RankedPlayer, RankingMetrics, RankingPayload,
};
use super::worker::{TaskFailure, TaskRequest, TaskResponse, WorkerHandle, spawn_worker};
use crate::config::Config;

/// A caller waiting on a response. Removed on resolve, reject, or
/// timeout, whichever comes first; a response arriving after removal is
/// dropped by the router.
struct PendingTask {
    worker: String,
    reply: oneshot::Sender<Result<Value, WorkerError>>,
}

/// Manages a set of named isolated workers and correlates their
/// asynchronous responses back to callers.
///
/// Constructed explicitly and passed by reference to consumers; there is
/// no process-wide pool. `terminate` ends the workers; tasks still
/// pending at that point reject through their own timeouts rather than
/// immediately (accepted limitation).
pub struct TaskWorkerPool {
    workers: DashMap<String, WorkerHandle>,
    pending: Arc<Mutex<HashMap<u64, PendingTask>>>,
    responses: mpsc::UnboundedSender<TaskResponse>,
    next_id: AtomicU64,
    task_timeout: Duration,
}

impl TaskWorkerPool {
    /// Empty pool with the given per-task budget.
    pub fn new(task_timeout: Duration) -> Self {
        let (responses, rx) = mpsc::unbounded_channel();
        let pending: Arc<Mutex<HashMap<u64, PendingTask>>> = Arc::new(Mutex::new(HashMap::new()));

        tokio::spawn(route_responses(rx, Arc::clone(&pending)));

        info!(timeout = ?task_timeout, "task worker pool initialized");
        Self {
            workers: DashMap::new(),
            pending,
            responses,
            next_id: AtomicU64::new(0),
            task_timeout,
        }
    }

    /// Pool pre-loaded with every built-in worker category.
    pub fn with_default_workers(config: &Config) -> Self {
        let pool = Self::new(config.task_timeout);
        for category in handlers::CATEGORIES {
            if let Some(table) = handlers::table_for(category) {
                pool.register(category, table);
            }
        }
        pool
    }

    /// Create the named worker. Idempotent: an existing worker is left
    /// untouched and no duplicate context is spawned.
    pub fn create_worker(&self, name: &str) -> Result<(), WorkerError> {
        let table = handlers::table_for(name)
            .ok_or_else(|| WorkerError::UnknownCategory(name.to_string()))?;
        self.register(name, table);
        Ok(())
    }

    fn register(&self, name: &str, table: handlers::HandlerTable) {
        if self.workers.contains_key(name) {
            debug!(worker = name, "worker already registered");
            return;
        }
        self.workers
            .entry(name.to_string())
            .or_insert_with(|| spawn_worker(name, table, self.responses.clone()));
        info!(worker = name, "worker created");
    }

    /// Number of live workers.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Dispatch one operation to the named worker and await its result.
    ///
    /// Fails fast with [`WorkerError::WorkerNotFound`] before anything is
    /// sent if the worker does not exist. Otherwise the task either
    /// resolves with the worker's response or rejects with
    /// [`WorkerError::Timeout`] when the budget elapses; a late response
    /// after a timeout is discarded, it cannot resolve a different call.
    pub async fn run_task(
        &self,
        worker: &str,
        operation: &str,
        payload: Value,
    ) -> Result<Value, WorkerError> {
        let sender = match self.workers.get(worker) {
            Some(handle) => handle.sender.clone(),
            None => return Err(WorkerError::WorkerNotFound(worker.to_string())),
        };

        // Monotonic, pool-scoped: an id is never reused while its task
        // is in flight.
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let (reply, rx) = oneshot::channel();
        self.pending.lock().insert(
            id,
            PendingTask {
                worker: worker.to_string(),
                reply,
            },
        );
        debug!(worker, operation, id, "dispatching task");

        if sender
            .send(TaskRequest {
                id,
                operation: operation.to_string(),
                payload,
            })
            .is_err()
        {
            // The worker's queue closed between lookup and send.
            self.pending.lock().remove(&id);
            return Err(WorkerError::WorkerNotFound(worker.to_string()));
        }

        match tokio::time::timeout(self.task_timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_closed)) => {
                // Router gone without answering; only happens while the
                // pool itself is being torn down.
                self.pending.lock().remove(&id);
                Err(WorkerError::Timeout {
                    worker: worker.to_string(),
                    id,
                    timeout: self.task_timeout,
                })
            }
            Err(_elapsed) => {
                // Detach first so a late response is ignored.
                self.pending.lock().remove(&id);
                warn!(worker, operation, id, "task timed out");
                Err(WorkerError::Timeout {
                    worker: worker.to_string(),
                    id,
                    timeout: self.task_timeout,
                })
            }
        }
    }

    /// Dispose all workers. Tasks still pending reject via their own
    /// timeouts; the pool promises no earlier rejection.
    pub fn terminate(&self) {
        let count = self.workers.len();
        self.workers.clear();
        info!(workers = count, "task worker pool terminated");
    }

    async fn run_typed<P, R>(&self, worker: &str, operation: &str, payload: &P) -> Result<R, WorkerError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_value(payload).map_err(|e| WorkerError::Handler {
            operation: operation.to_string(),
            message: format!("payload failed to encode: {e}"),
        })?;
        let result = self.run_task(worker, operation, payload).await?;
        serde_json::from_value(result).map_err(|e| WorkerError::Handler {
            operation: operation.to_string(),
            message: format!("result failed to decode: {e}"),
        })
    }

    /// Rank players by weighted score on the `ranking` worker.
    pub async fn compute_rankings(
        &self,
        users: Vec<PlayerStanding>,
        metrics: RankingMetrics,
    ) -> Result<Vec<RankedPlayer>, WorkerError> {
        self.run_typed(
            "ranking",
            "CALCULATE_ADVANCED_RANKINGS",
            &RankingPayload { users, metrics },
        )
        .await
    }

    /// Filter and sort a leaderboard on the `data` worker.
    pub async fn filter_leaderboard(
        &self,
        query: LeaderboardQuery,
    ) -> Result<FilteredLeaderboard, WorkerError> {
        self.run_typed("data", "FILTER_LEADERBOARD", &query).await
    }

    /// Score one quiz session on the `calculation` worker.
    pub async fn score_quiz_session(
        &self,
        answers: Vec<QuizAnswer>,
    ) -> Result<QuizScore, WorkerError> {
        self.run_typed(
            "calculation",
            "SCORE_QUIZ_SESSION",
            &QuizSessionPayload { answers },
        )
        .await
    }

    /// Classify a player's quiz trend on the `calculation` worker.
    pub async fn analyze_quiz_history(
        &self,
        sessions: Vec<QuizSession>,
        window: usize,
    ) -> Result<QuizTrendReport, WorkerError> {
        self.run_typed(
            "calculation",
            "ANALYZE_QUIZ_HISTORY",
            &QuizHistoryPayload { sessions, window },
        )
        .await
    }

    /// Rewrite image URLs with resize parameters on the
    /// `image_processing` worker.
    pub async fn optimize_image_urls(
        &self,
        urls: Vec<String>,
        width: Option<u32>,
        quality: Option<u32>,
    ) -> Result<Vec<String>, WorkerError> {
        let result: OptimizedImages = self
            .run_typed(
                "image_processing",
                "OPTIMIZE_IMAGE_URLS",
                &ImageOptimizationPayload {
                    urls,
                    width,
                    quality,
                },
            )
            .await?;
        Ok(result.urls)
    }
}

impl std::fmt::Debug for TaskWorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskWorkerPool")
            .field("workers", &self.workers.len())
            .field("pending", &self.pending.lock().len())
            .finish()
    }
}

/// Complete pending callers as responses arrive. A response whose id has
/// no pending entry (timed out, or the caller gave up) is dropped.
async fn route_responses(
    mut responses: mpsc::UnboundedReceiver<TaskResponse>,
    pending: Arc<Mutex<HashMap<u64, PendingTask>>>,
) {
    while let Some(response) = responses.recv().await {
        let entry = pending.lock().remove(&response.id);
        match entry {
            Some(task) => {
                let outcome = response
                    .outcome
                    .map_err(|failure| failure_to_error(&task.worker, failure));
                let _ = task.reply.send(outcome);
            }
            None => {
                debug!(id = response.id, "dropping response with no pending task");
            }
        }
    }
}

fn failure_to_error(worker: &str, failure: TaskFailure) -> WorkerError {
    match failure {
        TaskFailure::UnknownOperation { operation } => WorkerError::UnknownOperation {
            worker: worker.to_string(),
            operation,
        },
        TaskFailure::Handler { operation, message } => WorkerError::Handler { operation, message },
        TaskFailure::Panicked { operation } => WorkerError::Handler {
            operation,
            message: "operation handler panicked".to_string(),
        },
    }
}
