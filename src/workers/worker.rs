//! Worker runtime: an isolated execution context with its own queue.
//!
//! Each worker is a spawned task draining an unbounded request channel.
//! Handlers are CPU-bound and pure, so each one runs on the blocking
//! pool; a long computation never stalls the worker's queue, and
//! responses may therefore arrive out of send order. Correctness relies
//! on correlation ids alone, never on sequencing.

use std::panic::{AssertUnwindSafe, catch_unwind};

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::debug;

use super::handlers::HandlerTable;

/// One dispatched task, correlated by `id`.
pub(crate) struct TaskRequest {
    pub id: u64,
    pub operation: String,
    pub payload: Value,
}

/// A worker's answer to one request.
pub(crate) struct TaskResponse {
    pub id: u64,
    pub outcome: Result<Value, TaskFailure>,
}

/// How a single task failed inside a worker. Never affects the worker's
/// loop or its other tasks.
#[derive(Debug)]
pub(crate) enum TaskFailure {
    UnknownOperation { operation: String },
    Handler { operation: String, message: String },
    Panicked { operation: String },
}

/// Registry entry for a live worker. Dropping the sender closes the
/// worker's queue and ends its loop.
pub(crate) struct WorkerHandle {
    pub sender: mpsc::UnboundedSender<TaskRequest>,
}

/// Spawn a worker hosting the given handler table.
pub(crate) fn spawn_worker(
    name: &str,
    table: HandlerTable,
    responses: mpsc::UnboundedSender<TaskResponse>,
) -> WorkerHandle {
    let (sender, mut requests) = mpsc::unbounded_channel::<TaskRequest>();
    let worker = name.to_string();

    tokio::spawn(async move {
        debug!(worker = %worker, "worker started");
        while let Some(request) = requests.recv().await {
            let TaskRequest {
                id,
                operation,
                payload,
            } = request;

            let Some((_, handler)) = table.iter().find(|(op, _)| *op == operation) else {
                let _ = responses.send(TaskResponse {
                    id,
                    outcome: Err(TaskFailure::UnknownOperation { operation }),
                });
                continue;
            };
            let handler = *handler;
            let responses = responses.clone();

            tokio::task::spawn_blocking(move || {
                // A panicking handler fails its own task only.
                let outcome = match catch_unwind(AssertUnwindSafe(|| handler(payload))) {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(message)) => Err(TaskFailure::Handler { operation, message }),
                    Err(_) => Err(TaskFailure::Panicked { operation }),
                };
                let _ = responses.send(TaskResponse { id, outcome });
            });
        }
        debug!(worker = %worker, "worker stopped");
    });

    WorkerHandle { sender }
}
