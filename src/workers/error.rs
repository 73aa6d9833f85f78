//! Worker task errors.

use std::time::Duration;

use thiserror::Error;

/// Failures surfaced by the task worker pool.
///
/// Cache failures are absorbed where they happen; task failures are
/// always handed to the immediate caller, who decides how to degrade
/// (typically a synchronous fallback computation).
#[derive(Debug, Error)]
pub enum WorkerError {
    /// The named worker was never created. A programming error at the
    /// call site; surfaced before any message is sent.
    #[error("worker '{0}' has not been created")]
    WorkerNotFound(String),

    /// No built-in handler category exists under the requested name.
    #[error("no worker category named '{0}'")]
    UnknownCategory(String),

    /// No response arrived within the task budget. Retryable: the
    /// computation may still finish, and its late response is discarded
    /// by correlation-id mismatch.
    #[error("task {id} on worker '{worker}' timed out after {timeout:?}")]
    Timeout {
        worker: String,
        id: u64,
        timeout: Duration,
    },

    /// The operation handler reported a failure (or panicked). Other
    /// tasks on the same worker are unaffected.
    #[error("operation '{operation}' failed: {message}")]
    Handler { operation: String, message: String },

    /// The worker hosts no handler for the requested operation. Fails
    /// that single task only.
    #[error("worker '{worker}' has no operation '{operation}'")]
    UnknownOperation { worker: String, operation: String },
}
