//! Write events fired by mutation paths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a successful write changed. Fired by write paths after the
/// backend mutation commits; the engine turns it into cache evictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteEvent {
    /// The action the write path performed, e.g. `quiz-completed`.
    pub action: String,

    /// User whose data changed, when the write is user-scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Data categories the write touched. Used as the generic fallback
    /// when the action has no named fast-path.
    #[serde(default)]
    pub affected_data: Vec<String>,

    pub occurred_at: DateTime<Utc>,
}

impl WriteEvent {
    pub fn new(action: &str) -> Self {
        Self {
            action: action.to_string(),
            user_id: None,
            affected_data: Vec::new(),
            occurred_at: Utc::now(),
        }
    }

    /// Scope the event to one user.
    #[must_use]
    pub fn for_user(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    /// Record the data categories the write touched.
    #[must_use]
    pub fn affecting(mut self, categories: &[&str]) -> Self {
        self.affected_data = categories.iter().map(|c| c.to_string()).collect();
        self
    }
}
