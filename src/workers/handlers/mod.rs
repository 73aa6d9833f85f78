//! Pure operation handlers, grouped per worker category.
//!
//! Every handler is a state-free transformation of a JSON payload: no
//! I/O, deterministic, safe to retry. Each worker category hosts a fixed
//! table of handlers resolved by operation name; unknown operations fail
//! the single task that named them.

pub(crate) mod image;
pub(crate) mod leaderboard;
pub(crate) mod quiz;
pub(crate) mod ranking;

#[cfg(test)]
pub(crate) mod diagnostics;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A pure operation handler.
pub(crate) type OperationFn = fn(Value) -> Result<Value, String>;

/// Fixed operation table of one worker category.
pub(crate) type HandlerTable = &'static [(&'static str, OperationFn)];

/// The worker categories every pool starts with.
pub(crate) const CATEGORIES: &[&str] = &["calculation", "data", "ranking", "image_processing"];

/// Resolve the handler table for a category name.
pub(crate) fn table_for(category: &str) -> Option<HandlerTable> {
    match category {
        "calculation" => Some(quiz::TABLE),
        "data" => Some(leaderboard::TABLE),
        "ranking" => Some(ranking::TABLE),
        "image_processing" => Some(image::TABLE),
        #[cfg(test)]
        "diagnostics" => Some(diagnostics::TABLE),
        _ => None,
    }
}

/// Decode a payload into its typed form, with the error surfaced as the
/// handler's failure message.
pub(crate) fn parse<T: DeserializeOwned>(payload: Value) -> Result<T, String> {
    serde_json::from_value(payload).map_err(|e| format!("invalid payload: {e}"))
}

/// Encode a typed result back into the wire form.
pub(crate) fn encode<T: Serialize>(result: &T) -> Result<Value, String> {
    serde_json::to_value(result).map_err(|e| format!("result failed to encode: {e}"))
}
