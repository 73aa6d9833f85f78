//! Event-driven cache invalidation.
//!
//! Write paths fire a [`WriteEvent`] after a successful mutation; the
//! [`InvalidationRuleEngine`] resolves it against a static table of
//! [`InvalidationRule`]s (domain → key pattern + dependency set) and
//! tells the cache store which patterns to drop. There is no transaction
//! log: selective eviction comes entirely from the dependency graph the
//! rules declare.

mod engine;
mod event;
mod rules;

pub use engine::InvalidationRuleEngine;
pub use event::WriteEvent;
pub use rules::InvalidationRule;
