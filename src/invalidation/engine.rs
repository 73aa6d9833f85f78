//! Rule-driven cache invalidation.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use parking_lot::RwLock;
use tracing::{debug, warn};

use super::event::WriteEvent;
use super::rules::{BUILTIN_RULES, InvalidationRule};
use crate::cache::CacheStore;

/// Resolves application write events into cache evictions.
///
/// Known actions take a named fast-path; anything else falls back to
/// treating each affected data category as a dependency. The fallback
/// over-invalidates: a new write path works correctly before a rule is
/// authored for it, at the cost of extra re-fetches.
pub struct InvalidationRuleEngine {
    store: Arc<CacheStore>,
    rules: RwLock<HashMap<String, InvalidationRule>>,
}

impl InvalidationRuleEngine {
    /// Engine with an empty rule registry.
    pub fn new(store: Arc<CacheStore>) -> Self {
        Self {
            store,
            rules: RwLock::new(HashMap::new()),
        }
    }

    /// Engine pre-loaded with the built-in domain rules.
    pub fn with_builtin_rules(store: Arc<CacheStore>) -> Self {
        let engine = Self::new(store);
        {
            let mut rules = engine.rules.write();
            for rule in BUILTIN_RULES.iter() {
                rules.insert(rule.domain.clone(), rule.clone());
            }
        }
        debug!(rules = BUILTIN_RULES.len(), "invalidation rules loaded");
        engine
    }

    /// Idempotent upsert into the rule registry.
    pub fn add_rule(&self, name: &str, rule: InvalidationRule) {
        let replaced = self.rules.write().insert(name.to_string(), rule).is_some();
        debug!(name, replaced, "invalidation rule registered");
    }

    /// Number of registered rules.
    #[allow(dead_code)]
    pub fn rule_count(&self) -> usize {
        self.rules.read().len()
    }

    /// Invalidate every rule that declares `dependency`. A dependency no
    /// rule declares is a silent no-op, so new dependency names can ship
    /// ahead of their rules.
    pub async fn invalidate_by_dependency(&self, dependency: &str) {
        let patterns: Vec<String> = {
            let rules = self.rules.read();
            rules
                .values()
                .filter(|rule| rule.dependencies.contains(dependency))
                .map(|rule| rule.pattern.clone())
                .collect()
        };

        if patterns.is_empty() {
            debug!(dependency, "no rule declares dependency, nothing to invalidate");
            return;
        }

        debug!(dependency, rules = patterns.len(), "invalidating by dependency");
        join_all(patterns.iter().map(|pattern| self.store.invalidate(pattern))).await;
    }

    /// Invalidate the named rules directly, bypassing dependency lookup.
    /// Unknown names are silent no-ops.
    pub async fn invalidate_specific(&self, names: &[&str]) {
        let patterns: Vec<String> = {
            let rules = self.rules.read();
            names
                .iter()
                .filter_map(|name| rules.get(*name).map(|rule| rule.pattern.clone()))
                .collect()
        };

        join_all(patterns.iter().map(|pattern| self.store.invalidate(pattern))).await;
    }

    /// Primary entry point for write paths: map the event's action to
    /// the dependencies it dirties, optionally scoped to the user.
    pub async fn smart_invalidate(&self, event: &WriteEvent) {
        debug!(action = %event.action, user = ?event.user_id, "smart invalidation");

        match event.action.as_str() {
            "user-level-up" => {
                self.invalidate_by_dependency("user-xp").await;
                self.invalidate_by_dependency("user-stats").await;
                if let Some(user_id) = &event.user_id {
                    self.invalidate_user_key("dashboard", user_id).await;
                }
            }
            "mission-completed" => {
                self.invalidate_by_dependency("user-missions").await;
                self.invalidate_by_dependency("user-xp").await;
            }
            "quiz-completed" => {
                self.invalidate_by_dependency("quiz-results").await;
                self.invalidate_by_dependency("user-xp").await;
                self.invalidate_by_dependency("user-stats").await;
            }
            "profile-updated" => {
                self.invalidate_by_dependency("user-profile").await;
                if let Some(user_id) = &event.user_id {
                    self.invalidate_user_key("profile", user_id).await;
                }
            }
            other => {
                // Every affected category counts as a dependency until
                // a fast-path is authored for the action.
                warn!(
                    action = other,
                    categories = event.affected_data.len(),
                    "no invalidation fast-path for action, using affected data"
                );
                for category in &event.affected_data {
                    self.invalidate_by_dependency(category).await;
                }
            }
        }
    }

    /// Drop the exact per-user key of a domain (a wildcard-free glob).
    async fn invalidate_user_key(&self, domain: &str, user_id: &str) {
        self.store.invalidate(&format!("{domain}:{user_id}")).await;
    }
}

impl std::fmt::Debug for InvalidationRuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rules = self.rules.read();
        f.debug_struct("InvalidationRuleEngine")
            .field("rule_count", &rules.len())
            .field("domains", &rules.keys().collect::<Vec<_>>())
            .finish()
    }
}
