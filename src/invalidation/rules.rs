//! Invalidation rules and the built-in rule table.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Maps a cache domain to the key pattern it owns and the semantic data
/// categories whose changes invalidate it.
///
/// Rules are immutable once registered; the dependency set is closed and
/// statically known per domain - the engine never infers dependencies.
#[derive(Debug, Clone)]
pub struct InvalidationRule {
    /// Domain name, e.g. `dashboard-data`.
    pub domain: String,

    /// Glob over cache keys, e.g. `dashboard:*`.
    pub pattern: String,

    /// Data categories that trigger this rule, e.g. `user-xp`.
    pub dependencies: HashSet<String>,

    /// TTL the domain's entries are written with.
    pub ttl_seconds: u64,
}

impl InvalidationRule {
    pub fn new(domain: &str, pattern: &str, dependencies: &[&str], ttl_seconds: u64) -> Self {
        Self {
            domain: domain.to_string(),
            pattern: pattern.to_string(),
            dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
            ttl_seconds,
        }
    }
}

/// The static rule set the engine starts with. Built once; write paths
/// never add rules at runtime, they fire events.
pub(crate) static BUILTIN_RULES: Lazy<Vec<InvalidationRule>> = Lazy::new(|| {
    vec![
        InvalidationRule::new(
            "dashboard-data",
            "dashboard:*",
            &["user-xp", "user-stats", "user-missions"],
            120,
        ),
        InvalidationRule::new(
            "leaderboard-data",
            "leaderboard:*",
            &["user-xp", "leaderboard-standings"],
            180,
        ),
        InvalidationRule::new("user-profile", "profile:*", &["user-profile"], 300),
        InvalidationRule::new("quiz-data", "quiz:*", &["quiz-results"], 600),
        InvalidationRule::new(
            "mission-progress",
            "missions:*",
            &["user-missions", "user-xp"],
            180,
        ),
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_rules_have_unique_domains() {
        let mut seen = HashSet::new();
        for rule in BUILTIN_RULES.iter() {
            assert!(seen.insert(rule.domain.clone()), "duplicate {}", rule.domain);
        }
    }

    #[test]
    fn profile_domain_is_isolated_from_xp_changes() {
        // Quiz and XP writes must never evict profiles.
        let profile = BUILTIN_RULES
            .iter()
            .find(|r| r.domain == "user-profile")
            .unwrap();
        assert!(!profile.dependencies.contains("user-xp"));
        assert!(!profile.dependencies.contains("user-stats"));
    }
}
