//! Glob pattern compiler for cache key matching.
//!
//! Invalidation patterns use `*` as a wildcard for zero-or-more
//! characters, matching the glob syntax of the remote tier's `SCAN MATCH`
//! command so both tiers agree on what a pattern selects. Patterns are
//! compiled once into literal segments and matched by anchored substring
//! search, so the semantics are testable without the remote tier.

/// A compiled key pattern.
///
/// A pattern without `*` matches exactly one key. `*` spans zero or more
/// characters; multiple wildcards are supported.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    /// Literal segments between wildcards. A single segment means the
    /// pattern had no wildcard at all.
    segments: Vec<String>,
}

impl KeyPattern {
    /// Compile a glob pattern into a matcher.
    pub fn compile(pattern: &str) -> Self {
        Self {
            segments: pattern.split('*').map(str::to_string).collect(),
        }
    }

    /// Check whether a key matches this pattern.
    pub fn matches(&self, key: &str) -> bool {
        let first = &self.segments[0];

        // No wildcard: exact match only.
        if self.segments.len() == 1 {
            return key == first;
        }

        // First segment anchors the start, last anchors the end.
        let Some(mut rest) = key.strip_prefix(first.as_str()) else {
            return false;
        };
        let last = &self.segments[self.segments.len() - 1];
        if rest.len() < last.len() {
            return false;
        }
        let Some(body) = rest.strip_suffix(last.as_str()) else {
            return false;
        };
        rest = body;

        // Middle segments must appear in order in what's left.
        for segment in &self.segments[1..self.segments.len() - 1] {
            match rest.find(segment.as_str()) {
                Some(pos) => rest = &rest[pos + segment.len()..],
                None => return false,
            }
        }
        true
    }

    /// The source form of the pattern.
    #[allow(dead_code)]
    pub fn as_glob(&self) -> String {
        self.segments.join("*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_without_wildcard() {
        let p = KeyPattern::compile("dashboard:u1");
        assert!(p.matches("dashboard:u1"));
        assert!(!p.matches("dashboard:u12"));
        assert!(!p.matches("dashboard:u"));
    }

    #[test]
    fn trailing_wildcard_matches_prefix() {
        let p = KeyPattern::compile("leaderboard:*");
        assert!(p.matches("leaderboard:"));
        assert!(p.matches("leaderboard:weekly:50"));
        assert!(!p.matches("dashboard:weekly"));
    }

    #[test]
    fn leading_wildcard_matches_suffix() {
        let p = KeyPattern::compile("*:u1");
        assert!(p.matches("dashboard:u1"));
        assert!(p.matches(":u1"));
        assert!(!p.matches("dashboard:u1:extra"));
    }

    #[test]
    fn inner_wildcard_spans_zero_or_more() {
        let p = KeyPattern::compile("quiz:*:results");
        assert!(p.matches("quiz::results"));
        assert!(p.matches("quiz:u1:results"));
        assert!(p.matches("quiz:u1:2024:results"));
        assert!(!p.matches("quiz:u1:result"));
    }

    #[test]
    fn multiple_wildcards_keep_segment_order() {
        let p = KeyPattern::compile("a*b*c");
        assert!(p.matches("abc"));
        assert!(p.matches("a-b-c"));
        assert!(p.matches("axxbxxc"));
        assert!(!p.matches("acb"));
    }

    #[test]
    fn overlapping_anchors_do_not_double_count() {
        // "ab" cannot satisfy both the "ab" prefix and the "b" suffix
        // from the same character.
        let p = KeyPattern::compile("ab*b");
        assert!(!p.matches("ab"));
        assert!(p.matches("abb"));
        assert!(p.matches("abxb"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let p = KeyPattern::compile("stats:[week].*");
        assert!(p.matches("stats:[week]."));
        assert!(p.matches("stats:[week].json"));
        assert!(!p.matches("stats:week"));
    }
}
