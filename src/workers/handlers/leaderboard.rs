//! Leaderboard filtering and sorting.

use std::cmp::Ordering;

use serde_json::Value;

use super::{HandlerTable, encode, parse};
use crate::workers::types::{FilteredLeaderboard, LeaderboardQuery, PlayerStanding, SortMetric};

pub(crate) const TABLE: HandlerTable = &[("FILTER_LEADERBOARD", filter_leaderboard)];

/// Apply every supplied predicate in one pass over the entries, then
/// stable-sort descending by the requested metric and truncate.
fn filter_leaderboard(payload: Value) -> Result<Value, String> {
    let LeaderboardQuery {
        mut entries,
        filters,
        sort_by,
        limit,
    } = parse(payload)?;

    // Lowercase the needle once, not per entry.
    let needle = filters.search.as_ref().map(|s| s.to_lowercase());

    entries.retain(|entry| {
        filters.min_level.is_none_or(|min| entry.level >= min)
            && filters.max_level.is_none_or(|max| entry.level <= max)
            && filters.min_streak.is_none_or(|min| entry.streak >= min)
            && needle
                .as_ref()
                .is_none_or(|n| entry.name.to_lowercase().contains(n))
    });
    let total_matched = entries.len();

    entries.sort_by(|a, b| {
        metric_of(b, sort_by)
            .partial_cmp(&metric_of(a, sort_by))
            .unwrap_or(Ordering::Equal)
    });

    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    encode(&FilteredLeaderboard {
        entries,
        total_matched,
    })
}

fn metric_of(entry: &PlayerStanding, metric: SortMetric) -> f64 {
    match metric {
        SortMetric::Xp => entry.xp,
        SortMetric::Level => entry.level,
        SortMetric::Streak => entry.streak,
    }
}
