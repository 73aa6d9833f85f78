//! Ranking math: weighted scoring and percentiles.

use std::cmp::Ordering;

use serde_json::Value;

use super::{HandlerTable, encode, parse};
use crate::workers::types::{
    PercentilesPayload, PlayerStanding, RankedPlayer, RankingPayload, ValuePercentile,
};

pub(crate) const TABLE: HandlerTable = &[
    ("CALCULATE_ADVANCED_RANKINGS", calculate_advanced_rankings),
    ("CALCULATE_PERCENTILES", calculate_percentiles),
];

/// Score every player with the supplied metric weights and rank them
/// descending. The sort is stable: players with equal scores keep their
/// input order, which makes tie-breaks deterministic.
fn calculate_advanced_rankings(payload: Value) -> Result<Value, String> {
    let RankingPayload { users, metrics } = parse(payload)?;
    let total = users.len();

    let mut scored: Vec<(f64, PlayerStanding)> = users
        .into_iter()
        .map(|player| (metrics.score(&player), player))
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

    let ranked: Vec<RankedPlayer> = scored
        .into_iter()
        .enumerate()
        .map(|(index, (score, player))| RankedPlayer {
            player,
            score,
            rank: index + 1,
            percentile: percentile_for(index + 1, total),
        })
        .collect();

    encode(&ranked)
}

/// `round((1 - rank/total) × 100)`: rank 1 of 2 is the 50th percentile,
/// last place is always 0.
pub(crate) fn percentile_for(rank: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    ((1.0 - rank as f64 / total as f64) * 100.0).round() as i64
}

/// Percentile of each value within the set: the share of values
/// strictly below it.
fn calculate_percentiles(payload: Value) -> Result<Value, String> {
    let PercentilesPayload { values } = parse(payload)?;
    let total = values.len();

    let result: Vec<ValuePercentile> = values
        .iter()
        .map(|&value| {
            let below = values.iter().filter(|&&other| other < value).count();
            let percentile = if total == 0 {
                0
            } else {
                (below as f64 / total as f64 * 100.0).round() as i64
            };
            ValuePercentile { value, percentile }
        })
        .collect();

    encode(&result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rankings_sort_descending_by_weighted_score() {
        let result = calculate_advanced_rankings(json!({
            "users": [
                {"name": "a", "xp": 10.0, "level": 1.0},
                {"name": "b", "xp": 200.0, "level": 2.0},
            ],
            "metrics": {"xpWeight": 1.0, "levelWeight": 10.0},
        }))
        .unwrap();

        let ranked: Vec<RankedPlayer> = serde_json::from_value(result).unwrap();
        assert_eq!(ranked[0].player.name, "b");
        assert_eq!(ranked[0].score, 220.0);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].player.name, "a");
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn exact_ties_preserve_input_order() {
        // Both players score 150; the stable sort keeps the first input
        // first.
        let result = calculate_advanced_rankings(json!({
            "users": [
                {"name": "first", "xp": 100.0, "level": 5.0},
                {"name": "second", "xp": 50.0, "level": 10.0},
            ],
            "metrics": {"xpWeight": 1.0, "levelWeight": 10.0},
        }))
        .unwrap();

        let ranked: Vec<RankedPlayer> = serde_json::from_value(result).unwrap();
        assert_eq!(ranked[0].score, ranked[1].score);
        assert_eq!(ranked[0].player.name, "first");
        assert_eq!(ranked[1].player.name, "second");
    }

    #[test]
    fn percentile_formula() {
        assert_eq!(percentile_for(1, 2), 50);
        assert_eq!(percentile_for(2, 2), 0);
        assert_eq!(percentile_for(1, 100), 99);
        assert_eq!(percentile_for(25, 100), 75);
        assert_eq!(percentile_for(0, 0), 0);
    }

    #[test]
    fn percentiles_count_values_strictly_below() {
        let result = calculate_percentiles(json!({"values": [10.0, 20.0, 30.0, 40.0]})).unwrap();
        let percentiles: Vec<ValuePercentile> = serde_json::from_value(result).unwrap();
        let by_value: Vec<i64> = percentiles.iter().map(|p| p.percentile).collect();
        assert_eq!(by_value, vec![0, 25, 50, 75]);
    }

    #[test]
    fn missing_metrics_default_to_zero_weights() {
        let result = calculate_advanced_rankings(json!({
            "users": [{"name": "a", "xp": 10.0}],
        }))
        .unwrap();
        let ranked: Vec<RankedPlayer> = serde_json::from_value(result).unwrap();
        assert_eq!(ranked[0].score, 0.0);
    }

    #[test]
    fn malformed_payload_is_a_handler_error() {
        let err = calculate_advanced_rankings(json!({"users": "not-a-list"})).unwrap_err();
        assert!(err.contains("invalid payload"));
    }
}
