//! Typed payload and result models for worker operations.
//!
//! Wire payloads stay camelCase so the UI layer can pass its objects
//! through unchanged; these models are the typed face of the same data.

use serde::{Deserialize, Serialize};

/// A player's standing metrics as the leaderboard sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStanding {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub xp: f64,
    #[serde(default)]
    pub level: f64,
    #[serde(default)]
    pub streak: f64,
}

/// Weights applied to each metric when scoring a player.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingMetrics {
    #[serde(default)]
    pub xp_weight: f64,
    #[serde(default)]
    pub level_weight: f64,
    #[serde(default)]
    pub streak_weight: f64,
}

impl RankingMetrics {
    /// Weighted score: the sum of each metric times its weight.
    pub fn score(&self, player: &PlayerStanding) -> f64 {
        player.xp * self.xp_weight
            + player.level * self.level_weight
            + player.streak * self.streak_weight
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingPayload {
    pub users: Vec<PlayerStanding>,
    #[serde(default)]
    pub metrics: RankingMetrics,
}

/// One row of a computed ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedPlayer {
    #[serde(flatten)]
    pub player: PlayerStanding,
    pub score: f64,
    /// 1-based position after the stable descending sort.
    pub rank: usize,
    /// `round((1 - rank/total) × 100)`.
    pub percentile: i64,
}

/// Predicates applied to leaderboard entries in a single pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardFilters {
    pub min_level: Option<f64>,
    pub max_level: Option<f64>,
    pub min_streak: Option<f64>,
    /// Case-insensitive substring match on the player name.
    pub search: Option<String>,
}

/// Which metric orders the leaderboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMetric {
    #[default]
    Xp,
    Level,
    Streak,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    pub entries: Vec<PlayerStanding>,
    #[serde(default)]
    pub filters: LeaderboardFilters,
    #[serde(default)]
    pub sort_by: SortMetric,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredLeaderboard {
    pub entries: Vec<PlayerStanding>,
    /// How many entries survived the filters, before any limit.
    pub total_matched: usize,
}

/// One answered question of a quiz session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizAnswer {
    pub correct: bool,
    #[serde(default = "default_points")]
    pub points: f64,
}

fn default_points() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSessionPayload {
    pub answers: Vec<QuizAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizScore {
    pub score: f64,
    pub max_score: f64,
    /// Fraction of answers that were correct, 0 for an empty session.
    pub accuracy: f64,
}

/// A past quiz session, oldest first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuizSession {
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizHistoryPayload {
    pub sessions: Vec<QuizSession>,
    /// Trailing window length for the trend comparison.
    #[serde(default = "default_window")]
    pub window: usize,
}

fn default_window() -> usize {
    5
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizTrendReport {
    pub average: f64,
    pub recent_average: f64,
    pub prior_average: f64,
    pub trend: TrendDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentilesPayload {
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuePercentile {
    pub value: f64,
    pub percentile: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptimizationPayload {
    pub urls: Vec<String>,
    pub width: Option<u32>,
    pub quality: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizedImages {
    pub urls: Vec<String>,
}
