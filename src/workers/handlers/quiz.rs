//! Quiz session scoring and history trend analysis.

use serde_json::Value;

use super::{HandlerTable, encode, parse};
use crate::workers::types::{
    QuizHistoryPayload, QuizScore, QuizSessionPayload, QuizTrendReport, TrendDirection,
};

pub(crate) const TABLE: HandlerTable = &[
    ("SCORE_QUIZ_SESSION", score_quiz_session),
    ("ANALYZE_QUIZ_HISTORY", analyze_quiz_history),
];

fn score_quiz_session(payload: Value) -> Result<Value, String> {
    let QuizSessionPayload { answers } = parse(payload)?;

    let max_score: f64 = answers.iter().map(|a| a.points).sum();
    let score: f64 = answers.iter().filter(|a| a.correct).map(|a| a.points).sum();
    let accuracy = if answers.is_empty() {
        0.0
    } else {
        answers.iter().filter(|a| a.correct).count() as f64 / answers.len() as f64
    };

    encode(&QuizScore {
        score,
        max_score,
        accuracy,
    })
}

/// Compare the trailing window against the window before it. A recent
/// average more than 10% above the prior one is improving, more than
/// 10% below is declining, anything in between is stable.
fn analyze_quiz_history(payload: Value) -> Result<Value, String> {
    let QuizHistoryPayload { sessions, window } = parse(payload)?;

    let scores: Vec<f64> = sessions.iter().map(|s| s.score).collect();
    let window = window.max(1);

    let recent_start = scores.len().saturating_sub(window);
    let prior_start = recent_start.saturating_sub(window);
    let recent = &scores[recent_start..];
    let prior = &scores[prior_start..recent_start];

    let average = mean(&scores);
    let recent_average = mean(recent);
    let prior_average = mean(prior);

    let trend = if prior.is_empty() {
        TrendDirection::Stable
    } else {
        classify(recent_average, prior_average)
    };

    encode(&QuizTrendReport {
        average,
        recent_average,
        prior_average,
        trend,
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn classify(recent: f64, prior: f64) -> TrendDirection {
    if recent > prior * 1.10 {
        TrendDirection::Improving
    } else if recent < prior * 0.90 {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn analyze(scores: &[f64], window: usize) -> QuizTrendReport {
        let sessions: Vec<Value> = scores.iter().map(|s| json!({"score": s})).collect();
        let result =
            analyze_quiz_history(json!({"sessions": sessions, "window": window})).unwrap();
        serde_json::from_value(result).unwrap()
    }

    #[test]
    fn scoring_sums_points_of_correct_answers() {
        let result = score_quiz_session(json!({
            "answers": [
                {"correct": true, "points": 2.0},
                {"correct": false, "points": 2.0},
                {"correct": true},
            ],
        }))
        .unwrap();
        let score: QuizScore = serde_json::from_value(result).unwrap();
        assert_eq!(score.score, 3.0);
        assert_eq!(score.max_score, 5.0);
        assert!((score.accuracy - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_session_scores_zero() {
        let result = score_quiz_session(json!({"answers": []})).unwrap();
        let score: QuizScore = serde_json::from_value(result).unwrap();
        assert_eq!(score.score, 0.0);
        assert_eq!(score.accuracy, 0.0);
    }

    #[test]
    fn rising_scores_classify_as_improving() {
        let report = analyze(&[5.0, 5.0, 5.0, 8.0, 8.0, 8.0], 3);
        assert_eq!(report.trend, TrendDirection::Improving);
        assert_eq!(report.recent_average, 8.0);
        assert_eq!(report.prior_average, 5.0);
    }

    #[test]
    fn falling_scores_classify_as_declining() {
        let report = analyze(&[8.0, 8.0, 8.0, 5.0, 5.0, 5.0], 3);
        assert_eq!(report.trend, TrendDirection::Declining);
    }

    #[test]
    fn the_ten_percent_boundary_is_stable() {
        // Exactly +10% and exactly -10% both stay stable; only strictly
        // beyond the threshold flips the classification.
        let report = analyze(&[10.0, 10.0, 11.0, 11.0], 2);
        assert_eq!(report.trend, TrendDirection::Stable);
        let report = analyze(&[10.0, 10.0, 9.0, 9.0], 2);
        assert_eq!(report.trend, TrendDirection::Stable);
        let report = analyze(&[10.0, 10.0, 11.5, 11.5], 2);
        assert_eq!(report.trend, TrendDirection::Improving);
        let report = analyze(&[10.0, 10.0, 8.9, 8.9], 2);
        assert_eq!(report.trend, TrendDirection::Declining);
    }

    #[test]
    fn too_short_a_history_is_stable() {
        let report = analyze(&[9.0, 10.0], 5);
        assert_eq!(report.trend, TrendDirection::Stable);
        assert_eq!(report.prior_average, 0.0);
    }

    #[test]
    fn empty_history_reports_zeroes() {
        let report = analyze(&[], 5);
        assert_eq!(report.average, 0.0);
        assert_eq!(report.trend, TrendDirection::Stable);
    }
}
