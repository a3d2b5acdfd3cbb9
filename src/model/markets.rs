//! Derived market calculator.
//!
//! Pure reducers that sum subsets of a scoreline table's cells. Two-way
//! markets return the complement as `1 - p` rather than re-summing, so
//! each pair adds up to 1 and the "No"/"Under" side carries the residual.

use crate::types::{MatchResultSplit, Result, ScoreProbability, ScorecastError};

use super::table::ScorelineTable;

/// The `k` most likely scorelines, highest first.
///
/// The sort is stable over row-major order, so equal probabilities keep
/// home-ascending then away-ascending order.
pub fn top_k_scorelines(table: &ScorelineTable, k: usize) -> Vec<ScoreProbability> {
    let mut cells: Vec<ScoreProbability> = table
        .iter()
        .map(|(score, probability)| ScoreProbability { score, probability })
        .collect();
    cells.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    cells.truncate(k);
    cells
}

/// Both teams to score: `(yes, no)`.
pub fn btts_probability(table: &ScorelineTable) -> (f64, f64) {
    let yes: f64 = table
        .iter()
        .filter(|(s, _)| s.home >= 1 && s.away >= 1)
        .map(|(_, p)| p)
        .sum();
    (yes, 1.0 - yes)
}

/// Total goals strictly above / not above `threshold`: `(over, under)`.
pub fn over_under_probability(table: &ScorelineTable, threshold: f64) -> Result<(f64, f64)> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(ScorecastError::invalid(
            "threshold",
            format!("must be a non-negative number, got {threshold}"),
        ));
    }
    let over: f64 = table
        .iter()
        .filter(|(s, _)| s.total_goals() as f64 > threshold)
        .map(|(_, p)| p)
        .sum();
    Ok((over, 1.0 - over))
}

/// Home win / draw / away win plus the unmodelled remainder.
pub fn match_result_probability(table: &ScorelineTable) -> MatchResultSplit {
    let (mut home_win, mut draw, mut away_win) = (0.0, 0.0, 0.0);
    for (score, p) in table.iter() {
        if score.home > score.away {
            home_win += p;
        } else if score.home == score.away {
            draw += p;
        } else {
            away_win += p;
        }
    }
    let other = (1.0 - (home_win + draw + away_win)).max(0.0);
    MatchResultSplit {
        home_win,
        draw,
        away_win,
        other,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
