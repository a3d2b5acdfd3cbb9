//! Joint scoreline table.
//!
//! Cell (h, a) is P(home = h) × P(away = a). Rows are home goals, columns
//! are away goals. Whatever mass the two truncated distributions leave out
//! is the table's residual.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::distribution::{build_distribution, validate_rate, GoalDistribution};
use crate::types::{Result, Score, ScorecastError};

/// Share of a full-time goal rate expected by halftime.
///
/// Scoring is not uniform across a match, so 0.5 is an approximation;
/// callers can override it per request or in config.
pub const DEFAULT_HALFTIME_FRACTION: f64 = 0.5;

// ---------------------------------------------------------------------------
// Halftime fraction
// ---------------------------------------------------------------------------

/// Fraction of the full-time rate applied to the first half, in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct HalftimeFraction(f64);

impl HalftimeFraction {
    pub fn new(fraction: f64) -> Result<Self> {
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(ScorecastError::invalid(
                "halftime_fraction",
                format!("must be in (0, 1], got {fraction}"),
            ));
        }
        Ok(Self(fraction))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// First-half rate for a full-time rate.
    pub fn first_half(&self, rate: f64) -> f64 {
        rate * self.0
    }

    /// Second-half rate for a full-time rate.
    pub fn second_half(&self, rate: f64) -> f64 {
        rate * (1.0 - self.0)
    }
}

impl Default for HalftimeFraction {
    fn default() -> Self {
        Self(DEFAULT_HALFTIME_FRACTION)
    }
}

impl TryFrom<f64> for HalftimeFraction {
    type Error = ScorecastError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<HalftimeFraction> for f64 {
    fn from(value: HalftimeFraction) -> Self {
        value.0
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Joint probability matrix over (home goals, away goals).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScorelineTable {
    cells: Vec<Vec<f64>>,
}

impl ScorelineTable {
    /// Number of home-goal rows.
    pub fn home_len(&self) -> usize {
        self.cells.len()
    }

    /// Number of away-goal columns.
    pub fn away_len(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.cells
    }

    /// P(home = h, away = a); zero outside the table.
    pub fn get(&self, home: usize, away: usize) -> f64 {
        self.cells
            .get(home)
            .and_then(|row| row.get(away))
            .copied()
            .unwrap_or(0.0)
    }

    /// Cells in row-major order (home ascending, then away ascending).
    pub fn iter(&self) -> impl Iterator<Item = (Score, f64)> + '_ {
        self.cells.iter().enumerate().flat_map(|(h, row)| {
            row.iter()
                .enumerate()
                .map(move |(a, &p)| (Score::new(h, a), p))
        })
    }

    /// Sum of all modelled cells.
    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    /// The "Other" bucket: mass outside the modelled scorelines.
    pub fn residual(&self) -> f64 {
        (1.0 - self.total()).max(0.0)
    }

    /// Swap home and away.
    pub fn transpose(&self) -> ScorelineTable {
        let cells = (0..self.away_len())
            .map(|a| self.cells.iter().map(|row| row[a]).collect())
            .collect();
        ScorelineTable { cells }
    }
}

/// Combine two independent goal distributions into a scoreline table.
/// Distributions of different lengths give a rectangular table.
pub fn build_joint_table(home: &GoalDistribution, away: &GoalDistribution) -> ScorelineTable {
    let cells = home
        .probabilities()
        .iter()
        .map(|&ph| away.probabilities().iter().map(|&pa| ph * pa).collect())
        .collect();
    ScorelineTable { cells }
}

/// Full-time table straight from two goal rates.
pub fn build_table(home_rate: f64, away_rate: f64, max_goals: usize) -> Result<ScorelineTable> {
    validate_rate("home_rate", home_rate)?;
    validate_rate("away_rate", away_rate)?;

    let table = build_joint_table(
        &build_distribution(home_rate, max_goals)?,
        &build_distribution(away_rate, max_goals)?,
    );
    debug!(
        home_rate,
        away_rate,
        max_goals,
        residual = table.residual(),
        "Scoreline table built"
    );
    Ok(table)
}

/// First-half table: each full-time rate scaled by `fraction`.
pub fn build_halftime_table(
    home_rate: f64,
    away_rate: f64,
    max_goals: usize,
    fraction: HalftimeFraction,
) -> Result<ScorelineTable> {
    validate_rate("home_rate", home_rate)?;
    validate_rate("away_rate", away_rate)?;
    build_table(
        fraction.first_half(home_rate),
        fraction.first_half(away_rate),
        max_goals,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
