//! Goal-rate inputs.
//!
//! A side's expected goals either come straight from the caller or are
//! derived from scoring averages: the side's own scoring average scaled by
//! how much its opponent concedes relative to a league baseline.

use serde::{Deserialize, Serialize};

use super::distribution::validate_rate;
use super::table::HalftimeFraction;
use crate::types::{Result, ScorecastError};

/// How a side's full-time goal rate is supplied.
///
/// In JSON either a bare number (`1.45`) or an object
/// `{ "scored_avg": 1.6, "opponent_conceded_avg": 1.3, "league_avg": 1.4 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GoalRateSpec {
    Direct(f64),
    Averages {
        scored_avg: f64,
        opponent_conceded_avg: f64,
        #[serde(default)]
        league_avg: Option<f64>,
    },
}

impl GoalRateSpec {
    /// Resolve to a validated rate. `field` prefixes error messages.
    pub fn resolve(&self, field: &str) -> Result<f64> {
        match *self {
            Self::Direct(rate) => {
                validate_rate(field, rate)?;
                Ok(rate)
            }
            Self::Averages {
                scored_avg,
                opponent_conceded_avg,
                league_avg,
            } => attack_defence_rate(scored_avg, opponent_conceded_avg, league_avg)
                .map_err(|e| match e {
                    ScorecastError::InvalidParameter { field: inner, reason } => {
                        ScorecastError::invalid(format!("{field}.{inner}"), reason)
                    }
                    other => other,
                }),
        }
    }
}

impl From<f64> for GoalRateSpec {
    fn from(rate: f64) -> Self {
        Self::Direct(rate)
    }
}

/// Expected goals from scoring averages.
///
/// `scored_avg × opponent_conceded_avg / league_avg`. Without a league
/// baseline the two averages are simply blended (their mean).
pub fn attack_defence_rate(
    scored_avg: f64,
    opponent_conceded_avg: f64,
    league_avg: Option<f64>,
) -> Result<f64> {
    validate_rate("scored_avg", scored_avg)?;
    validate_rate("opponent_conceded_avg", opponent_conceded_avg)?;

    match league_avg {
        Some(league) => {
            if !league.is_finite() || league <= 0.0 {
                return Err(ScorecastError::invalid(
                    "league_avg",
                    format!("must be positive, got {league}"),
                ));
            }
            Ok(scored_avg * opponent_conceded_avg / league)
        }
        None => Ok((scored_avg + opponent_conceded_avg) / 2.0),
    }
}

// ---------------------------------------------------------------------------
// Period rates
// ---------------------------------------------------------------------------

/// Home and away rates for one period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatePair {
    pub home: f64,
    pub away: f64,
}

/// Rates per period, derived from the full-time pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodRates {
    pub full_time: RatePair,
    pub first_half: RatePair,
    pub second_half: RatePair,
}

impl PeriodRates {
    pub fn split(home: f64, away: f64, fraction: HalftimeFraction) -> Self {
        Self {
            full_time: RatePair { home, away },
            first_half: RatePair {
                home: fraction.first_half(home),
                away: fraction.first_half(away),
            },
            second_half: RatePair {
                home: fraction.second_half(home),
                away: fraction.second_half(away),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
