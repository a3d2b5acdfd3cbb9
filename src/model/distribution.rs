//! Goal distribution builder.
//!
//! Poisson probability mass for exactly 0..=max_goals goals at a given
//! rate. The tail beyond `max_goals` is not folded back in: it stays as
//! residual ("Other") mass.

use serde::Serialize;
use tracing::debug;

use crate::types::{Result, ScorecastError};

/// Hard ceiling on `max_goals`, independent of configuration.
pub const MAX_SUPPORTED_GOALS: usize = 1000;

/// P(exactly k goals) for k in 0..=max_goals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GoalDistribution {
    probs: Vec<f64>,
}

impl GoalDistribution {
    pub fn probabilities(&self) -> &[f64] {
        &self.probs
    }

    /// Highest goal count modelled.
    pub fn max_goals(&self) -> usize {
        self.probs.len() - 1
    }

    /// P(exactly k goals); zero beyond the modelled range.
    pub fn get(&self, k: usize) -> f64 {
        self.probs.get(k).copied().unwrap_or(0.0)
    }

    /// Sum of the modelled mass.
    pub fn total(&self) -> f64 {
        self.probs.iter().sum()
    }

    /// Mass beyond `max_goals`.
    pub fn residual(&self) -> f64 {
        (1.0 - self.total()).max(0.0)
    }
}

/// Reject negative, NaN and infinite rates.
pub fn validate_rate(field: &str, rate: f64) -> Result<()> {
    if !rate.is_finite() {
        return Err(ScorecastError::invalid(field, format!("must be finite, got {rate}")));
    }
    if rate < 0.0 {
        return Err(ScorecastError::invalid(
            field,
            format!("must be non-negative, got {rate}"),
        ));
    }
    Ok(())
}

/// Build the Poisson distribution for `rate` over 0..=max_goals goals.
///
/// Value at k is `e^(-rate) * rate^k / k!`, evaluated by the recurrence
/// `p_k = p_(k-1) * rate / k`. A zero rate puts all mass on zero goals.
pub fn build_distribution(rate: f64, max_goals: usize) -> Result<GoalDistribution> {
    validate_rate("rate", rate)?;
    let len = max_goals
        .checked_add(1)
        .filter(|_| max_goals <= MAX_SUPPORTED_GOALS)
        .ok_or_else(|| {
            ScorecastError::invalid(
                "max_goals",
                format!("must not exceed {MAX_SUPPORTED_GOALS}, got {max_goals}"),
            )
        })?;

    let mut probs = Vec::with_capacity(len);
    let mut p = (-rate).exp();
    probs.push(p);
    for k in 1..=max_goals {
        p *= rate / k as f64;
        probs.push(p);
    }

    let dist = GoalDistribution { probs };
    debug!(rate, max_goals, residual = dist.residual(), "Goal distribution built");
    Ok(dist)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
