//! Bookmaker arithmetic.
//!
//! Implied probability, overround (margin), expected value and margin-free
//! ("fair") odds for decimal quotes.

use crate::types::{Result, ScorecastError};

/// Reject non-positive and non-finite quotes.
pub fn validate_odds(field: &str, odds: f64) -> Result<()> {
    if !odds.is_finite() || odds <= 0.0 {
        return Err(ScorecastError::invalid(
            field,
            format!("odds must be a positive number, got {odds}"),
        ));
    }
    Ok(())
}

/// Reject probabilities outside [0, 1].
pub fn validate_probability(field: &str, probability: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(ScorecastError::invalid(
            field,
            format!("must be between 0 and 1, got {probability}"),
        ));
    }
    Ok(())
}

/// Probability implied by a decimal quote: `1 / odds`.
pub fn implied_probability(odds: f64) -> Result<f64> {
    validate_odds("odds", odds)?;
    Ok(1.0 / odds)
}

/// Bookmaker margin in percent: `(Σ 1/odds − 1) × 100`.
///
/// A fair book gives 0; a typical two- or three-way market is positive.
pub fn bookmaker_margin(odds: &[f64]) -> Result<f64> {
    if odds.is_empty() {
        return Err(ScorecastError::invalid("odds", "at least one quote is required"));
    }
    let mut book = 0.0;
    for (i, &o) in odds.iter().enumerate() {
        validate_odds(&format!("odds[{i}]"), o)?;
        book += 1.0 / o;
    }
    Ok((book - 1.0) * 100.0)
}

/// Expected profit per unit staked: `probability × odds − 1`.
pub fn expected_value(probability: f64, odds: f64) -> f64 {
    probability * odds - 1.0
}

/// Margin-free odds for a complete market, by normalising the implied
/// probabilities to sum to 1.
pub fn fair_odds(odds: &[f64]) -> Result<Vec<f64>> {
    if odds.is_empty() {
        return Err(ScorecastError::invalid("odds", "at least one quote is required"));
    }
    let mut implied = Vec::with_capacity(odds.len());
    for (i, &o) in odds.iter().enumerate() {
        validate_odds(&format!("odds[{i}]"), o)?;
        implied.push(1.0 / o);
    }
    let book: f64 = implied.iter().sum();
    Ok(implied.iter().map(|p| book / p).collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
