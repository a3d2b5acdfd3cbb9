//! Kelly criterion stake sizing.
//!
//! Suggests a stake as a share of bankroll using fractional Kelly with a
//! configurable multiplier and cap. Purely advisory: nothing is placed.

use tracing::debug;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Kelly sizing configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct KellyConfig {
    /// Fractional Kelly multiplier (0.25 = quarter-Kelly). Lower = more conservative.
    pub multiplier: f64,
    /// Maximum stake as a fraction of bankroll.
    pub max_stake_pct: f64,
}

impl Default for KellyConfig {
    fn default() -> Self {
        Self {
            multiplier: 0.25,
            max_stake_pct: 0.05,
        }
    }
}

// ---------------------------------------------------------------------------
// Kelly calculator
// ---------------------------------------------------------------------------

pub struct KellyCalculator {
    config: KellyConfig,
}

impl KellyCalculator {
    pub fn new(config: KellyConfig) -> Self {
        Self { config }
    }

    /// Access the Kelly configuration.
    pub fn config(&self) -> &KellyConfig {
        &self.config
    }

    /// Raw Kelly fraction for decimal `odds`.
    ///
    /// Kelly formula: f* = (bp - q) / b
    /// where:
    ///   b = odds - 1 (net payout per unit)
    ///   p = model win probability
    ///   q = 1 - p
    ///
    /// Zero when there is no edge or the quote pays nothing.
    pub fn raw_fraction(probability: f64, odds: f64) -> f64 {
        let payout_ratio = odds - 1.0;
        if payout_ratio <= 0.0 {
            return 0.0;
        }
        let kelly = (payout_ratio * probability - (1.0 - probability)) / payout_ratio;
        kelly.max(0.0)
    }

    /// Suggested stake: raw Kelly × multiplier, capped at `max_stake_pct`.
    pub fn stake_fraction(&self, probability: f64, odds: f64) -> f64 {
        let kelly = Self::raw_fraction(probability, odds);
        if kelly <= 0.0 {
            return 0.0;
        }
        let stake = (kelly * self.config.multiplier).min(self.config.max_stake_pct);

        debug!(
            raw_kelly = format!("{:.2}%", kelly * 100.0),
            stake = format!("{:.2}%", stake * 100.0),
            odds,
            "Stake sized"
        );
        stake
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
