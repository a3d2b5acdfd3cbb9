//! Value detection.
//!
//! Compares model probabilities to bookmaker-implied probabilities and
//! keeps the quoted markets whose edge clears a threshold.

use tracing::debug;

use crate::types::MarketSummary;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Value thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeConfig {
    /// Minimum model-minus-implied probability to count as value.
    pub min_edge: f64,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self { min_edge: 0.03 }
    }
}

// ---------------------------------------------------------------------------
// Edge detection
// ---------------------------------------------------------------------------

/// Picks value selections out of priced markets.
pub struct EdgeDetector {
    config: EdgeConfig,
}

impl EdgeDetector {
    pub fn new(config: EdgeConfig) -> Self {
        Self { config }
    }

    /// Access the edge configuration.
    pub fn config(&self) -> &EdgeConfig {
        &self.config
    }

    /// Quoted markets with positive EV and an edge at or above
    /// `min_edge`, best expected value first.
    pub fn find_value(&self, markets: &[MarketSummary]) -> Vec<MarketSummary> {
        let mut selections: Vec<MarketSummary> = markets
            .iter()
            .filter(|m| self.is_value(m))
            .cloned()
            .collect();

        selections.sort_by(|a, b| {
            let ev_a = a.expected_value.unwrap_or(f64::NEG_INFINITY);
            let ev_b = b.expected_value.unwrap_or(f64::NEG_INFINITY);
            ev_b.total_cmp(&ev_a)
        });
        selections
    }

    /// Whether a single market is a value selection.
    pub fn is_value(&self, market: &MarketSummary) -> bool {
        let (Some(edge), Some(ev)) = (market.edge, market.expected_value) else {
            return false;
        };

        if ev <= 0.0 {
            return false;
        }

        if edge < self.config.min_edge {
            debug!(
                market = %market.name,
                edge = %format!("{:.1}%", edge * 100.0),
                threshold = %format!("{:.1}%", self.config.min_edge * 100.0),
                "Edge below threshold"
            );
            return false;
        }

        debug!(
            market = %market.name,
            edge = %format!("{:.1}%", edge * 100.0),
            ev = %format!("{:+.1}%", ev * 100.0),
            "Value detected"
        );
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
