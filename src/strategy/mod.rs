//! Strategy: pricing model probabilities against bookmaker quotes.
//!
//! Quote → implied probability, edge, EV and Kelly stake per market; book
//! margins and fair odds per complete market group; value selection.

pub mod edge;
pub mod kelly;
pub mod pricing;

use serde::Serialize;
use tracing::debug;

use crate::types::{MarketGroup, MarketSummary, Result};
use edge::EdgeDetector;
use kelly::KellyCalculator;

/// Overround of one fully quoted market group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketMargin {
    pub group: MarketGroup,
    pub margin_pct: f64,
}

/// A single probability priced against a single quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuoteEvaluation {
    pub expected_value: f64,
    pub implied_probability: f64,
    pub edge: f64,
    pub kelly_fraction: f64,
}

/// Number of outcomes that make up a complete book for `group`.
/// Correct-score books are never complete here.
pub fn book_size(group: MarketGroup) -> Option<usize> {
    match group {
        MarketGroup::MatchResult | MarketGroup::HalftimeResult => Some(3),
        MarketGroup::BothTeamsToScore | MarketGroup::TotalGoals => Some(2),
        MarketGroup::CorrectScore | MarketGroup::HalftimeCorrectScore => None,
    }
}

// ---------------------------------------------------------------------------
// Pricer
// ---------------------------------------------------------------------------

/// Prices market summaries: quote → edge/EV/stake, group margins, value.
pub struct MarketPricer {
    edge_detector: EdgeDetector,
    kelly: KellyCalculator,
}

impl MarketPricer {
    pub fn new(edge_detector: EdgeDetector, kelly: KellyCalculator) -> Self {
        Self {
            edge_detector,
            kelly,
        }
    }

    /// Attach a quote to a market. `field` names the quote in errors.
    pub fn quote(&self, market: &mut MarketSummary, odds: f64, field: &str) -> Result<()> {
        pricing::validate_odds(field, odds)?;
        let implied = 1.0 / odds;
        let ev = pricing::expected_value(market.probability, odds);

        market.odds = Some(odds);
        market.implied_probability = Some(implied);
        market.edge = Some(market.probability - implied);
        market.expected_value = Some(ev);
        market.kelly_stake = Some(self.kelly.stake_fraction(market.probability, odds));
        Ok(())
    }

    /// Price a bare probability against `odds`.
    pub fn evaluate(&self, probability: f64, odds: f64) -> Result<QuoteEvaluation> {
        pricing::validate_probability("probability", probability)?;
        let implied_probability = pricing::implied_probability(odds)?;
        Ok(QuoteEvaluation {
            expected_value: pricing::expected_value(probability, odds),
            implied_probability,
            edge: probability - implied_probability,
            kelly_fraction: self.kelly.stake_fraction(probability, odds),
        })
    }

    /// Margin and fair odds for every fully quoted group.
    pub fn price_books(&self, markets: &mut [MarketSummary]) -> Result<Vec<MarketMargin>> {
        let mut margins = Vec::new();
        let groups = [
            MarketGroup::MatchResult,
            MarketGroup::HalftimeResult,
            MarketGroup::BothTeamsToScore,
            MarketGroup::TotalGoals,
        ];

        for group in groups {
            let Some(size) = book_size(group) else { continue };
            let idx: Vec<usize> = markets
                .iter()
                .enumerate()
                .filter(|(_, m)| m.group == group && m.is_quoted())
                .map(|(i, _)| i)
                .collect();
            if idx.len() != size {
                continue;
            }

            let odds: Vec<f64> = idx.iter().filter_map(|&i| markets[i].odds).collect();
            let margin_pct = pricing::bookmaker_margin(&odds)?;
            let fair = pricing::fair_odds(&odds)?;
            for (&i, fair_odds) in idx.iter().zip(fair) {
                markets[i].fair_odds = Some(fair_odds);
            }

            debug!(group = %group, margin = format!("{margin_pct:.2}%"), "Book priced");
            margins.push(MarketMargin { group, margin_pct });
        }

        Ok(margins)
    }

    /// Value selections, best EV first.
    pub fn select_value(&self, markets: &[MarketSummary]) -> Vec<MarketSummary> {
        self.edge_detector.find_value(markets)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
