//! Prediction report returned by the engine.
//!
//! Serialized as-is by the HTTP API and the `--json` CLI output; the
//! `Display` impl renders the plain-text CLI view.

use serde::Serialize;
use std::fmt;

use crate::model::{HtFtResultMatrix, HtFtScore, PeriodRates, ScorelineTable};
use crate::strategy::MarketMargin;
use crate::types::{MarketSummary, MatchOutcome, MatchResultSplit, Score, ScoreProbability};

/// Parameters a report was computed with, after defaults were applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedParameters {
    pub rates: PeriodRates,
    pub max_goals: usize,
    pub halftime_fraction: f64,
    pub goal_line: f64,
    pub halftime_goal_line: f64,
    pub top_k: usize,
}

/// Markets derived from one scoreline table (full time or first half).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodReport {
    pub table: ScorelineTable,
    /// Mass outside the table.
    pub residual: f64,
    pub top_scorelines: Vec<ScoreProbability>,
    pub result: MatchResultSplit,
    pub btts_yes: f64,
    pub btts_no: f64,
    pub goal_line: f64,
    pub over: f64,
    pub under: f64,
}

/// A top scoreline with its correct-score quote, when one was given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PricedScore {
    pub score: Score,
    pub probability: f64,
    pub fair_odds: Option<f64>,
    pub odds: Option<f64>,
    pub expected_value: Option<f64>,
}

/// Headline picks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub scoreline: ScoreProbability,
    pub result: MatchOutcome,
    pub result_probability: f64,
    /// Highest-EV value selection, if any market qualified.
    pub best_value: Option<MarketSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub parameters: ResolvedParameters,
    pub full_time: PeriodReport,
    pub halftime: PeriodReport,
    pub priced_scorelines: Vec<PricedScore>,
    pub priced_halftime_scorelines: Vec<PricedScore>,
    pub htft_scores: Vec<HtFtScore>,
    pub htft_results: HtFtResultMatrix,
    pub markets: Vec<MarketSummary>,
    pub margins: Vec<MarketMargin>,
    pub value_selections: Vec<MarketSummary>,
    pub recommendation: Recommendation,
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

fn pct(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

fn write_period(f: &mut fmt::Formatter<'_>, title: &str, period: &PeriodReport) -> fmt::Result {
    writeln!(f, "{title}")?;
    writeln!(f, "  Result:      {}", period.result)?;
    writeln!(
        f,
        "  BTTS:        Yes {} | No {}",
        pct(period.btts_yes),
        pct(period.btts_no)
    )?;
    writeln!(
        f,
        "  Goals {:<5} Over {} | Under {}",
        period.goal_line,
        pct(period.over),
        pct(period.under)
    )?;
    let top: Vec<String> = period.top_scorelines.iter().map(|s| s.to_string()).collect();
    writeln!(f, "  Top scores:  {}", top.join(", "))?;
    writeln!(f, "  Outside table: {}", pct(period.residual))
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.parameters;
        writeln!(
            f,
            "Goal rates: home {:.2} / away {:.2} (HT {:.2} / {:.2}), max goals {}",
            p.rates.full_time.home,
            p.rates.full_time.away,
            p.rates.first_half.home,
            p.rates.first_half.away,
            p.max_goals
        )?;
        writeln!(f)?;
        write_period(f, "Full time", &self.full_time)?;
        writeln!(f)?;
        write_period(f, "Halftime", &self.halftime)?;

        writeln!(f)?;
        writeln!(f, "HT/FT")?;
        let cells: Vec<String> = self
            .htft_results
            .labelled()
            .into_iter()
            .map(|(label, prob)| format!("{label} {}", pct(prob)))
            .collect();
        for row in cells.chunks(3) {
            writeln!(f, "  {}", row.join(" | "))?;
        }
        writeln!(f, "  Other {}", pct(self.htft_results.other))?;
        for pair in &self.htft_scores {
            writeln!(f, "  {pair}")?;
        }

        let quoted: Vec<&MarketSummary> = self.markets.iter().filter(|m| m.is_quoted()).collect();
        if !quoted.is_empty() {
            writeln!(f)?;
            writeln!(f, "Markets")?;
            for m in quoted {
                writeln!(f, "  {m}")?;
            }
            for margin in &self.margins {
                writeln!(f, "  {} margin {:.2}%", margin.group, margin.margin_pct)?;
            }
        }

        writeln!(f)?;
        let rec = &self.recommendation;
        writeln!(f, "Most likely score:  {}", rec.scoreline)?;
        writeln!(f, "Most likely result: {} ({})", rec.result, pct(rec.result_probability))?;
        match &rec.best_value {
            Some(m) => write!(f, "Best value:         {m}"),
            None => write!(f, "Best value:         none"),
        }
    }
}
