//! Shared types for SCORECAST.
//!
//! Plain value types passed between the model, strategy, engine and the
//! outer surfaces (CLI and HTTP). Nothing here carries state across calls.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::rates::GoalRateSpec;

/// Library result alias.
pub type Result<T> = std::result::Result<T, ScorecastError>;

// ---------------------------------------------------------------------------
// Scores
// ---------------------------------------------------------------------------

/// A scoreline: goals for the home and away side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Score {
    pub home: usize,
    pub away: usize,
}

impl Score {
    pub fn new(home: usize, away: usize) -> Self {
        Self { home, away }
    }

    pub fn total_goals(&self) -> usize {
        self.home + self.away
    }

    /// Result of a match that ended with this score.
    pub fn outcome(&self) -> MatchOutcome {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => MatchOutcome::HomeWin,
            std::cmp::Ordering::Equal => MatchOutcome::Draw,
            std::cmp::Ordering::Less => MatchOutcome::AwayWin,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.home, self.away)
    }
}

/// A scoreline together with its model probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreProbability {
    pub score: Score,
    pub probability: f64,
}

impl fmt::Display for ScoreProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}%)", self.score, self.probability * 100.0)
    }
}

// ---------------------------------------------------------------------------
// Match outcomes
// ---------------------------------------------------------------------------

/// Three-way match result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl MatchOutcome {
    pub const ALL: [MatchOutcome; 3] = [Self::HomeWin, Self::Draw, Self::AwayWin];

    /// Position in `ALL`, used to index 3-way matrices.
    pub fn index(&self) -> usize {
        match self {
            Self::HomeWin => 0,
            Self::Draw => 1,
            Self::AwayWin => 2,
        }
    }

    /// Single-letter code used in HT/FT labels ("1", "X", "2").
    pub fn code(&self) -> &'static str {
        match self {
            Self::HomeWin => "1",
            Self::Draw => "X",
            Self::AwayWin => "2",
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HomeWin => write!(f, "Home Win"),
            Self::Draw => write!(f, "Draw"),
            Self::AwayWin => write!(f, "Away Win"),
        }
    }
}

/// Home/draw/away split of a scoreline table.
///
/// `other` is the probability mass that fell outside the modelled goal
/// range. It is never folded into any of the three results, so the four
/// buckets together sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResultSplit {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
    pub other: f64,
}

impl MatchResultSplit {
    pub fn probability(&self, outcome: MatchOutcome) -> f64 {
        match outcome {
            MatchOutcome::HomeWin => self.home_win,
            MatchOutcome::Draw => self.draw,
            MatchOutcome::AwayWin => self.away_win,
        }
    }

    /// Most likely of the three modelled results. Ties resolve in
    /// home, draw, away order.
    pub fn most_likely(&self) -> MatchOutcome {
        let mut best = MatchOutcome::HomeWin;
        for outcome in MatchOutcome::ALL {
            if self.probability(outcome) > self.probability(best) {
                best = outcome;
            }
        }
        best
    }

    /// Sum of the three modelled results (excludes `other`).
    pub fn modelled(&self) -> f64 {
        self.home_win + self.draw + self.away_win
    }
}

impl fmt::Display for MatchResultSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Home {:.1}% | Draw {:.1}% | Away {:.1}% | Other {:.1}%",
            self.home_win * 100.0,
            self.draw * 100.0,
            self.away_win * 100.0,
            self.other * 100.0,
        )
    }
}

// ---------------------------------------------------------------------------
// Odds input
// ---------------------------------------------------------------------------

/// Bookmaker decimal odds for the markets the engine prices.
/// Every quote is optional; only supplied quotes are evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketOdds {
    pub home_win: Option<f64>,
    pub draw: Option<f64>,
    pub away_win: Option<f64>,
    pub ht_home_win: Option<f64>,
    pub ht_draw: Option<f64>,
    pub ht_away_win: Option<f64>,
    pub btts_yes: Option<f64>,
    pub btts_no: Option<f64>,
    pub over: Option<f64>,
    pub under: Option<f64>,
}

impl MarketOdds {
    /// All quotes with the request field they came from.
    pub fn named(&self) -> [(&'static str, Option<f64>); 10] {
        [
            ("odds.home_win", self.home_win),
            ("odds.draw", self.draw),
            ("odds.away_win", self.away_win),
            ("odds.ht_home_win", self.ht_home_win),
            ("odds.ht_draw", self.ht_draw),
            ("odds.ht_away_win", self.ht_away_win),
            ("odds.btts_yes", self.btts_yes),
            ("odds.btts_no", self.btts_no),
            ("odds.over", self.over),
            ("odds.under", self.under),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.named().iter().all(|(_, q)| q.is_none())
    }
}

/// A correct-score quote.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreOdds {
    pub home: usize,
    pub away: usize,
    pub odds: f64,
}

impl ScoreOdds {
    pub fn score(&self) -> Score {
        Score::new(self.home, self.away)
    }
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// One prediction request. Optional fields fall back to the configured
/// model defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchRequest {
    pub home_rate: GoalRateSpec,
    pub away_rate: GoalRateSpec,
    #[serde(default)]
    pub max_goals: Option<usize>,
    #[serde(default)]
    pub halftime_fraction: Option<f64>,
    #[serde(default)]
    pub goal_line: Option<f64>,
    #[serde(default)]
    pub halftime_goal_line: Option<f64>,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub odds: MarketOdds,
    /// Full-time correct-score quotes.
    #[serde(default)]
    pub correct_score_odds: Vec<ScoreOdds>,
    /// Halftime correct-score quotes.
    #[serde(default)]
    pub ht_correct_score_odds: Vec<ScoreOdds>,
}

impl MatchRequest {
    /// Request with direct full-time goal rates and every option defaulted.
    pub fn new(home_rate: f64, away_rate: f64) -> Self {
        Self {
            home_rate: GoalRateSpec::Direct(home_rate),
            away_rate: GoalRateSpec::Direct(away_rate),
            max_goals: None,
            halftime_fraction: None,
            goal_line: None,
            halftime_goal_line: None,
            top_k: None,
            odds: MarketOdds::default(),
            correct_score_odds: Vec::new(),
            ht_correct_score_odds: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Market summaries
// ---------------------------------------------------------------------------

/// Market families. Margins and fair odds are computed per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketGroup {
    MatchResult,
    HalftimeResult,
    BothTeamsToScore,
    TotalGoals,
    CorrectScore,
    HalftimeCorrectScore,
}

impl fmt::Display for MarketGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MatchResult => write!(f, "1X2"),
            Self::HalftimeResult => write!(f, "HT 1X2"),
            Self::BothTeamsToScore => write!(f, "BTTS"),
            Self::TotalGoals => write!(f, "Over/Under"),
            Self::CorrectScore => write!(f, "Correct Score"),
            Self::HalftimeCorrectScore => write!(f, "HT Correct Score"),
        }
    }
}

/// A named model probability, optionally priced against a bookmaker quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub name: String,
    pub group: MarketGroup,
    pub probability: f64,
    pub odds: Option<f64>,
    pub implied_probability: Option<f64>,
    /// Model probability minus implied probability.
    pub edge: Option<f64>,
    pub expected_value: Option<f64>,
    /// Margin-free odds, set when the whole group is quoted.
    pub fair_odds: Option<f64>,
    /// Fractional Kelly stake as a share of bankroll.
    pub kelly_stake: Option<f64>,
}

impl MarketSummary {
    pub fn new(name: impl Into<String>, group: MarketGroup, probability: f64) -> Self {
        Self {
            name: name.into(),
            group,
            probability,
            odds: None,
            implied_probability: None,
            edge: None,
            expected_value: None,
            fair_odds: None,
            kelly_stake: None,
        }
    }

    pub fn is_quoted(&self) -> bool {
        self.odds.is_some()
    }
}

impl fmt::Display for MarketSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<22} {:>6.2}%", self.name, self.probability * 100.0)?;
        if let (Some(odds), Some(ev)) = (self.odds, self.expected_value) {
            write!(f, "  @ {odds:.2}  EV {:+.1}%", ev * 100.0)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for SCORECAST.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScorecastError {
    #[error("Invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScorecastError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// The offending input field, if the error names one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidParameter { field, .. } => Some(field),
            Self::Config(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
