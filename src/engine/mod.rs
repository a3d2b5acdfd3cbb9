//! Prediction engine: request → validate → tables → markets → priced report.
//!
//! Stateless. A `Predictor` holds only the configured defaults and the
//! pricing strategy; every call builds its own tables from scratch.

pub mod report;

use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::{AppConfig, ModelConfig};
use crate::model::{
    btts_probability, build_halftime_table, build_table, htft_correct_scores,
    htft_result_probabilities, match_result_probability, over_under_probability,
    top_k_scorelines, HalftimeFraction, HtFtScore, PeriodRates, ScorelineTable,
};
use crate::strategy::edge::EdgeDetector;
use crate::strategy::kelly::KellyCalculator;
use crate::strategy::{pricing, MarketPricer};
use crate::types::{
    MarketGroup, MarketSummary, MatchRequest, Result, Score, ScoreOdds, ScorecastError,
};

pub use report::{MatchReport, PeriodReport, PricedScore, Recommendation, ResolvedParameters};

// ---------------------------------------------------------------------------
// Predictor
// ---------------------------------------------------------------------------

/// Turns match requests into priced reports.
pub struct Predictor {
    defaults: ModelConfig,
    pricer: MarketPricer,
}

impl Predictor {
    pub fn new(defaults: ModelConfig, pricer: MarketPricer) -> Self {
        Self { defaults, pricer }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let pricer = MarketPricer::new(
            EdgeDetector::new(config.value.edge_config()),
            KellyCalculator::new(config.value.kelly_config()),
        );
        Self::new(config.model.clone(), pricer)
    }

    pub fn pricer(&self) -> &MarketPricer {
        &self.pricer
    }

    /// Model defaults applied to requests that leave a field unset.
    pub fn defaults(&self) -> &ModelConfig {
        &self.defaults
    }

    /// Apply defaults and validate every request field. Nothing is
    /// computed when any field is invalid.
    pub fn resolve(&self, request: &MatchRequest) -> Result<ResolvedParameters> {
        let home = request.home_rate.resolve("home_rate")?;
        let away = request.away_rate.resolve("away_rate")?;

        let max_goals = request.max_goals.unwrap_or(self.defaults.max_goals);
        if max_goals == 0 {
            return Err(ScorecastError::invalid(
                "max_goals",
                "must be at least 1 to build a scoreline table",
            ));
        }
        if max_goals > self.defaults.max_goals_limit {
            return Err(ScorecastError::invalid(
                "max_goals",
                format!("must not exceed {}, got {max_goals}", self.defaults.max_goals_limit),
            ));
        }

        let fraction = HalftimeFraction::new(
            request
                .halftime_fraction
                .unwrap_or(self.defaults.halftime_fraction),
        )?;

        let goal_line = request.goal_line.unwrap_or(self.defaults.goal_line);
        validate_line("goal_line", goal_line)?;
        let halftime_goal_line = request
            .halftime_goal_line
            .unwrap_or(self.defaults.halftime_goal_line);
        validate_line("halftime_goal_line", halftime_goal_line)?;

        let top_k = request.top_k.unwrap_or(self.defaults.top_k);
        if top_k == 0 {
            return Err(ScorecastError::invalid("top_k", "must be at least 1"));
        }

        for (field, quote) in request.odds.named() {
            if let Some(odds) = quote {
                pricing::validate_odds(field, odds)?;
            }
        }
        validate_score_quotes("correct_score_odds", &request.correct_score_odds, max_goals)?;
        validate_score_quotes("ht_correct_score_odds", &request.ht_correct_score_odds, max_goals)?;

        Ok(ResolvedParameters {
            rates: PeriodRates::split(home, away, fraction),
            max_goals,
            halftime_fraction: fraction.value(),
            goal_line,
            halftime_goal_line,
            top_k,
        })
    }

    /// Full prediction for one match.
    pub fn predict(&self, request: &MatchRequest) -> Result<MatchReport> {
        let params = self.resolve(request)?;
        let ft = params.rates.full_time;
        debug!(
            home_rate = ft.home,
            away_rate = ft.away,
            max_goals = params.max_goals,
            "Predicting match"
        );
        if request.odds.is_empty()
            && request.correct_score_odds.is_empty()
            && request.ht_correct_score_odds.is_empty()
        {
            debug!("No quotes supplied, markets stay unpriced");
        }

        let ft_table = build_table(ft.home, ft.away, params.max_goals)?;
        let ht_table = build_halftime_table(
            ft.home,
            ft.away,
            params.max_goals,
            HalftimeFraction::new(params.halftime_fraction)?,
        )?;

        let full_time = period_report(ft_table, params.goal_line, params.top_k)?;
        let halftime = period_report(ht_table, params.halftime_goal_line, params.top_k)?;

        let mut htft_scores = htft_correct_scores(&params.rates, params.max_goals, params.top_k)?;
        let htft_results = htft_result_probabilities(&params.rates, params.max_goals)?;
        price_htft_pairs(&mut htft_scores, request);

        let mut markets = self.build_markets(request, &full_time, &halftime)?;
        let margins = self.pricer.price_books(&mut markets)?;
        let value_selections = self.pricer.select_value(&markets);

        let priced_ft = priced_scorelines(&full_time, &markets, MarketGroup::CorrectScore);
        let priced_ht = priced_scorelines(&halftime, &markets, MarketGroup::HalftimeCorrectScore);
        let recommendation = recommend(&full_time, &value_selections)?;

        info!(
            top_score = %recommendation.scoreline,
            result = %recommendation.result,
            quoted = markets.iter().filter(|m| m.is_quoted()).count(),
            value = value_selections.len(),
            "Prediction complete"
        );

        Ok(MatchReport {
            parameters: params,
            full_time,
            halftime,
            priced_scorelines: priced_ft,
            priced_halftime_scorelines: priced_ht,
            htft_scores,
            htft_results,
            markets,
            margins,
            value_selections,
            recommendation,
        })
    }

    /// Market summaries for every priced market, quoted where odds exist.
    fn build_markets(
        &self,
        request: &MatchRequest,
        full_time: &PeriodReport,
        halftime: &PeriodReport,
    ) -> Result<Vec<MarketSummary>> {
        let odds = &request.odds;
        let ft = &full_time.result;
        let ht = &halftime.result;

        let mut entries: Vec<(MarketSummary, Option<f64>, String)> = vec![
            entry("Home Win", MarketGroup::MatchResult, ft.home_win, odds.home_win, "odds.home_win"),
            entry("Draw", MarketGroup::MatchResult, ft.draw, odds.draw, "odds.draw"),
            entry("Away Win", MarketGroup::MatchResult, ft.away_win, odds.away_win, "odds.away_win"),
            entry("HT Home Win", MarketGroup::HalftimeResult, ht.home_win, odds.ht_home_win, "odds.ht_home_win"),
            entry("HT Draw", MarketGroup::HalftimeResult, ht.draw, odds.ht_draw, "odds.ht_draw"),
            entry("HT Away Win", MarketGroup::HalftimeResult, ht.away_win, odds.ht_away_win, "odds.ht_away_win"),
            entry("BTTS Yes", MarketGroup::BothTeamsToScore, full_time.btts_yes, odds.btts_yes, "odds.btts_yes"),
            entry("BTTS No", MarketGroup::BothTeamsToScore, full_time.btts_no, odds.btts_no, "odds.btts_no"),
            entry(
                &format!("Over {}", full_time.goal_line),
                MarketGroup::TotalGoals,
                full_time.over,
                odds.over,
                "odds.over",
            ),
            entry(
                &format!("Under {}", full_time.goal_line),
                MarketGroup::TotalGoals,
                full_time.under,
                odds.under,
                "odds.under",
            ),
        ];

        let score_books = [
            (MarketGroup::CorrectScore, full_time, &request.correct_score_odds, "correct_score_odds"),
            (
                MarketGroup::HalftimeCorrectScore,
                halftime,
                &request.ht_correct_score_odds,
                "ht_correct_score_odds",
            ),
        ];
        for (group, period, quotes, list) in score_books {
            for (i, quote) in quotes.iter().enumerate() {
                let score = quote.score();
                entries.push(entry(
                    &score_market_name(group, score),
                    group,
                    period.table.get(score.home, score.away),
                    Some(quote.odds),
                    &format!("{list}[{i}]"),
                ));
            }
        }

        let mut markets = Vec::with_capacity(entries.len());
        for (mut market, quote, field) in entries {
            if let Some(odds) = quote {
                self.pricer.quote(&mut market, odds, &field)?;
            }
            markets.push(market);
        }
        Ok(markets)
    }
}

fn entry(
    name: &str,
    group: MarketGroup,
    probability: f64,
    odds: Option<f64>,
    field: &str,
) -> (MarketSummary, Option<f64>, String) {
    (MarketSummary::new(name, group, probability), odds, field.to_string())
}

fn score_market_name(group: MarketGroup, score: Score) -> String {
    format!("{group} {score}")
}

/// Odds range, table bounds and one quote per scoreline.
fn validate_score_quotes(list: &str, quotes: &[ScoreOdds], max_goals: usize) -> Result<()> {
    let mut seen = HashSet::new();
    for (i, quote) in quotes.iter().enumerate() {
        let field = format!("{list}[{i}]");
        pricing::validate_odds(&field, quote.odds)?;
        if quote.home > max_goals || quote.away > max_goals {
            return Err(ScorecastError::invalid(
                field,
                format!(
                    "score {} is outside the table (max_goals {max_goals})",
                    quote.score()
                ),
            ));
        }
        if !seen.insert(quote.score()) {
            return Err(ScorecastError::invalid(
                field,
                format!("score {} is quoted more than once", quote.score()),
            ));
        }
    }
    Ok(())
}

fn quote_for(quotes: &[ScoreOdds], score: Score) -> Option<f64> {
    quotes.iter().find(|q| q.score() == score).map(|q| q.odds)
}

/// Combined odds and EV for pairs whose HT and FT scores are both quoted.
fn price_htft_pairs(pairs: &mut [HtFtScore], request: &MatchRequest) {
    for pair in pairs.iter_mut() {
        let ht = quote_for(&request.ht_correct_score_odds, pair.halftime);
        let ft = quote_for(&request.correct_score_odds, pair.fulltime);
        if let (Some(ht), Some(ft)) = (ht, ft) {
            let combined = ht * ft;
            pair.combined_odds = Some(combined);
            pair.expected_value = Some(pricing::expected_value(pair.probability, combined));
        }
    }
}

fn validate_line(field: &str, line: f64) -> Result<()> {
    if !line.is_finite() || line < 0.0 {
        return Err(ScorecastError::invalid(
            field,
            format!("must be a non-negative number, got {line}"),
        ));
    }
    Ok(())
}

fn period_report(table: ScorelineTable, goal_line: f64, top_k: usize) -> Result<PeriodReport> {
    let (btts_yes, btts_no) = btts_probability(&table);
    let (over, under) = over_under_probability(&table, goal_line)?;
    Ok(PeriodReport {
        residual: table.residual(),
        top_scorelines: top_k_scorelines(&table, top_k),
        result: match_result_probability(&table),
        btts_yes,
        btts_no,
        goal_line,
        over,
        under,
        table,
    })
}

/// Top scorelines of a period with fair odds and any matching quote.
fn priced_scorelines(
    period: &PeriodReport,
    markets: &[MarketSummary],
    group: MarketGroup,
) -> Vec<PricedScore> {
    period
        .top_scorelines
        .iter()
        .map(|s| {
            let name = score_market_name(group, s.score);
            let quoted = markets.iter().find(|m| m.group == group && m.name == name);
            PricedScore {
                score: s.score,
                probability: s.probability,
                fair_odds: (s.probability > 0.0).then(|| 1.0 / s.probability),
                odds: quoted.and_then(|m| m.odds),
                expected_value: quoted.and_then(|m| m.expected_value),
            }
        })
        .collect()
}

fn recommend(full_time: &PeriodReport, value: &[MarketSummary]) -> Result<Recommendation> {
    let scoreline = full_time.top_scorelines.first().copied().ok_or_else(|| {
        ScorecastError::invalid("max_goals", "scoreline table is empty")
    })?;
    let result = full_time.result.most_likely();
    Ok(Recommendation {
        scoreline,
        result,
        result_probability: full_time.result.probability(result),
        best_value: value.first().cloned(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
