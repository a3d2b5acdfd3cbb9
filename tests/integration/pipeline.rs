//! End-to-end runs of the prediction engine through the public API.

use scorecast::config::AppConfig;
use scorecast::engine::Predictor;
use scorecast::model::{build_table, match_result_probability, GoalRateSpec};
use scorecast::strategy::pricing;
use scorecast::types::{MarketGroup, MarketOdds, MatchOutcome, MatchRequest, Score, ScoreOdds};

fn predictor() -> Predictor {
    Predictor::from_config(&AppConfig::default())
}

#[test]
fn test_reference_match() {
    let mut req = MatchRequest::new(1.5, 1.2);
    req.max_goals = Some(4);
    let report = predictor().predict(&req).unwrap();

    let top = report.full_time.top_scorelines[0];
    assert_eq!(top.score, Score::new(1, 1));
    assert!((top.probability - 0.1210).abs() < 1e-4);
    assert!(report.full_time.residual > 0.0);

    let r = report.full_time.result;
    assert!((r.home_win + r.draw + r.away_win + r.other - 1.0).abs() < 1e-9);
    assert!(r.other > 0.0);
}

#[test]
fn test_report_matches_direct_table() {
    let report = predictor().predict(&MatchRequest::new(2.1, 0.8)).unwrap();
    let table = build_table(2.1, 0.8, 5).unwrap();
    assert_eq!(report.full_time.table, table);
    assert_eq!(report.full_time.result, match_result_probability(&table));
}

#[test]
fn test_full_halftime_fraction_reproduces_full_time() {
    let mut req = MatchRequest::new(1.4, 1.1);
    req.halftime_fraction = Some(1.0);
    let report = predictor().predict(&req).unwrap();
    assert_eq!(report.halftime.table, report.full_time.table);
}

#[test]
fn test_htft_pairs_never_lose_goals() {
    let report = predictor().predict(&MatchRequest::new(1.6, 1.3)).unwrap();
    for pair in &report.htft_scores {
        assert!(pair.halftime.home <= pair.fulltime.home);
        assert!(pair.halftime.away <= pair.fulltime.away);
    }
    let m = report.htft_results;
    assert!((m.modelled() + m.other - 1.0).abs() < 1e-9);
}

#[test]
fn test_symmetric_rates_give_symmetric_result() {
    let report = predictor().predict(&MatchRequest::new(1.3, 1.3)).unwrap();
    let r = report.full_time.result;
    assert!((r.home_win - r.away_win).abs() < 1e-12);
}

#[test]
fn test_full_book_workflow() {
    let req = MatchRequest {
        max_goals: Some(10),
        odds: MarketOdds {
            home_win: Some(1.80),
            draw: Some(3.50),
            away_win: Some(3.90),
            btts_yes: Some(1.77),
            btts_no: Some(1.83),
            over: Some(1.95),
            under: Some(1.85),
            ..Default::default()
        },
        correct_score_odds: vec![ScoreOdds { home: 2, away: 1, odds: 8.5 }],
        ..MatchRequest::new(1.5, 1.2)
    };
    let report = predictor().predict(&req).unwrap();

    let groups: Vec<MarketGroup> = report.margins.iter().map(|m| m.group).collect();
    assert_eq!(
        groups,
        vec![
            MarketGroup::MatchResult,
            MarketGroup::BothTeamsToScore,
            MarketGroup::TotalGoals
        ]
    );
    let expected = pricing::bookmaker_margin(&[1.80, 3.50, 3.90]).unwrap();
    assert_eq!(report.margins[0].margin_pct, expected);

    // Every selection clears the configured threshold.
    for m in &report.value_selections {
        assert!(m.expected_value.unwrap() > 0.0);
        assert!(m.edge.unwrap() >= 0.03);
    }
    let cs = report
        .markets
        .iter()
        .find(|m| m.name == "Correct Score 2-1")
        .unwrap();
    assert_eq!(cs.group, MarketGroup::CorrectScore);
    assert!(cs.fair_odds.is_none());
}

#[test]
fn test_averages_drive_rates() {
    let req = MatchRequest {
        home_rate: GoalRateSpec::Averages {
            scored_avg: 2.0,
            opponent_conceded_avg: 1.0,
            league_avg: None,
        },
        away_rate: GoalRateSpec::Direct(0.5),
        ..MatchRequest::new(0.0, 0.0)
    };
    let report = predictor().predict(&req).unwrap();
    assert!((report.parameters.rates.full_time.home - 1.5).abs() < 1e-12);
    assert_eq!(report.recommendation.result, MatchOutcome::HomeWin);
}

#[test]
fn test_invalid_request_computes_nothing() {
    let mut req = MatchRequest::new(1.5, 1.2);
    req.odds.under = Some(-2.0);
    let err = predictor().predict(&req).unwrap_err();
    assert_eq!(err.field(), Some("odds.under"));
}

#[test]
fn test_config_limits_max_goals() {
    let mut cfg = AppConfig::default();
    cfg.model.max_goals_limit = 8;
    let p = Predictor::from_config(&cfg);
    let mut req = MatchRequest::new(1.0, 1.0);
    req.max_goals = Some(9);
    assert_eq!(p.predict(&req).unwrap_err().field(), Some("max_goals"));
    req.max_goals = Some(8);
    assert_eq!(p.predict(&req).unwrap().full_time.table.home_len(), 9);
}

#[test]
fn test_halftime_and_htft_pricing() {
    let mut req = MatchRequest::new(1.5, 1.2);
    req.max_goals = Some(6);
    req.ht_correct_score_odds = vec![
        ScoreOdds { home: 0, away: 0, odds: 3.2 },
        ScoreOdds { home: 1, away: 0, odds: 5.0 },
    ];
    req.correct_score_odds = vec![ScoreOdds { home: 1, away: 0, odds: 8.5 }];
    let report = predictor().predict(&req).unwrap();

    let ht_markets: Vec<_> = report
        .markets
        .iter()
        .filter(|m| m.group == MarketGroup::HalftimeCorrectScore)
        .collect();
    assert_eq!(ht_markets.len(), 2);
    assert_eq!(ht_markets[1].name, "HT Correct Score 1-0");
    let p10 = report.halftime.table.get(1, 0);
    assert!((ht_markets[1].expected_value.unwrap() - pricing::expected_value(p10, 5.0)).abs() < 1e-12);

    for pair in &report.htft_scores {
        let ht_quote = match (pair.halftime.home, pair.halftime.away) {
            (0, 0) => Some(3.2),
            (1, 0) => Some(5.0),
            _ => None,
        };
        let ft_quote = (pair.fulltime == Score::new(1, 0)).then_some(8.5);
        match (ht_quote, ft_quote) {
            (Some(ht), Some(ft)) => {
                assert_eq!(pair.combined_odds, Some(ht * ft));
                let ev = pricing::expected_value(pair.probability, ht * ft);
                assert!((pair.expected_value.unwrap() - ev).abs() < 1e-12);
            }
            _ => assert!(pair.combined_odds.is_none() && pair.expected_value.is_none()),
        }
    }
    assert!(report.htft_scores.iter().any(|p| p.combined_odds.is_some()));
}
