//! Halftime/full-time combinations.
//!
//! A match is split into two independent halves. The first half uses the
//! full-time rate × halftime fraction, the second half the remainder. The
//! full-time score is the halftime score plus second-half goals, so
//!
//! P(HT = (a, b), FT = (c, d)) = P1(a)·P1(b)·P2(c − a)·P2(d − b)
//!
//! with P1/P2 the per-half Poisson distributions.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::distribution::{build_distribution, GoalDistribution};
use super::rates::PeriodRates;
use crate::types::{MatchOutcome, Result, Score};

/// One halftime/full-time correct-score pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HtFtScore {
    pub halftime: Score,
    pub fulltime: Score,
    pub probability: f64,
    /// HT correct-score odds × FT correct-score odds, when both are quoted.
    pub combined_odds: Option<f64>,
    pub expected_value: Option<f64>,
}

impl HtFtScore {
    pub fn new(halftime: Score, fulltime: Score, probability: f64) -> Self {
        Self {
            halftime,
            fulltime,
            probability,
            combined_odds: None,
            expected_value: None,
        }
    }
}

impl fmt::Display for HtFtScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HT {} / FT {} ({:.2}%)",
            self.halftime,
            self.fulltime,
            self.probability * 100.0
        )?;
        if let (Some(odds), Some(ev)) = (self.combined_odds, self.expected_value) {
            write!(f, "  @ {odds:.2}  EV {:+.1}%", ev * 100.0)?;
        }
        Ok(())
    }
}

/// 3×3 matrix of (halftime result, full-time result) probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HtFtResultMatrix {
    /// Indexed `[halftime][fulltime]` by `MatchOutcome::index`.
    pub cells: [[f64; 3]; 3],
    /// Mass outside the modelled per-half goal range.
    pub other: f64,
}

impl HtFtResultMatrix {
    pub fn get(&self, halftime: MatchOutcome, fulltime: MatchOutcome) -> f64 {
        self.cells[halftime.index()][fulltime.index()]
    }

    /// All nine combinations with labels such as "1/X".
    pub fn labelled(&self) -> Vec<(String, f64)> {
        let mut out = Vec::with_capacity(9);
        for ht in MatchOutcome::ALL {
            for ft in MatchOutcome::ALL {
                out.push((format!("{}/{}", ht.code(), ft.code()), self.get(ht, ft)));
            }
        }
        out
    }

    pub fn modelled(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }

    /// Full-time result marginal (summed over halftime results).
    pub fn fulltime_marginal(&self, fulltime: MatchOutcome) -> f64 {
        MatchOutcome::ALL.iter().map(|ht| self.get(*ht, fulltime)).sum()
    }
}

struct HalfDistributions {
    first_home: GoalDistribution,
    first_away: GoalDistribution,
    second_home: GoalDistribution,
    second_away: GoalDistribution,
}

impl HalfDistributions {
    fn build(rates: &PeriodRates, max_goals: usize) -> Result<Self> {
        Ok(Self {
            first_home: build_distribution(rates.first_half.home, max_goals)?,
            first_away: build_distribution(rates.first_half.away, max_goals)?,
            second_home: build_distribution(rates.second_half.home, max_goals)?,
            second_away: build_distribution(rates.second_half.away, max_goals)?,
        })
    }
}

/// The `k` most likely HT/FT correct-score pairs.
///
/// Full-time scores are bounded by `max_goals` per side, like the
/// full-time table. Order is descending probability, ties in iteration
/// order (halftime home, halftime away, full-time home, full-time away).
pub fn htft_correct_scores(rates: &PeriodRates, max_goals: usize, k: usize) -> Result<Vec<HtFtScore>> {
    let d = HalfDistributions::build(rates, max_goals)?;

    let mut pairs = Vec::new();
    for ht_h in 0..=max_goals {
        for ht_a in 0..=max_goals {
            let p_ht = d.first_home.get(ht_h) * d.first_away.get(ht_a);
            for ft_h in ht_h..=max_goals {
                for ft_a in ht_a..=max_goals {
                    let p = p_ht * d.second_home.get(ft_h - ht_h) * d.second_away.get(ft_a - ht_a);
                    pairs.push(HtFtScore::new(
                        Score::new(ht_h, ht_a),
                        Score::new(ft_h, ft_a),
                        p,
                    ));
                }
            }
        }
    }

    debug!(candidates = pairs.len(), max_goals, "HT/FT correct scores enumerated");
    pairs.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    pairs.truncate(k);
    Ok(pairs)
}

/// HT/FT result probabilities (e.g. "home leads at half, draw at full").
///
/// Each half is truncated at `max_goals` per side; what falls outside is
/// reported as `other`.
pub fn htft_result_probabilities(rates: &PeriodRates, max_goals: usize) -> Result<HtFtResultMatrix> {
    let d = HalfDistributions::build(rates, max_goals)?;

    let mut cells = [[0.0; 3]; 3];
    for ht_h in 0..=max_goals {
        for ht_a in 0..=max_goals {
            let p_ht = d.first_home.get(ht_h) * d.first_away.get(ht_a);
            if p_ht == 0.0 {
                continue;
            }
            let ht = Score::new(ht_h, ht_a).outcome().index();
            for sh_h in 0..=max_goals {
                for sh_a in 0..=max_goals {
                    let p = p_ht * d.second_home.get(sh_h) * d.second_away.get(sh_a);
                    let ft = Score::new(ht_h + sh_h, ht_a + sh_a).outcome().index();
                    cells[ht][ft] += p;
                }
            }
        }
    }

    let modelled: f64 = cells.iter().flatten().sum();
    Ok(HtFtResultMatrix {
        cells,
        other: (1.0 - modelled).max(0.0),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::markets::match_result_probability;
    use crate::model::table::{build_table, HalftimeFraction};

    fn rates(home: f64, away: f64) -> PeriodRates {
        PeriodRates::split(home, away, HalftimeFraction::default())
    }

    #[test]
    fn test_pairs_respect_halftime_bound() {
        let pairs = htft_correct_scores(&rates(1.5, 1.3), 5, usize::MAX).unwrap();
        assert!(!pairs.is_empty());
        for pair in &pairs {
            assert!(pair.halftime.home <= pair.fulltime.home);
            assert!(pair.halftime.away <= pair.fulltime.away);
            assert!(pair.fulltime.home <= 5 && pair.fulltime.away <= 5);
        }
    }

    #[test]
    fn test_top_pair_is_goalless() {
        let pairs = htft_correct_scores(&rates(1.0, 0.8), 5, 3).unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].halftime, Score::new(0, 0));
        assert_eq!(pairs[0].fulltime, Score::new(0, 0));
        assert!(pairs.windows(2).all(|w| w[0].probability >= w[1].probability));
    }

    #[test]
    fn test_pair_probability_formula() {
        let r = rates(1.5, 1.3);
        let pairs = htft_correct_scores(&r, 4, usize::MAX).unwrap();
        let pair = pairs
            .iter()
            .find(|p| p.halftime == Score::new(1, 0) && p.fulltime == Score::new(2, 1))
            .unwrap();

        let pois = |l: f64, k: i32| (-l).exp() * l.powi(k) / (1..=k).map(f64::from).product::<f64>();
        let expected = pois(0.75, 1) * pois(0.65, 0) * pois(0.75, 1) * pois(0.65, 1);
        assert!((pair.probability - expected).abs() < 1e-12);
    }

    #[test]
    fn test_pairs_marginalise_to_fulltime_table() {
        // Summing over halftime scores recovers the full-time cell when the
        // halves split the rate exactly and nothing is truncated.
        let r = rates(1.2, 0.9);
        let pairs = htft_correct_scores(&r, 6, usize::MAX).unwrap();
        let ft_table = build_table(1.2, 0.9, 6).unwrap();
        let cell: f64 = pairs
            .iter()
            .filter(|p| p.fulltime == Score::new(1, 1))
            .map(|p| p.probability)
            .sum();
        assert!((cell - ft_table.get(1, 1)).abs() < 1e-12);
    }

    #[test]
    fn test_pairs_start_unpriced() {
        let pairs = htft_correct_scores(&rates(1.5, 1.3), 4, 3).unwrap();
        assert!(pairs.iter().all(|p| p.combined_odds.is_none() && p.expected_value.is_none()));
        assert!(!pairs[0].to_string().contains('@'));
    }

    #[test]
    fn test_priced_pair_display() {
        let mut pair = HtFtScore::new(Score::new(1, 0), Score::new(2, 1), 0.02);
        pair.combined_odds = Some(60.0);
        pair.expected_value = Some(0.2);
        assert_eq!(pair.to_string(), "HT 1-0 / FT 2-1 (2.00%)  @ 60.00  EV +20.0%");
    }

    #[test]
    fn test_result_matrix_sums_to_one() {
        let m = htft_result_probabilities(&rates(1.5, 1.2), 6).unwrap();
        assert!((m.modelled() + m.other - 1.0).abs() < 1e-12);
        assert_eq!(m.labelled().len(), 9);
        assert_eq!(m.labelled()[0].0, "1/1");
    }

    #[test]
    fn test_result_matrix_marginal_matches_fulltime() {
        let m = htft_result_probabilities(&rates(1.5, 1.2), 10).unwrap();
        let split = match_result_probability(&build_table(1.5, 1.2, 20).unwrap());
        assert!((m.fulltime_marginal(MatchOutcome::HomeWin) - split.home_win).abs() < 1e-6);
        assert!((m.fulltime_marginal(MatchOutcome::Draw) - split.draw).abs() < 1e-6);
    }

    #[test]
    fn test_both_zero_is_draw_draw() {
        let m = htft_result_probabilities(&rates(0.0, 0.0), 3).unwrap();
        assert_eq!(m.get(MatchOutcome::Draw, MatchOutcome::Draw), 1.0);
        assert_eq!(m.other, 0.0);
    }

    #[test]
    fn test_fraction_one_leaves_no_second_half() {
        let r = PeriodRates::split(1.4, 1.1, HalftimeFraction::new(1.0).unwrap());
        let m = htft_result_probabilities(&r, 8).unwrap();
        // Nothing changes after halftime, so results never flip.
        assert_eq!(m.get(MatchOutcome::HomeWin, MatchOutcome::Draw), 0.0);
        assert_eq!(m.get(MatchOutcome::AwayWin, MatchOutcome::HomeWin), 0.0);
    }
}
