//! Scoring model: Poisson goal distributions, joint scoreline tables and
//! the markets derived from them.
//!
//! Home and away goal counts are modelled as independent Poisson variables.
//! That independence is a simplification; real-world correlation between
//! the two sides is not captured.

pub mod distribution;
pub mod htft;
pub mod markets;
pub mod rates;
pub mod table;

pub use distribution::{build_distribution, GoalDistribution, MAX_SUPPORTED_GOALS};
pub use htft::{htft_correct_scores, htft_result_probabilities, HtFtResultMatrix, HtFtScore};
pub use markets::{
    btts_probability, match_result_probability, over_under_probability, top_k_scorelines,
};
pub use rates::{attack_defence_rate, GoalRateSpec, PeriodRates, RatePair};
pub use table::{
    build_halftime_table, build_joint_table, build_table, HalftimeFraction, ScorelineTable,
    DEFAULT_HALFTIME_FRACTION,
};
