//! SCORECAST — Poisson scoreline engine
//!
//! Entry point. Loads `.env` and configuration, initialises structured
//! logging, then runs one CLI subcommand: a prediction, a margin or EV
//! calculation, or the HTTP service.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use scorecast::api::{self, ServiceState};
use scorecast::config::{AppConfig, DEFAULT_CONFIG_FILE};
use scorecast::engine::Predictor;
use scorecast::model::GoalRateSpec;
use scorecast::strategy::pricing;
use scorecast::types::{MarketOdds, MatchRequest, ScoreOdds};

const BANNER: &str = r#"
 ___  ___ ___  ___ ___ ___   _   ___ _____
/ __|/ __/ _ \| _ \ __/ __| /_\ / __|_   _|
\__ \ (_| (_) |   / _| (__ / _ \\__ \ | |
|___/\___\___/|_|_\___\___/_/ \_\___/ |_|

  Poisson scorelines, derived markets and value
  v0.1.0
"#;

/// Poisson scoreline and derived-market engine
#[derive(Parser, Debug)]
#[command(name = "scorecast")]
#[command(version)]
struct Cli {
    /// Config file (missing file means built-in defaults)
    #[arg(long, global = true, env = "SCORECAST_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    config: String,

    /// JSON output for scripting
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Predict scorelines and markets for one match
    Predict(Box<PredictArgs>),

    /// Bookmaker margin of a set of decimal odds
    Margin(MarginArgs),

    /// Expected value of a bet
    Ev(EvArgs),

    /// Run the HTTP API
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// Home expected goals
    #[arg(long, allow_hyphen_values = true, required_unless_present = "input")]
    home: Option<f64>,

    /// Away expected goals
    #[arg(long, allow_hyphen_values = true, required_unless_present = "input")]
    away: Option<f64>,

    /// Read a JSON request; flags given alongside override its fields
    #[arg(long)]
    input: Option<String>,

    /// Highest goal count per side
    #[arg(long)]
    max_goals: Option<usize>,

    /// First-half share of the goal rate, in (0, 1]
    #[arg(long, allow_hyphen_values = true)]
    halftime_fraction: Option<f64>,

    /// Full-time over/under line
    #[arg(long, allow_hyphen_values = true)]
    line: Option<f64>,

    /// Halftime over/under line
    #[arg(long, allow_hyphen_values = true)]
    ht_line: Option<f64>,

    /// Number of scorelines to list
    #[arg(long)]
    top: Option<usize>,

    #[command(flatten)]
    odds: OddsArgs,

    /// Correct-score quote as HOME-AWAY:ODDS (repeatable), e.g. 1-1:6.5
    #[arg(long = "score-odds", value_parser = parse_score_odds, allow_hyphen_values = true)]
    score_odds: Vec<ScoreOdds>,

    /// Halftime correct-score quote as HOME-AWAY:ODDS (repeatable)
    #[arg(long = "ht-score-odds", value_parser = parse_score_odds, allow_hyphen_values = true)]
    ht_score_odds: Vec<ScoreOdds>,
}

#[derive(Args, Debug)]
struct OddsArgs {
    #[arg(long, allow_hyphen_values = true)]
    home_odds: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    draw_odds: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    away_odds: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    ht_home_odds: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    ht_draw_odds: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    ht_away_odds: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    btts_yes_odds: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    btts_no_odds: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    over_odds: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    under_odds: Option<f64>,
}

impl OddsArgs {
    /// Overlay the quotes given on the command line onto `odds`.
    fn apply(&self, odds: &mut MarketOdds) {
        let pairs = [
            (&mut odds.home_win, self.home_odds),
            (&mut odds.draw, self.draw_odds),
            (&mut odds.away_win, self.away_odds),
            (&mut odds.ht_home_win, self.ht_home_odds),
            (&mut odds.ht_draw, self.ht_draw_odds),
            (&mut odds.ht_away_win, self.ht_away_odds),
            (&mut odds.btts_yes, self.btts_yes_odds),
            (&mut odds.btts_no, self.btts_no_odds),
            (&mut odds.over, self.over_odds),
            (&mut odds.under, self.under_odds),
        ];
        for (slot, flag) in pairs {
            if flag.is_some() {
                *slot = flag;
            }
        }
    }
}

#[derive(Args, Debug)]
struct MarginArgs {
    /// Decimal odds of every outcome in the market
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    odds: Vec<f64>,
}

#[derive(Args, Debug)]
struct EvArgs {
    /// Model probability of the outcome
    #[arg(long, allow_hyphen_values = true)]
    probability: f64,

    /// Decimal odds offered
    #[arg(long, allow_hyphen_values = true)]
    odds: f64,
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Listen port (overrides `server.port`)
    #[arg(long)]
    port: Option<u16>,
}

fn parse_score_odds(s: &str) -> std::result::Result<ScoreOdds, String> {
    let (score, odds) = s
        .split_once(':')
        .ok_or_else(|| format!("expected HOME-AWAY:ODDS, got `{s}`"))?;
    let (home, away) = score
        .split_once('-')
        .ok_or_else(|| format!("expected HOME-AWAY before `:`, got `{score}`"))?;
    Ok(ScoreOdds {
        home: home.trim().parse().map_err(|e| format!("home goals: {e}"))?,
        away: away.trim().parse().map_err(|e| format!("away goals: {e}"))?,
        odds: odds.trim().parse().map_err(|e| format!("odds: {e}"))?,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = AppConfig::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Predict(args) => run_predict(&cfg, &args, cli.json),
        Commands::Margin(args) => run_margin(&args, cli.json),
        Commands::Ev(args) => run_ev(&cfg, &args, cli.json),
        Commands::Serve(args) => {
            eprintln!("{BANNER}");
            let port = args.port.unwrap_or(cfg.server.port);
            info!(
                port,
                max_goals = cfg.model.max_goals,
                min_edge = cfg.value.min_edge,
                "SCORECAST API starting up"
            );
            api::serve(Arc::new(ServiceState::new(cfg)), port).await
        }
    }
}

fn build_request(args: &PredictArgs) -> Result<MatchRequest> {
    let mut request = match &args.input {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read request file: {path}"))?;
            serde_json::from_str::<MatchRequest>(&raw)
                .with_context(|| format!("Failed to parse request file: {path}"))?
        }
        None => MatchRequest::new(0.0, 0.0),
    };

    if let Some(home) = args.home {
        request.home_rate = GoalRateSpec::Direct(home);
    }
    if let Some(away) = args.away {
        request.away_rate = GoalRateSpec::Direct(away);
    }
    request.max_goals = args.max_goals.or(request.max_goals);
    request.halftime_fraction = args.halftime_fraction.or(request.halftime_fraction);
    request.goal_line = args.line.or(request.goal_line);
    request.halftime_goal_line = args.ht_line.or(request.halftime_goal_line);
    request.top_k = args.top.or(request.top_k);
    args.odds.apply(&mut request.odds);
    request.correct_score_odds.extend(args.score_odds.iter().copied());
    request
        .ht_correct_score_odds
        .extend(args.ht_score_odds.iter().copied());
    Ok(request)
}

fn run_predict(cfg: &AppConfig, args: &PredictArgs, json: bool) -> Result<()> {
    let request = build_request(args)?;
    let report = Predictor::from_config(cfg).predict(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn run_margin(args: &MarginArgs, json: bool) -> Result<()> {
    let margin_pct = pricing::bookmaker_margin(&args.odds)?;
    let implied = args
        .odds
        .iter()
        .map(|&o| pricing::implied_probability(o))
        .collect::<scorecast::types::Result<Vec<_>>>()?;

    if json {
        let out = serde_json::json!({ "margin_pct": margin_pct, "implied": implied });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (odds, p) in args.odds.iter().zip(&implied) {
            println!("{odds:>8.2}  implied {:.2}%", p * 100.0);
        }
        println!("Margin: {margin_pct:.2}%");
    }
    Ok(())
}

fn run_ev(cfg: &AppConfig, args: &EvArgs, json: bool) -> Result<()> {
    let eval = Predictor::from_config(cfg)
        .pricer()
        .evaluate(args.probability, args.odds)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&eval)?);
    } else {
        println!("Expected value: {:+.2}%", eval.expected_value * 100.0);
        println!("Implied:        {:.2}%", eval.implied_probability * 100.0);
        println!("Edge:           {:+.2}%", eval.edge * 100.0);
        println!("Kelly stake:    {:.2}%", eval.kelly_fraction * 100.0);
    }
    Ok(())
}

/// Initialise the `tracing` subscriber on stderr.
///
/// If `SCORECAST_LOG_JSON` is set, uses JSON format.
/// Otherwise, uses human-readable format.
fn init_logging(verbose: u8) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = match verbose {
        0 => "scorecast=info",
        1 => "scorecast=debug",
        _ => "scorecast=trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let json_logging = std::env::var("SCORECAST_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    }
}
