//! CLI exit codes and output.

use assert_cmd::Command;
use predicates::prelude::*;

fn scorecast() -> Command {
    let mut cmd = Command::cargo_bin("scorecast").unwrap();
    cmd.env_remove("SCORECAST_CONFIG")
        .env_remove("SCORECAST_LOG_JSON")
        .arg("--config")
        .arg("no-such-config.toml");
    cmd
}

#[test]
fn test_predict_succeeds() {
    scorecast()
        .args(["predict", "--home", "1.5", "--away", "1.2", "--max-goals", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Most likely score:  1-1"));
}

#[test]
fn test_predict_json_output() {
    scorecast()
        .args(["--json", "predict", "--home", "1.5", "--away", "1.2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"recommendation\""));
}

#[test]
fn test_predict_with_odds_flags() {
    scorecast()
        .args([
            "predict", "--home", "1.5", "--away", "1.2", "--home-odds", "1.8", "--draw-odds", "3.5",
            "--away-odds", "3.9", "--score-odds", "1-1:6.5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("1X2 margin"));
}

#[test]
fn test_negative_rate_fails() {
    scorecast()
        .args(["predict", "--home=-1", "--away", "1.2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("home_rate"));
}

#[test]
fn test_zero_odds_fails() {
    scorecast()
        .args(["predict", "--home", "1.5", "--away", "1.2", "--draw-odds", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("odds.draw"));
}

#[test]
fn test_zero_max_goals_fails() {
    scorecast()
        .args(["predict", "--home", "1.5", "--away", "1.2", "--max-goals", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_goals"));
}

#[test]
fn test_missing_rate_is_usage_error() {
    scorecast().args(["predict", "--home", "1.5"]).assert().failure();
}

#[test]
fn test_margin_command() {
    scorecast()
        .args(["margin", "2.0", "2.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Margin: 0.00%"));
}

#[test]
fn test_margin_rejects_zero() {
    scorecast()
        .args(["margin", "2.0", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("odds[1]"));
}

#[test]
fn test_ev_command() {
    scorecast()
        .args(["ev", "--probability", "0.6", "--odds", "2.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Expected value: +20.00%"));
}

#[test]
fn test_predict_from_input_file_with_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("match.json");
    std::fs::write(
        &path,
        r#"{ "home_rate": 1.5, "away_rate": 1.2, "max_goals": 8, "odds": { "draw": 3.5 } }"#,
    )
    .unwrap();

    scorecast()
        .arg("--json")
        .arg("predict")
        .arg("--input")
        .arg(&path)
        .args(["--max-goals", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"max_goals\": 3"))
        .stdout(predicate::str::contains("\"odds\": 3.5"));
}

#[test]
fn test_missing_input_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    scorecast()
        .arg("predict")
        .arg("--input")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read request file"));
}

#[test]
fn test_input_file_with_averages() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(
        &mut file,
        br#"{
            "home_rate": { "scored_avg": 1.8, "opponent_conceded_avg": 1.5, "league_avg": 1.35 },
            "away_rate": { "scored_avg": 1.2, "opponent_conceded_avg": 1.0 }
        }"#,
    )
    .unwrap();

    scorecast()
        .arg("predict")
        .arg("--input")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Goal rates: home 2.00"));
}

#[test]
fn test_input_file_with_unknown_field_fails() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    std::io::Write::write_all(
        &mut file,
        br#"{ "home_rate": 1.5, "away_rate": 1.2, "odds": { "btts_yess": 2.0 } }"#,
    )
    .unwrap();

    scorecast()
        .arg("predict")
        .arg("--input")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse request file"));
}

#[test]
fn test_htft_pair_priced_from_flags() {
    scorecast()
        .args([
            "predict", "--home", "1.5", "--away", "1.2", "--ht-score-odds", "0-0:3.5",
            "--score-odds", "0-0:12",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("HT 0-0 / FT 0-0"))
        .stdout(predicate::str::contains("@ 42.00"));
}

#[test]
fn test_duplicate_score_flags_fail() {
    scorecast()
        .args([
            "predict", "--home", "1.5", "--away", "1.2", "--score-odds", "1-1:6.5",
            "--score-odds", "1-1:7",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("correct_score_odds[1]"));
}
