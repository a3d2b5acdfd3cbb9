//! HTTP API driven through the router without binding a socket.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use scorecast::api::{build_router, ServiceState};
use scorecast::config::AppConfig;

fn app() -> axum::Router {
    build_router(Arc::new(ServiceState::new(AppConfig::default())))
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_json(resp: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), 1_000_000).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_predict_with_odds() {
    let body = serde_json::json!({
        "home_rate": 1.5,
        "away_rate": 1.2,
        "odds": { "home_win": 1.80, "draw": 3.50, "away_win": 3.90 },
        "correct_score_odds": [{ "home": 1, "away": 1, "odds": 6.5 }]
    });
    let resp = app().oneshot(post_json("/api/predict", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = read_json(resp).await;
    assert_eq!(json["margins"][0]["group"], "match_result");
    assert!(json["markets"].as_array().unwrap().len() >= 11);
    assert!(json["htft_results"]["cells"].as_array().unwrap().len() == 3);
}

#[tokio::test]
async fn test_predict_with_averages() {
    let body = serde_json::json!({
        "home_rate": { "scored_avg": 1.8, "opponent_conceded_avg": 1.5, "league_avg": 1.35 },
        "away_rate": 1.0
    });
    let resp = app().oneshot(post_json("/api/predict", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = read_json(resp).await;
    let home = json["parameters"]["rates"]["full_time"]["home"].as_f64().unwrap();
    assert!((home - 2.0).abs() < 1e-12);
}

#[tokio::test]
async fn test_predict_rejects_unknown_fields() {
    let bodies = [
        serde_json::json!({ "home_rate": 1.5, "away_rate": 1.2, "odds": { "btts_yess": 0.0 } }),
        serde_json::json!({ "home_rate": 1.5, "away_rate": 1.2, "maxgoals": 3 }),
        serde_json::json!({
            "home_rate": 1.5,
            "away_rate": 1.2,
            "correct_score_odds": [{ "home": 1, "away": 1, "price": 6.5 }]
        }),
    ];
    for body in bodies {
        let resp = app().oneshot(post_json("/api/predict", body)).await.unwrap();
        assert!(resp.status().is_client_error(), "{}", resp.status());
    }
}

#[tokio::test]
async fn test_predict_prices_halftime_scores() {
    let body = serde_json::json!({
        "home_rate": 1.5,
        "away_rate": 1.2,
        "max_goals": 4,
        "correct_score_odds": [{ "home": 0, "away": 0, "odds": 12.0 }],
        "ht_correct_score_odds": [{ "home": 0, "away": 0, "odds": 3.5 }]
    });
    let resp = app().oneshot(post_json("/api/predict", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = read_json(resp).await;
    assert_eq!(json["priced_halftime_scorelines"][0]["odds"], 3.5);
    let pair = &json["htft_scores"][0];
    assert_eq!(pair["combined_odds"], 42.0);
    assert!(pair["expected_value"].is_number());
    assert!(json["htft_scores"][1]["combined_odds"].is_null());
}

#[tokio::test]
async fn test_predict_rejects_duplicate_score_quote() {
    let body = serde_json::json!({
        "home_rate": 1.5,
        "away_rate": 1.2,
        "correct_score_odds": [
            { "home": 1, "away": 1, "odds": 6.5 },
            { "home": 1, "away": 1, "odds": 7.0 }
        ]
    });
    let resp = app().oneshot(post_json("/api/predict", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(resp).await["field"], "correct_score_odds[1]");
}

#[tokio::test]
async fn test_predict_rejects_zero_max_goals() {
    let body = serde_json::json!({ "home_rate": 1.5, "away_rate": 1.2, "max_goals": 0 });
    let resp = app().oneshot(post_json("/api/predict", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(resp).await["field"], "max_goals");
}

#[tokio::test]
async fn test_predict_rejects_bad_average() {
    let body = serde_json::json!({
        "home_rate": 1.5,
        "away_rate": { "scored_avg": 1.2, "opponent_conceded_avg": -0.4 }
    });
    let resp = app().oneshot(post_json("/api/predict", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(resp).await["field"], "away_rate.opponent_conceded_avg");
}

#[tokio::test]
async fn test_margin_rejects_empty_list() {
    let resp = app()
        .oneshot(post_json("/api/margin", serde_json::json!({ "odds": [] })))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(resp).await["field"], "odds");
}

#[tokio::test]
async fn test_expected_value_break_even() {
    let resp = app()
        .oneshot(post_json(
            "/api/expected-value",
            serde_json::json!({ "probability": 0.5, "odds": 2.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = read_json(resp).await;
    assert_eq!(json["expected_value"].as_f64().unwrap(), 0.0);
    assert_eq!(json["kelly_fraction"].as_f64().unwrap(), 0.0);
}

#[tokio::test]
async fn test_expected_value_rejects_probability_above_one() {
    let resp = app()
        .oneshot(post_json(
            "/api/expected-value",
            serde_json::json!({ "probability": 1.5, "odds": 2.0 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(resp).await["field"], "probability");
}
