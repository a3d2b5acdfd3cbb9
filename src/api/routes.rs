//! API route handlers.
//!
//! All endpoints return JSON. Invalid input maps to `400` with the
//! offending field named in the body.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{AppConfig, ModelConfig};
use crate::engine::{MatchReport, Predictor};
use crate::strategy::{pricing, QuoteEvaluation};
use crate::types::{MatchRequest, ScorecastError};

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Immutable state shared by all handlers.
pub struct ServiceState {
    pub config: AppConfig,
    pub predictor: Predictor,
}

impl ServiceState {
    pub fn new(config: AppConfig) -> Self {
        let predictor = Predictor::from_config(&config);
        Self { config, predictor }
    }
}

pub type AppState = Arc<ServiceState>;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MarginRequest {
    pub odds: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarginResponse {
    pub margin_pct: f64,
    pub implied: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedValueRequest {
    pub probability: f64,
    pub odds: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub field: Option<String>,
}

/// `ScorecastError` rendered as a `400` JSON body.
#[derive(Debug)]
pub struct ApiError(pub ScorecastError);

impl From<ScorecastError> for ApiError {
    fn from(err: ScorecastError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "Request rejected");
        let body = ErrorBody {
            error: self.0.to_string(),
            field: self.0.field().map(str::to_string),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

/// POST /api/predict
pub async fn predict(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchReport>, ApiError> {
    let report = state.predictor.predict(&request)?;
    Ok(Json(report))
}

/// POST /api/margin
pub async fn margin(Json(request): Json<MarginRequest>) -> Result<Json<MarginResponse>, ApiError> {
    let margin_pct = pricing::bookmaker_margin(&request.odds)?;
    let implied = request
        .odds
        .iter()
        .map(|&o| pricing::implied_probability(o))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(quotes = request.odds.len(), margin_pct, "Margin computed");
    Ok(Json(MarginResponse {
        margin_pct,
        implied,
    }))
}

/// POST /api/expected-value
pub async fn expected_value(
    State(state): State<AppState>,
    Json(request): Json<ExpectedValueRequest>,
) -> Result<Json<QuoteEvaluation>, ApiError> {
    let eval = state
        .predictor
        .pricer()
        .evaluate(request.probability, request.odds)?;
    Ok(Json(eval))
}

/// GET /api/config
pub async fn get_config(State(state): State<AppState>) -> Json<ModelConfig> {
    Json(state.config.model.clone())
}

/// GET /health
pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
