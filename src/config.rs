//! Configuration loading from TOML.
//!
//! Reads `config.toml` (or the path in `SCORECAST_CONFIG`) into strongly
//! typed structs. Every section is optional; missing values fall back to
//! the model defaults. The file only supplies defaults: each request can
//! still override them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::model::distribution::MAX_SUPPORTED_GOALS;
use crate::model::table::DEFAULT_HALFTIME_FRACTION;
use crate::strategy::edge::EdgeConfig;
use crate::strategy::kelly::KellyConfig;
use crate::types::ScorecastError;

/// Default config file path.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub value: ValueConfig,
    pub server: ServerConfig,
}

/// Scoring model defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Highest goal count per side in the scoreline table.
    pub max_goals: usize,
    /// Largest `max_goals` a request may ask for.
    pub max_goals_limit: usize,
    /// Share of the full-time rate expected by halftime.
    pub halftime_fraction: f64,
    /// Full-time over/under goal line.
    pub goal_line: f64,
    /// Halftime over/under goal line.
    pub halftime_goal_line: f64,
    /// Number of scorelines listed.
    pub top_k: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_goals: 5,
            max_goals_limit: 15,
            halftime_fraction: DEFAULT_HALFTIME_FRACTION,
            goal_line: 2.5,
            halftime_goal_line: 1.5,
            top_k: 5,
        }
    }
}

/// Value detection and stake sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueConfig {
    pub min_edge: f64,
    pub kelly_multiplier: f64,
    pub max_stake_pct: f64,
}

impl Default for ValueConfig {
    fn default() -> Self {
        Self {
            min_edge: 0.03,
            kelly_multiplier: 0.25,
            max_stake_pct: 0.05,
        }
    }
}

impl ValueConfig {
    pub fn edge_config(&self) -> EdgeConfig {
        EdgeConfig {
            min_edge: self.min_edge,
        }
    }

    pub fn kelly_config(&self) -> KellyConfig {
        KellyConfig {
            multiplier: self.kelly_multiplier,
            max_stake_pct: self.max_stake_pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!(path, "No config file found, using defaults");
            return Ok(Self::default());
        }
        let cfg = Self::load(path)?;
        info!(path, "Config loaded");
        Ok(cfg)
    }

    /// Parse and validate TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject defaults that no request could be computed with.
    pub fn validate(&self) -> std::result::Result<(), ScorecastError> {
        let m = &self.model;
        if m.max_goals == 0 {
            return Err(ScorecastError::Config("model.max_goals must be at least 1".into()));
        }
        if m.max_goals_limit > MAX_SUPPORTED_GOALS {
            return Err(ScorecastError::Config(format!(
                "model.max_goals_limit ({}) exceeds the supported ceiling ({MAX_SUPPORTED_GOALS})",
                m.max_goals_limit
            )));
        }
        if m.max_goals > m.max_goals_limit {
            return Err(ScorecastError::Config(format!(
                "model.max_goals ({}) exceeds model.max_goals_limit ({})",
                m.max_goals, m.max_goals_limit
            )));
        }
        if !(m.halftime_fraction > 0.0 && m.halftime_fraction <= 1.0) {
            return Err(ScorecastError::Config(format!(
                "model.halftime_fraction must be in (0, 1], got {}",
                m.halftime_fraction
            )));
        }
        if !m.goal_line.is_finite() || m.goal_line < 0.0 {
            return Err(ScorecastError::Config(format!(
                "model.goal_line must be non-negative, got {}",
                m.goal_line
            )));
        }
        if !m.halftime_goal_line.is_finite() || m.halftime_goal_line < 0.0 {
            return Err(ScorecastError::Config(format!(
                "model.halftime_goal_line must be non-negative, got {}",
                m.halftime_goal_line
            )));
        }
        if m.top_k == 0 {
            return Err(ScorecastError::Config("model.top_k must be at least 1".into()));
        }

        let v = &self.value;
        if !(v.kelly_multiplier > 0.0 && v.kelly_multiplier <= 1.0) {
            return Err(ScorecastError::Config(format!(
                "value.kelly_multiplier must be in (0, 1], got {}",
                v.kelly_multiplier
            )));
        }
        if !(v.max_stake_pct > 0.0 && v.max_stake_pct <= 1.0) {
            return Err(ScorecastError::Config(format!(
                "value.max_stake_pct must be in (0, 1], got {}",
                v.max_stake_pct
            )));
        }
        if !v.min_edge.is_finite() {
            return Err(ScorecastError::Config("value.min_edge must be finite".into()));
        }
        Ok(())
    }
}
