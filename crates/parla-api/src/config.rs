//! Environment-driven configuration.
//!
//! Variables are read with `envy`, so `GEMINI_API_KEY` fills `gemini_api_key`
//! and so on. Only `DATABASE_URL` is required.

use parla_core::{PointsPolicy, ScoringConfig, ScoringConfigError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub const fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    pub const fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid environment: {0}")]
    Env(#[from] envy::Error),
    #[error("Invalid scoring thresholds: {0}")]
    Scoring(#[from] ScoringConfigError),
    #[error("CHAT_POINTS must be non-negative, got {0}")]
    NegativeChatPoints(i64),
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApiConfig {
    pub database_url: String,
    #[serde(default)]
    pub env: Environment,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    /// Comma-separated in the environment
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// AI routes answer 503 when unset
    #[serde(default)]
    pub gemini_api_key: Option<String>,
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,

    #[serde(default = "default_correct_threshold")]
    pub scoring_correct_threshold: f64,
    #[serde(default = "default_perfect")]
    pub scoring_perfect: f64,
    #[serde(default = "default_very_good")]
    pub scoring_very_good: f64,
    #[serde(default = "default_good")]
    pub scoring_good: f64,
    #[serde(default = "default_needs_improvement")]
    pub scoring_needs_improvement: f64,

    #[serde(default = "default_chat_points")]
    pub chat_points: i64,
}

fn default_port() -> u16 {
    3000
}

fn default_db_max_connections() -> u32 {
    10
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:8080".to_string()]
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_correct_threshold() -> f64 {
    ScoringConfig::default().correct_threshold
}

fn default_perfect() -> f64 {
    ScoringConfig::default().perfect
}

fn default_very_good() -> f64 {
    ScoringConfig::default().very_good
}

fn default_good() -> f64 {
    ScoringConfig::default().good
}

fn default_needs_improvement() -> f64 {
    ScoringConfig::default().needs_improvement
}

fn default_chat_points() -> i64 {
    PointsPolicy::default().chat_points
}

impl ApiConfig {
    /// Load from the process environment and validate.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config: Self = envy::from_env()?;
        config.validated()
    }

    /// Load from explicit `(KEY, value)` pairs and validate.
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Self = envy::from_iter(vars)?;
        config.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        self.gemini_api_key = self
            .gemini_api_key
            .take()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        self.allowed_origins = self
            .allowed_origins
            .into_iter()
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        self.scoring_config().validate()?;
        if self.chat_points < 0 {
            return Err(ConfigError::NegativeChatPoints(self.chat_points));
        }
        Ok(self)
    }

    pub const fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            correct_threshold: self.scoring_correct_threshold,
            perfect: self.scoring_perfect,
            very_good: self.scoring_very_good,
            good: self.scoring_good,
            needs_improvement: self.scoring_needs_improvement,
        }
    }

    pub fn points_policy(&self) -> PointsPolicy {
        PointsPolicy {
            chat_points: self.chat_points,
            ..PointsPolicy::default()
        }
    }
}
