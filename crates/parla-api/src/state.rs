use parla_core::{PointsPolicy, ProgressTracker, SimilarityScorer};
use parla_db::PgProgressStore;
use sqlx::PgPool;

use crate::{ApiConfig, config::Environment, error::ApiError, gemini::GeminiClient};

#[derive(Clone, Debug)]
pub struct ApiState {
    pub pool: PgPool,
    pub environment: Environment,
    /// `None` when no API key is configured
    pub gemini: Option<GeminiClient>,
    pub scorer: SimilarityScorer,
    pub progress: ProgressTracker<PgProgressStore>,
    pub points: PointsPolicy,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> anyhow::Result<Self> {
        let gemini = match &config.gemini_api_key {
            Some(key) => Some(GeminiClient::new(
                key.as_str(),
                config.gemini_model.as_str(),
                config.gemini_base_url.as_str(),
            )?),
            None => {
                tracing::warn!("GEMINI_API_KEY not set, AI-backed routes will answer 503");
                None
            }
        };

        Ok(Self {
            progress: ProgressTracker::new(PgProgressStore::new(pool.clone())),
            pool,
            environment: config.env,
            gemini,
            scorer: SimilarityScorer::new(config.scoring_config()),
            points: config.points_policy(),
        })
    }

    /// The AI client, or `AiUnavailable` if none is configured.
    pub fn gemini(&self) -> Result<&GeminiClient, ApiError> {
        self.gemini.as_ref().ok_or(ApiError::AiUnavailable)
    }
}
