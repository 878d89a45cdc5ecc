use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use parla_core::{ProficiencyLevel, ProgressAggregate, ProgressDelta};
use parla_db::repositories::vocabulary;
use serde::Serialize;
use uuid::Uuid;

use crate::{ApiState, error::ApiError, learner::require_learner, metrics::record_progress_delta};

/// Words listed under `recent_vocabulary`
const RECENT_VOCABULARY: i64 = 10;

pub fn routes() -> Router<ApiState> {
    Router::new().route(
        "/learners/{learner_id}/progress",
        get(get_progress).post(apply_progress),
    )
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub learner_id: Uuid,
    pub level: ProficiencyLevel,
    pub progress: ProgressAggregate,
    pub recent_vocabulary: Vec<String>,
}

async fn get_progress(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let learner = require_learner(&state.pool, learner_id).await?;
    let progress = state.progress.read(learner_id).await?;
    let recent = vocabulary::list_for_learner(&state.pool, learner_id, Some(RECENT_VOCABULARY))
        .await?
        .into_iter()
        .map(|entry| entry.item.word)
        .collect();

    Ok(Json(ProgressResponse {
        learner_id,
        level: learner.proficiency(),
        progress,
        recent_vocabulary: recent,
    }))
}

/// Fold an explicit delta; omitted fields count as zero and negative ones
/// are rejected without touching the stored counters.
async fn apply_progress(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
    Json(delta): Json<ProgressDelta>,
) -> Result<Json<ProgressAggregate>, ApiError> {
    let progress = state.progress.apply_delta(learner_id, delta).await?;
    record_progress_delta("manual", &delta);

    Ok(Json(progress))
}
