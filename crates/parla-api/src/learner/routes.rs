use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use parla_db::{
    models::Learner,
    repositories::{learner, progress},
};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use super::model::{CreateLearnerRequest, LearnerResponse, TopicsResponse, UpdateLevelRequest};
use crate::{ApiState, error::ApiError, validation};

/// Create the learner routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/learners", post(get_or_create_learner))
        .route("/learners/{learner_id}", get(get_learner))
        .route("/learners/{learner_id}/level", patch(update_level))
        .route("/topics/{level}", get(get_topics))
}

/// Load a learner or fail with 404.
pub async fn require_learner(pool: &PgPool, learner_id: Uuid) -> Result<Learner, ApiError> {
    learner::find_by_id(pool, learner_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Learner {learner_id} not found")))
}

/// Get-or-create by name; 201 when a new learner was created
async fn get_or_create_learner(
    State(state): State<ApiState>,
    Json(payload): Json<CreateLearnerRequest>,
) -> Result<(StatusCode, Json<LearnerResponse>), ApiError> {
    payload.validate()?;
    let name = payload.name.trim();

    // Learner and zeroed progress row appear together
    let mut tx = state.pool.begin().await?;
    let upsert = learner::get_or_create(&mut *tx, name).await?;
    progress::create_if_missing(&mut *tx, upsert.learner.id).await?;
    tx.commit().await?;

    let aggregate = state.progress.read(upsert.learner.id).await?;

    let status = if upsert.created {
        tracing::info!(learner_id = %upsert.learner.id, "Created learner");
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(LearnerResponse {
            learner: upsert.learner,
            progress: aggregate,
        }),
    ))
}

async fn get_learner(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
) -> Result<Json<LearnerResponse>, ApiError> {
    let learner = require_learner(&state.pool, learner_id).await?;
    let aggregate = state.progress.read(learner_id).await?;

    Ok(Json(LearnerResponse {
        learner,
        progress: aggregate,
    }))
}

async fn update_level(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
    Json(payload): Json<UpdateLevelRequest>,
) -> Result<Json<LearnerResponse>, ApiError> {
    let level = validation::parse_level(&payload.level)?;

    let learner = learner::update_level(&state.pool, learner_id, level.as_str())
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Learner {learner_id} not found")))?;
    let aggregate = state.progress.read(learner_id).await?;

    tracing::info!(%learner_id, %level, "Updated learner level");

    Ok(Json(LearnerResponse {
        learner,
        progress: aggregate,
    }))
}

async fn get_topics(Path(level): Path<String>) -> Result<Json<TopicsResponse>, ApiError> {
    let level = validation::parse_level(&level)?;

    Ok(Json(TopicsResponse {
        level,
        topics: level.topics(),
    }))
}
