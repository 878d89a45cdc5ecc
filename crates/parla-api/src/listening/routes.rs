use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use parla_core::{ComparisonResult, FeedbackTier, ProgressAggregate};
use parla_db::{apply_delta_in, models::NewListeningAttempt, repositories::exercise};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::feedback::feedback_message;
use crate::{
    ApiState,
    error::ApiError,
    gemini::{Difficulty, parse, prompts},
    learner::require_learner,
    metrics::{record_progress_delta, record_score},
    validation::not_blank,
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/listening/sentence", get(generate_sentence))
        .route("/learners/{learner_id}/listening/check", post(check_dictation))
        .route("/compare", post(compare))
}

#[derive(Debug, Deserialize)]
pub struct SentenceQuery {
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Serialize)]
pub struct SentenceResponse {
    pub sentence: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CheckRequest {
    #[validate(
        length(min = 1, max = 500, message = "must be between 1 and 500 characters"),
        custom(function = "not_blank")
    )]
    pub sentence: String,
    #[validate(
        length(min = 1, max = 500, message = "must be between 1 and 500 characters"),
        custom(function = "not_blank")
    )]
    pub answer: String,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    #[serde(flatten)]
    pub result: ComparisonResult,
    pub percentage: f64,
    pub feedback: &'static str,
    /// AI explanation of the mistakes; absent for perfect answers or when
    /// the AI is unavailable
    pub analysis: Option<String>,
    pub points_earned: i64,
    pub progress: ProgressAggregate,
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub reference: String,
    pub attempt: String,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    #[serde(flatten)]
    pub result: ComparisonResult,
    pub percentage: f64,
}

async fn generate_sentence(
    State(state): State<ApiState>,
    Query(query): Query<SentenceQuery>,
) -> Result<Json<SentenceResponse>, ApiError> {
    let reply = state
        .gemini()?
        .generate_text(&prompts::listening_sentence(query.difficulty))
        .await?;

    let sentence = parse::clean_sentence(&reply)
        .ok_or_else(|| ApiError::Upstream("AI returned an empty sentence".to_string()))?;

    Ok(Json(SentenceResponse {
        sentence,
        difficulty: query.difficulty,
    }))
}

/// Score a dictation attempt and fold the result into progress.
async fn check_dictation(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
    Json(payload): Json<CheckRequest>,
) -> Result<Json<CheckResponse>, ApiError> {
    payload.validate()?;
    require_learner(&state.pool, learner_id).await?;

    let result = state.scorer.score(&payload.sentence, &payload.answer);
    record_score("dictation", result.tier);

    let analysis = if result.tier < FeedbackTier::Perfect {
        analyze_mistakes(&state, &payload.sentence, &payload.answer).await
    } else {
        None
    };

    let delta = state.points.dictation(&result);

    let mut tx = state.pool.begin().await?;
    exercise::record_listening_attempt(
        &mut *tx,
        &NewListeningAttempt {
            learner_id,
            sentence: payload.sentence.clone(),
            user_answer: payload.answer.clone(),
            ratio: result.ratio,
            is_correct: result.correct,
            tier: result.tier.as_str().to_string(),
            difficulty: payload.difficulty.as_str().to_string(),
        },
    )
    .await?;
    let progress = apply_delta_in(&mut tx, learner_id, &delta).await?;
    tx.commit().await?;
    record_progress_delta("dictation", &delta);

    tracing::debug!(
        %learner_id,
        ratio = result.ratio,
        tier = %result.tier,
        "Dictation checked"
    );

    Ok(Json(CheckResponse {
        percentage: result.percentage(),
        feedback: feedback_message(result.tier),
        analysis,
        points_earned: delta.points,
        progress,
        result,
    }))
}

/// Optional: failures are logged and the analysis omitted.
async fn analyze_mistakes(state: &ApiState, sentence: &str, answer: &str) -> Option<String> {
    let gemini = state.gemini.as_ref()?;

    match gemini
        .generate_text(&prompts::dictation_analysis(sentence, answer))
        .await
    {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(error = %e, "Dictation analysis failed, omitting it");
            None
        }
    }
}

/// Pure comparison, no learner and no persistence.
async fn compare(
    State(state): State<ApiState>,
    Json(payload): Json<CompareRequest>,
) -> Json<CompareResponse> {
    let result = state.scorer.score(&payload.reference, &payload.attempt);
    record_score("compare", result.tier);

    Json(CompareResponse {
        percentage: result.percentage(),
        result,
    })
}
