use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use parla_core::{ProgressAggregate, TextAnalysis, analyze};
use parla_db::{apply_delta_in, models::ChatMessage, repositories::chat};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    ApiState,
    error::ApiError,
    gemini::{ChatMode, prompts},
    learner::require_learner,
    metrics::record_progress_delta,
    validation::{self, not_blank},
};

const DEFAULT_HISTORY_LIMIT: usize = 50;
const MAX_HISTORY_LIMIT: usize = 200;

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/learners/{learner_id}/chat", post(send_message))
        .route("/learners/{learner_id}/chat/history", get(history))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(
        length(min = 1, max = 2000, message = "must be between 1 and 2000 characters"),
        custom(function = "not_blank")
    )]
    pub message: String,
    #[serde(default)]
    pub mode: ChatMode,
    /// Overrides the learner's stored level for this turn
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message_id: i64,
    pub reply: String,
    pub mode: ChatMode,
    pub analysis: TextAnalysis,
    /// Readable message per entry of `analysis.grammar_issues`
    pub grammar_feedback: Vec<&'static str>,
    pub progress: ProgressAggregate,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// One tutor turn: AI reply, stored history, chat points, plus a correction
/// when the local heuristics flag the learner's message.
async fn send_message(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    payload.validate()?;

    let learner = require_learner(&state.pool, learner_id).await?;
    let level = match payload.level.as_deref() {
        Some(level) => validation::parse_level(level)?,
        None => learner.proficiency(),
    };
    let message = payload.message.trim();

    let gemini = state.gemini()?;
    let reply = gemini
        .generate_text(&prompts::chat(payload.mode, level, message))
        .await?;

    let analysis = analyze(message);

    let mut delta = state.points.chat_turn();
    if !analysis.grammar_issues.is_empty() {
        delta = delta.combine(state.points.correction());
    }

    let mut tx = state.pool.begin().await?;
    let saved = chat::save_message(
        &mut *tx,
        learner_id,
        message,
        &reply,
        payload.mode.as_str(),
        level.as_str(),
    )
    .await?;
    let progress = apply_delta_in(&mut tx, learner_id, &delta).await?;
    tx.commit().await?;
    record_progress_delta("chat", &delta);

    tracing::debug!(
        %learner_id,
        mode = %payload.mode,
        %level,
        grammar_issues = analysis.grammar_issues.len(),
        "Chat turn completed"
    );

    let grammar_feedback = analysis
        .grammar_issues
        .iter()
        .map(|issue| issue.message())
        .collect();

    Ok(Json(ChatResponse {
        message_id: saved.id,
        reply,
        mode: payload.mode,
        analysis,
        grammar_feedback,
        progress,
    }))
}

/// Most recent turns first
async fn history(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    require_learner(&state.pool, learner_id).await?;

    let limit = validation::clamp_count(query.limit, DEFAULT_HISTORY_LIMIT, 1, MAX_HISTORY_LIMIT);
    let messages = chat::history(&state.pool, learner_id, limit as i64).await?;

    Ok(Json(messages))
}
