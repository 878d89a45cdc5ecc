use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use parla_core::ProgressAggregate;
use parla_db::{
    apply_delta_in,
    models::{LearnerVocabulary, NewVocabularyItem, VocabularyItem},
    repositories::vocabulary,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::enrich::{EnrichedWord, enrich};
use crate::{
    ApiState, error::ApiError, learner::require_learner, metrics::record_progress_delta,
    validation::not_blank,
};

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/learners/{learner_id}/vocabulary",
            get(list_vocabulary).post(add_vocabulary),
        )
        .route(
            "/learners/{learner_id}/vocabulary/{vocabulary_id}",
            delete(remove_vocabulary),
        )
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddVocabularyRequest {
    #[validate(
        length(min = 1, max = 100, message = "must be between 1 and 100 characters"),
        custom(function = "not_blank")
    )]
    pub word: String,
    #[validate(
        length(min = 1, max = 255, message = "must be between 1 and 255 characters"),
        custom(function = "not_blank")
    )]
    pub meaning: String,
}

#[derive(Debug, Serialize)]
pub struct AddVocabularyResponse {
    pub item: VocabularyItem,
    /// False when the learner already had the word (its review count grows)
    pub newly_added: bool,
    pub corrected_from_word: Option<String>,
    pub corrected_from_meaning: Option<String>,
    pub progress: ProgressAggregate,
}

async fn list_vocabulary(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
) -> Result<Json<Vec<LearnerVocabulary>>, ApiError> {
    require_learner(&state.pool, learner_id).await?;
    let words = vocabulary::list_for_learner(&state.pool, learner_id, None).await?;

    Ok(Json(words))
}

/// Add a word at the learner's level. The AI reviews spelling and meaning
/// when configured; otherwise the learner's input is stored as given.
async fn add_vocabulary(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
    Json(payload): Json<AddVocabularyRequest>,
) -> Result<(StatusCode, Json<AddVocabularyResponse>), ApiError> {
    payload.validate()?;
    let learner = require_learner(&state.pool, learner_id).await?;

    let word = payload.word.trim().to_lowercase();
    let meaning = payload.meaning.trim();
    let enriched = enrich(state.gemini.as_ref(), &word, meaning).await;

    let new_item = to_new_item(&enriched, learner.proficiency().as_str());

    let mut tx = state.pool.begin().await?;
    let vocabulary_id = vocabulary::upsert_item(&mut *tx, &new_item).await?;
    let newly_added = vocabulary::link_learner(&mut *tx, learner_id, vocabulary_id).await?;
    let item = vocabulary::find_by_id(&mut *tx, vocabulary_id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("Vocabulary {vocabulary_id} vanished")))?;

    let mut delta = parla_core::ProgressDelta::default();
    if newly_added {
        delta = delta.combine(state.points.new_word());
    }
    if enriched.was_corrected() {
        delta = delta.combine(state.points.correction());
    }

    // A zero delta still returns the current counters
    let progress = apply_delta_in(&mut tx, learner_id, &delta).await?;
    tx.commit().await?;
    if !delta.is_zero() {
        record_progress_delta("vocabulary", &delta);
    }

    tracing::info!(
        %learner_id,
        vocabulary_id,
        newly_added,
        corrected = enriched.was_corrected(),
        "Vocabulary added"
    );

    let status = if newly_added {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(AddVocabularyResponse {
            item,
            newly_added,
            corrected_from_word: enriched.corrected_from_word,
            corrected_from_meaning: enriched.corrected_from_meaning,
            progress,
        }),
    ))
}

fn to_new_item(word: &EnrichedWord, level: &str) -> NewVocabularyItem {
    NewVocabularyItem {
        word: word.word.clone(),
        phonetic: word.phonetic.clone(),
        meaning_native: word.meaning.clone(),
        meaning_target: word.meaning_target.clone(),
        example: word.example.clone(),
        topic: word.topic.clone(),
        level: level.to_string(),
    }
}

/// Remove the word from the learner's list. The shared catalog entry stays.
async fn remove_vocabulary(
    State(state): State<ApiState>,
    Path((learner_id, vocabulary_id)): Path<(Uuid, i64)>,
) -> Result<StatusCode, ApiError> {
    if !vocabulary::unlink(&state.pool, learner_id, vocabulary_id).await? {
        return Err(ApiError::NotFound(format!(
            "Vocabulary {vocabulary_id} is not in this learner's list"
        )));
    }

    tracing::info!(%learner_id, vocabulary_id, "Vocabulary removed");
    Ok(StatusCode::NO_CONTENT)
}
