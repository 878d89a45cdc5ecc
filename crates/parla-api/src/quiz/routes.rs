use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use parla_core::{
    ItemId, TextNormalizer, VocabularyEntry,
    exercise::{self, GeneratedQuizItem},
};
use parla_db::{
    apply_delta_in,
    models::NewQuizAnswer,
    repositories::{exercise as exercise_repo, vocabulary},
};
use uuid::Uuid;
use validator::Validate;

use super::model::{
    AnswerResult, QuizAnswer, QuizQuery, QuizResponse, SubmitQuizRequest, SubmitQuizResponse,
};
use crate::{
    ApiState,
    error::ApiError,
    gemini::prompts,
    learner::require_learner,
    metrics::record_progress_delta,
    validation::{self, MY_VOCABULARY},
};

const DEFAULT_QUESTIONS: usize = 10;
const MAX_QUESTIONS: usize = 20;

pub fn routes() -> Router<ApiState> {
    Router::new().route(
        "/learners/{learner_id}/quiz",
        get(get_quiz).post(submit_quiz),
    )
}

/// Multiple-choice questions from the learner's words, or AI-generated for
/// any other topic.
async fn get_quiz(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
    Query(query): Query<QuizQuery>,
) -> Result<Json<QuizResponse>, ApiError> {
    let count = validation::clamp_count(query.count, DEFAULT_QUESTIONS, 1, MAX_QUESTIONS);
    let topic = query.topic.unwrap_or_else(|| MY_VOCABULARY.to_string());
    validation::validate_topic(&topic)?;

    require_learner(&state.pool, learner_id).await?;

    let questions = if topic == MY_VOCABULARY {
        let entries: Vec<VocabularyEntry> =
            vocabulary::list_for_learner(&state.pool, learner_id, None)
                .await?
                .iter()
                .map(|lv| VocabularyEntry::from(&lv.item))
                .collect();

        exercise::build_quiz(&entries, count, &mut rand::thread_rng())?
    } else {
        let items: Vec<GeneratedQuizItem> = state
            .gemini()?
            .generate_json(&prompts::topic_quiz(&topic, count))
            .await?;

        let items = items.into_iter().take(count).collect();
        exercise::quiz_from_generated(&topic, items, &mut rand::thread_rng())
            .map_err(|e| ApiError::Upstream(e.to_string()))?
    };

    Ok(Json(QuizResponse { topic, questions }))
}

/// Grade answers and record them.
///
/// Answers to questions built from stored vocabulary are re-graded against
/// the stored meaning, ignoring case, punctuation and diacritics.
async fn submit_quiz(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<Json<SubmitQuizResponse>, ApiError> {
    payload.validate()?;
    if let Some(topic) = &payload.topic {
        validation::validate_topic(topic)?;
    }
    require_learner(&state.pool, learner_id).await?;

    let question_type = payload
        .topic
        .as_deref()
        .unwrap_or(MY_VOCABULARY)
        .to_string();
    let folding = TextNormalizer::folding();

    let mut tx = state.pool.begin().await?;
    let mut results = Vec::with_capacity(payload.answers.len());

    for answer in &payload.answers {
        let graded = grade(&mut tx, &folding, answer).await?;

        exercise_repo::record_quiz_answer(
            &mut *tx,
            &NewQuizAnswer {
                learner_id,
                vocabulary_id: graded.vocabulary_id,
                question_type: question_type.clone(),
                user_answer: answer.user_answer.clone(),
                is_correct: graded.result.is_correct,
                time_taken: answer.time_taken.max(0),
            },
        )
        .await?;

        results.push(graded.result);
    }

    let total = results.len();
    let correct = results.iter().filter(|r| r.is_correct).count();

    let delta = state.points.quiz(correct);
    let progress = apply_delta_in(&mut tx, learner_id, &delta).await?;
    tx.commit().await?;
    record_progress_delta("quiz", &delta);

    tracing::debug!(%learner_id, correct, total, "Quiz submitted");

    Ok(Json(SubmitQuizResponse {
        correct,
        total,
        score: exercise::quiz_score(correct, total),
        results,
        progress,
    }))
}

struct GradedAnswer {
    result: AnswerResult,
    /// Set only when the referenced item exists
    vocabulary_id: Option<i64>,
}

async fn grade(
    tx: &mut sqlx::PgConnection,
    folding: &TextNormalizer,
    answer: &QuizAnswer,
) -> Result<GradedAnswer, ApiError> {
    let Some(id) = answer.question_id.vocabulary_id() else {
        return Ok(GradedAnswer {
            result: AnswerResult {
                question_id: answer.question_id.clone(),
                is_correct: answer.is_correct,
                correct_answer: None,
            },
            vocabulary_id: None,
        });
    };

    let graded = match vocabulary::find_by_id(&mut *tx, id).await? {
        Some(item) => GradedAnswer {
            result: AnswerResult {
                question_id: ItemId::Vocabulary(id),
                is_correct: meanings_match(folding, &answer.user_answer, &item.meaning_native),
                correct_answer: Some(item.meaning_native),
            },
            vocabulary_id: Some(id),
        },
        None => GradedAnswer {
            result: AnswerResult {
                question_id: ItemId::Vocabulary(id),
                is_correct: false,
                correct_answer: None,
            },
            vocabulary_id: None,
        },
    };

    Ok(graded)
}

fn meanings_match(folding: &TextNormalizer, answer: &str, expected: &str) -> bool {
    let answer = folding.normalize(answer);
    !answer.is_empty() && answer == folding.normalize(expected)
}
