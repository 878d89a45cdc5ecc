use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use parla_core::{
    ItemId, ProgressAggregate, VocabularyEntry,
    exercise::{self, MatchingCard, MatchingPair},
};
use parla_db::{
    apply_delta_in,
    models::{GameScore, NewGameScore},
    repositories::{exercise as exercise_repo, vocabulary},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    ApiState,
    error::ApiError,
    gemini::{GeneratedWord, prompts},
    learner::require_learner,
    metrics::record_progress_delta,
    validation::{self, MY_VOCABULARY, not_blank},
};

const DEFAULT_PAIRS: usize = 6;
const MAX_PAIRS: usize = 12;
const DEFAULT_GAME_TYPE: &str = "matching";

pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/learners/{learner_id}/game", get(get_game))
        .route("/learners/{learner_id}/game/scores", post(submit_score))
        .route("/learners/{learner_id}/game/leaderboard", get(leaderboard))
}

#[derive(Debug, Deserialize)]
pub struct GameQuery {
    pub count: Option<usize>,
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GameResponse {
    pub topic: String,
    pub pairs: usize,
    pub cards: Vec<MatchingCard>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct GameScoreRequest {
    #[serde(default = "default_game_type")]
    #[validate(
        length(min = 1, max = 50, message = "must be between 1 and 50 characters"),
        custom(function = "not_blank")
    )]
    pub game_type: String,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub score: i32,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub correct_answers: i32,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub total_questions: i32,
    /// Seconds
    #[serde(default)]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub time_taken: i32,
}

fn default_game_type() -> String {
    DEFAULT_GAME_TYPE.to_string()
}

#[derive(Debug, Serialize)]
pub struct GameScoreResponse {
    pub id: i64,
    pub progress: ProgressAggregate,
}

#[derive(Debug, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default = "default_game_type")]
    pub game_type: String,
}

/// Shuffled word and meaning cards for the matching game.
async fn get_game(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
    Query(query): Query<GameQuery>,
) -> Result<Json<GameResponse>, ApiError> {
    let count = validation::clamp_count(query.count, DEFAULT_PAIRS, 1, MAX_PAIRS);
    let topic = query.topic.unwrap_or_else(|| MY_VOCABULARY.to_string());
    validation::validate_topic(&topic)?;

    require_learner(&state.pool, learner_id).await?;

    let pairs: Vec<MatchingPair> = if topic == MY_VOCABULARY {
        let entries: Vec<VocabularyEntry> =
            vocabulary::list_for_learner(&state.pool, learner_id, None)
                .await?
                .iter()
                .map(|lv| VocabularyEntry::from(&lv.item))
                .collect();

        exercise::sample_vocabulary(&entries, count, &mut rand::thread_rng())?
            .into_iter()
            .map(MatchingPair::from)
            .collect()
    } else {
        let words: Vec<GeneratedWord> = state
            .gemini()?
            .generate_json(&prompts::topic_matching_words(&topic, count))
            .await?;

        generated_pairs(&topic, words, count)?
    };

    let cards = exercise::build_matching_cards(&pairs, &mut rand::thread_rng());

    Ok(Json(GameResponse {
        topic,
        pairs: pairs.len(),
        cards,
    }))
}

fn generated_pairs(
    topic: &str,
    words: Vec<GeneratedWord>,
    count: usize,
) -> Result<Vec<MatchingPair>, ApiError> {
    let pairs: Vec<MatchingPair> = words
        .into_iter()
        .filter(|w| !w.word.trim().is_empty() && !w.meaning.trim().is_empty())
        .take(count)
        .enumerate()
        .map(|(index, w)| MatchingPair {
            match_id: ItemId::generated(topic, index),
            word: w.word.trim().to_string(),
            meaning: w.meaning.trim().to_string(),
        })
        .collect();

    if pairs.is_empty() {
        return Err(ApiError::Upstream(
            "AI returned no usable word pairs".to_string(),
        ));
    }

    Ok(pairs)
}

async fn submit_score(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
    Json(payload): Json<GameScoreRequest>,
) -> Result<(StatusCode, Json<GameScoreResponse>), ApiError> {
    payload.validate()?;
    if payload.correct_answers > payload.total_questions {
        return Err(ApiError::Validation(
            "correct_answers cannot exceed total_questions".to_string(),
        ));
    }
    require_learner(&state.pool, learner_id).await?;

    let correct = usize::try_from(payload.correct_answers).unwrap_or_default();
    let delta = state.points.matching_game(correct);

    let mut tx = state.pool.begin().await?;
    let id = exercise_repo::record_game_score(
        &mut *tx,
        &NewGameScore {
            learner_id,
            game_type: payload.game_type.trim().to_string(),
            score: payload.score,
            correct_answers: payload.correct_answers,
            total_questions: payload.total_questions,
            time_taken: payload.time_taken,
        },
    )
    .await?;
    let progress = apply_delta_in(&mut tx, learner_id, &delta).await?;
    tx.commit().await?;
    record_progress_delta("game", &delta);

    Ok((StatusCode::CREATED, Json(GameScoreResponse { id, progress })))
}

/// The learner's ten best runs for a game type.
async fn leaderboard(
    State(state): State<ApiState>,
    Path(learner_id): Path<Uuid>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<GameScore>>, ApiError> {
    require_learner(&state.pool, learner_id).await?;
    let scores = exercise_repo::leaderboard(&state.pool, learner_id, query.game_type.trim()).await?;

    Ok(Json(scores))
}
