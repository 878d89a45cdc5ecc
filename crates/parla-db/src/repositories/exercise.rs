use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{GameScore, NewGameScore, NewListeningAttempt, NewQuizAnswer};

/// Leaderboard size.
pub const LEADERBOARD_LIMIT: i64 = 10;

pub async fn record_listening_attempt<'e, E>(
    executor: E,
    attempt: &NewListeningAttempt,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            INSERT INTO listening_attempts
                (learner_id, sentence, user_answer, ratio, is_correct, tier, difficulty)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
        "#,
    )
    .bind(attempt.learner_id)
    .bind(&attempt.sentence)
    .bind(&attempt.user_answer)
    .bind(attempt.ratio)
    .bind(attempt.is_correct)
    .bind(&attempt.tier)
    .bind(&attempt.difficulty)
    .fetch_one(executor)
    .await
}

pub async fn record_quiz_answer<'e, E>(executor: E, answer: &NewQuizAnswer) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO quiz_answers
                (learner_id, vocabulary_id, question_type, user_answer, is_correct, time_taken)
            VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(answer.learner_id)
    .bind(answer.vocabulary_id)
    .bind(&answer.question_type)
    .bind(&answer.user_answer)
    .bind(answer.is_correct)
    .bind(answer.time_taken)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn record_game_score<'e, E>(executor: E, score: &NewGameScore) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            INSERT INTO game_scores
                (learner_id, game_type, score, correct_answers, total_questions, time_taken)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
        "#,
    )
    .bind(score.learner_id)
    .bind(&score.game_type)
    .bind(score.score)
    .bind(score.correct_answers)
    .bind(score.total_questions)
    .bind(score.time_taken)
    .fetch_one(executor)
    .await
}

/// The learner's best runs for a game type: highest score first, then the
/// faster run.
pub async fn leaderboard<'e, E>(
    executor: E,
    learner_id: Uuid,
    game_type: &str,
) -> Result<Vec<GameScore>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, game_type, score, correct_answers, total_questions, time_taken, created_at
            FROM game_scores
            WHERE learner_id = $1 AND game_type = $2
            ORDER BY score DESC, time_taken ASC, created_at ASC
            LIMIT $3
        "#,
    )
    .bind(learner_id)
    .bind(game_type)
    .bind(LEADERBOARD_LIMIT)
    .fetch_all(executor)
    .await
}
