use parla_core::ProgressDelta;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::ProgressRow;

/// Insert a zeroed progress row if the learner has none yet.
pub async fn create_if_missing<'e, E>(executor: E, learner_id: Uuid) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO learner_progress (learner_id)
            VALUES ($1)
            ON CONFLICT (learner_id) DO NOTHING
        "#,
    )
    .bind(learner_id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn get<'e, E>(executor: E, learner_id: Uuid) -> Result<Option<ProgressRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT conversations, vocabulary, corrections, practice, points
            FROM learner_progress
            WHERE learner_id = $1
        "#,
    )
    .bind(learner_id)
    .fetch_optional(executor)
    .await
}

/// Atomically add `delta` to the learner's counters.
///
/// A single upsert, so concurrent increments for the same learner serialize
/// on the row lock and none are lost.
pub async fn increment<'e, E>(
    executor: E,
    learner_id: Uuid,
    delta: &ProgressDelta,
) -> Result<ProgressRow, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO learner_progress (learner_id, conversations, vocabulary, corrections, practice, points)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (learner_id) DO UPDATE SET
                conversations = learner_progress.conversations + EXCLUDED.conversations,
                vocabulary = learner_progress.vocabulary + EXCLUDED.vocabulary,
                corrections = learner_progress.corrections + EXCLUDED.corrections,
                practice = learner_progress.practice + EXCLUDED.practice,
                points = learner_progress.points + EXCLUDED.points,
                updated_at = NOW()
            RETURNING conversations, vocabulary, corrections, practice, points
        "#,
    )
    .bind(learner_id)
    .bind(delta.conversations)
    .bind(delta.vocabulary)
    .bind(delta.corrections)
    .bind(delta.practice)
    .bind(delta.points)
    .fetch_one(executor)
    .await
}
