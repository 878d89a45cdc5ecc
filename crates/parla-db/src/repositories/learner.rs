use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{Learner, LearnerUpsert};

/// Fetch the learner with this name, creating it on first contact.
///
/// `created` is true only for the call that inserted the row. Repeat calls
/// touch `last_active_at`.
pub async fn get_or_create<'e, E>(executor: E, name: &str) -> Result<LearnerUpsert, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO learners (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET last_active_at = NOW()
            RETURNING id, name, level, created_at, last_active_at, (xmax = 0) AS created
        "#,
    )
    .bind(name)
    .fetch_one(executor)
    .await
}

pub async fn find_by_id<'e, E>(executor: E, learner_id: Uuid) -> Result<Option<Learner>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, name, level, created_at, last_active_at
            FROM learners
            WHERE id = $1
        "#,
    )
    .bind(learner_id)
    .fetch_optional(executor)
    .await
}

/// Change the learner's level. Returns the updated row, or `None` if the
/// learner does not exist.
pub async fn update_level<'e, E>(
    executor: E,
    learner_id: Uuid,
    level: &str,
) -> Result<Option<Learner>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE learners
            SET level = $2, last_active_at = NOW()
            WHERE id = $1
            RETURNING id, name, level, created_at, last_active_at
        "#,
    )
    .bind(learner_id)
    .bind(level)
    .fetch_optional(executor)
    .await
}

pub async fn exists<'e, E>(executor: E, learner_id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS(SELECT 1 FROM learners WHERE id = $1)
        "#,
    )
    .bind(learner_id)
    .fetch_one(executor)
    .await
}
