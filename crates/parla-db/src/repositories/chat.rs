use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::ChatMessage;

pub async fn save_message<'e, E>(
    executor: E,
    learner_id: Uuid,
    user_message: &str,
    bot_response: &str,
    mode: &str,
    level: &str,
) -> Result<ChatMessage, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO chat_messages (learner_id, user_message, bot_response, mode, level)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, learner_id, user_message, bot_response, mode, level, created_at
        "#,
    )
    .bind(learner_id)
    .bind(user_message)
    .bind(bot_response)
    .bind(mode)
    .bind(level)
    .fetch_one(executor)
    .await
}

/// Most recent messages first.
pub async fn history<'e, E>(
    executor: E,
    learner_id: Uuid,
    limit: i64,
) -> Result<Vec<ChatMessage>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, learner_id, user_message, bot_response, mode, level, created_at
            FROM chat_messages
            WHERE learner_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
        "#,
    )
    .bind(learner_id)
    .bind(limit)
    .fetch_all(executor)
    .await
}
