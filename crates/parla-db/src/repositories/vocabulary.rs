use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{LearnerVocabulary, NewVocabularyItem, VocabularyItem};

/// Insert a catalog item, or refresh the details of the existing
/// `(word, level)` item. Returns the item id either way.
pub async fn upsert_item<'e, E>(executor: E, item: &NewVocabularyItem) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            INSERT INTO vocabulary (word, phonetic, meaning_native, meaning_target, example, topic, level)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (word, level) DO UPDATE SET
                phonetic = EXCLUDED.phonetic,
                meaning_native = EXCLUDED.meaning_native,
                meaning_target = EXCLUDED.meaning_target,
                example = EXCLUDED.example,
                updated_at = NOW()
            RETURNING id
        "#,
    )
    .bind(&item.word)
    .bind(&item.phonetic)
    .bind(&item.meaning_native)
    .bind(&item.meaning_target)
    .bind(&item.example)
    .bind(&item.topic)
    .bind(&item.level)
    .fetch_one(executor)
    .await
}

/// Link a catalog item to a learner.
///
/// Returns `true` when the link is new. Linking an already-linked item bumps
/// its `review_count` instead.
pub async fn link_learner<'e, E>(
    executor: E,
    learner_id: Uuid,
    vocabulary_id: i64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            INSERT INTO learner_vocabulary (learner_id, vocabulary_id)
            VALUES ($1, $2)
            ON CONFLICT (learner_id, vocabulary_id) DO UPDATE SET
                review_count = learner_vocabulary.review_count + 1
            RETURNING (xmax = 0) AS inserted
        "#,
    )
    .bind(learner_id)
    .bind(vocabulary_id)
    .fetch_one(executor)
    .await
}

/// The learner's words, most recently learned first. `None` returns all.
pub async fn list_for_learner<'e, E>(
    executor: E,
    learner_id: Uuid,
    limit: Option<i64>,
) -> Result<Vec<LearnerVocabulary>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                v.id, v.word, v.phonetic, v.meaning_native, v.meaning_target,
                v.example, v.topic, v.level, v.created_at,
                lv.learned_at, lv.review_count, lv.mastery_level
            FROM learner_vocabulary lv
            JOIN vocabulary v ON v.id = lv.vocabulary_id
            WHERE lv.learner_id = $1
            ORDER BY lv.learned_at DESC, v.id DESC
            LIMIT $2
        "#,
    )
    .bind(learner_id)
    .bind(limit)
    .fetch_all(executor)
    .await
}

pub async fn find_by_id<'e, E>(
    executor: E,
    vocabulary_id: i64,
) -> Result<Option<VocabularyItem>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, word, phonetic, meaning_native, meaning_target, example, topic, level, created_at
            FROM vocabulary
            WHERE id = $1
        "#,
    )
    .bind(vocabulary_id)
    .fetch_optional(executor)
    .await
}

/// Remove a word from the learner's list. The catalog item stays, since
/// other learners may have it linked. Returns whether a link was removed.
pub async fn unlink<'e, E>(
    executor: E,
    learner_id: Uuid,
    vocabulary_id: i64,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM learner_vocabulary
            WHERE learner_id = $1 AND vocabulary_id = $2
        "#,
    )
    .bind(learner_id)
    .bind(vocabulary_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}
