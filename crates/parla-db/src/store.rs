//! PostgreSQL-backed [`ProgressStore`].

use parla_core::{ProgressAggregate, ProgressDelta, ProgressError, ProgressStore};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::repositories::{learner, progress};

/// Progress store over the `learner_progress` table.
///
/// Increments go through a single upsert, so the row lock serializes
/// concurrent deltas for one learner.
#[derive(Debug, Clone)]
pub struct PgProgressStore {
    pool: PgPool,
}

impl PgProgressStore {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ProgressStore for PgProgressStore {
    type Error = sqlx::Error;

    async fn learner_exists(&self, learner_id: Uuid) -> Result<bool, Self::Error> {
        learner::exists(&self.pool, learner_id).await
    }

    async fn get(&self, learner_id: Uuid) -> Result<Option<ProgressAggregate>, Self::Error> {
        let row = progress::get(&self.pool, learner_id).await?;
        Ok(row.map(ProgressAggregate::from))
    }

    async fn increment(
        &self,
        learner_id: Uuid,
        delta: &ProgressDelta,
    ) -> Result<ProgressAggregate, Self::Error> {
        let row = progress::increment(&self.pool, learner_id, delta).await?;
        Ok(row.into())
    }
}

/// Validate `delta` and add it on an open connection.
///
/// Routes call this inside the transaction that stores the activity being
/// counted, so the record and its progress commit or roll back together.
/// The caller has already checked that the learner exists.
pub async fn apply_delta_in(
    conn: &mut PgConnection,
    learner_id: Uuid,
    delta: &ProgressDelta,
) -> Result<ProgressAggregate, ProgressError> {
    delta.validate()?;

    let row = progress::increment(conn, learner_id, delta)
        .await
        .map_err(|e| ProgressError::Store(Box::new(e)))?;

    tracing::debug!(
        %learner_id,
        points = delta.points,
        "Applied progress delta in transaction"
    );

    Ok(row.into())
}
