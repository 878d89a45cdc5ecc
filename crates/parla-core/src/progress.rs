//! Per-learner progress counters.
//!
//! Every learning event becomes a [`ProgressDelta`] folded into the learner's
//! [`ProgressAggregate`]. Deltas are additive and non-negative, so concurrent
//! events for the same learner commute: the final aggregate is the sum of all
//! deltas regardless of the order they land in.

use std::{
    collections::HashMap,
    future::Future,
    sync::{Mutex, PoisonError},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Accumulated counters for one learner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressAggregate {
    pub conversations: i64,
    pub vocabulary: i64,
    pub corrections: i64,
    pub practice: i64,
    pub points: i64,
}

impl ProgressAggregate {
    /// Add a delta, saturating at `i64::MAX`.
    pub fn merged(self, delta: &ProgressDelta) -> Self {
        Self {
            conversations: self.conversations.saturating_add(delta.conversations),
            vocabulary: self.vocabulary.saturating_add(delta.vocabulary),
            corrections: self.corrections.saturating_add(delta.corrections),
            practice: self.practice.saturating_add(delta.practice),
            points: self.points.saturating_add(delta.points),
        }
    }
}

/// Increment applied by one learning event. Missing fields default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressDelta {
    pub conversations: i64,
    pub vocabulary: i64,
    pub corrections: i64,
    pub practice: i64,
    pub points: i64,
}

impl ProgressDelta {
    /// Set the conversation count.
    pub const fn conversations(mut self, n: i64) -> Self {
        self.conversations = n;
        self
    }

    /// Set the vocabulary count.
    pub const fn vocabulary(mut self, n: i64) -> Self {
        self.vocabulary = n;
        self
    }

    /// Set the correction count.
    pub const fn corrections(mut self, n: i64) -> Self {
        self.corrections = n;
        self
    }

    /// Set the practice count.
    pub const fn practice(mut self, n: i64) -> Self {
        self.practice = n;
        self
    }

    /// Set the points earned.
    pub const fn points(mut self, n: i64) -> Self {
        self.points = n;
        self
    }

    /// Field-wise sum of two deltas.
    pub fn combine(self, other: Self) -> Self {
        Self {
            conversations: self.conversations.saturating_add(other.conversations),
            vocabulary: self.vocabulary.saturating_add(other.vocabulary),
            corrections: self.corrections.saturating_add(other.corrections),
            practice: self.practice.saturating_add(other.practice),
            points: self.points.saturating_add(other.points),
        }
    }

    /// Whether every field is zero.
    pub const fn is_zero(&self) -> bool {
        self.conversations == 0
            && self.vocabulary == 0
            && self.corrections == 0
            && self.practice == 0
            && self.points == 0
    }

    /// Reject any negative field.
    pub fn validate(&self) -> Result<(), ProgressError> {
        let fields = [
            ("conversations", self.conversations),
            ("vocabulary", self.vocabulary),
            ("corrections", self.corrections),
            ("practice", self.practice),
            ("points", self.points),
        ];
        match fields.iter().find(|(_, value)| *value < 0) {
            Some((field, value)) => Err(ProgressError::InvalidArgument(format!(
                "delta field '{field}' must be non-negative, got {value}"
            ))),
            None => Ok(()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Learner {0} not found")]
    NotFound(Uuid),
    #[error("Progress store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Storage for learner aggregates.
///
/// `increment` must be atomic per learner: two concurrent increments for the
/// same learner must both be reflected in the stored counters.
pub trait ProgressStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn learner_exists(
        &self,
        learner_id: Uuid,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// Stored aggregate, or `None` when the learner has no recorded activity.
    fn get(
        &self,
        learner_id: Uuid,
    ) -> impl Future<Output = Result<Option<ProgressAggregate>, Self::Error>> + Send;

    /// Atomically add `delta` and return the updated aggregate.
    fn increment(
        &self,
        learner_id: Uuid,
        delta: &ProgressDelta,
    ) -> impl Future<Output = Result<ProgressAggregate, Self::Error>> + Send;
}

/// Validating front for a [`ProgressStore`].
#[derive(Debug, Clone)]
pub struct ProgressTracker<S> {
    store: S,
}

impl<S: ProgressStore> ProgressTracker<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Fold `delta` into the learner's aggregate.
    ///
    /// Fails with `InvalidArgument` for negative fields (nothing is written)
    /// and `NotFound` for unknown learners.
    pub async fn apply_delta(
        &self,
        learner_id: Uuid,
        delta: ProgressDelta,
    ) -> Result<ProgressAggregate, ProgressError> {
        delta.validate()?;
        self.ensure_learner(learner_id).await?;

        let aggregate = self
            .store
            .increment(learner_id, &delta)
            .await
            .map_err(|e| ProgressError::Store(Box::new(e)))?;

        tracing::debug!(
            %learner_id,
            conversations = delta.conversations,
            vocabulary = delta.vocabulary,
            corrections = delta.corrections,
            practice = delta.practice,
            points = delta.points,
            "Applied progress delta"
        );

        Ok(aggregate)
    }

    /// Current aggregate; zeros for a learner with no recorded activity.
    pub async fn read(&self, learner_id: Uuid) -> Result<ProgressAggregate, ProgressError> {
        self.ensure_learner(learner_id).await?;

        let aggregate = self
            .store
            .get(learner_id)
            .await
            .map_err(|e| ProgressError::Store(Box::new(e)))?;

        Ok(aggregate.unwrap_or_default())
    }

    async fn ensure_learner(&self, learner_id: Uuid) -> Result<(), ProgressError> {
        let exists = self
            .store
            .learner_exists(learner_id)
            .await
            .map_err(|e| ProgressError::Store(Box::new(e)))?;

        if exists {
            Ok(())
        } else {
            Err(ProgressError::NotFound(learner_id))
        }
    }
}

/// In-process store: a mutex-guarded map keyed by learner.
#[derive(Debug, Default)]
pub struct InMemoryProgressStore {
    inner: Mutex<InMemoryState>,
}

#[derive(Debug, Default)]
struct InMemoryState {
    learners: HashMap<Uuid, Option<ProgressAggregate>>,
}

impl InMemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a learner known to the store, with no recorded activity.
    pub fn register(&self, learner_id: Uuid) {
        self.lock().learners.entry(learner_id).or_insert(None);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, InMemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProgressStore for InMemoryProgressStore {
    type Error = std::convert::Infallible;

    async fn learner_exists(&self, learner_id: Uuid) -> Result<bool, Self::Error> {
        Ok(self.lock().learners.contains_key(&learner_id))
    }

    async fn get(&self, learner_id: Uuid) -> Result<Option<ProgressAggregate>, Self::Error> {
        Ok(self.lock().learners.get(&learner_id).copied().flatten())
    }

    async fn increment(
        &self,
        learner_id: Uuid,
        delta: &ProgressDelta,
    ) -> Result<ProgressAggregate, Self::Error> {
        let mut state = self.lock();
        let slot = state.learners.entry(learner_id).or_insert(None);
        let updated = slot.unwrap_or_default().merged(delta);
        *slot = Some(updated);
        Ok(updated)
    }
}
