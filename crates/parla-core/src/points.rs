//! Mapping from learning events to progress deltas.

use serde::{Deserialize, Serialize};

use crate::{
    progress::ProgressDelta,
    similarity::{ComparisonResult, FeedbackTier},
};

/// Points awarded per event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointsPolicy {
    pub chat_points: i64,
    pub perfect_points: i64,
    pub very_good_points: i64,
    pub good_points: i64,
    pub needs_improvement_points: i64,
    pub retry_points: i64,
}

impl Default for PointsPolicy {
    fn default() -> Self {
        Self {
            chat_points: 5,
            perfect_points: 10,
            very_good_points: 8,
            good_points: 5,
            needs_improvement_points: 2,
            retry_points: 0,
        }
    }
}

impl PointsPolicy {
    pub const fn tier_points(&self, tier: FeedbackTier) -> i64 {
        match tier {
            FeedbackTier::Perfect => self.perfect_points,
            FeedbackTier::VeryGood => self.very_good_points,
            FeedbackTier::Good => self.good_points,
            FeedbackTier::NeedsImprovement => self.needs_improvement_points,
            FeedbackTier::Retry => self.retry_points,
        }
    }

    /// One chat turn with the tutor.
    pub fn chat_turn(&self) -> ProgressDelta {
        ProgressDelta::default()
            .conversations(1)
            .points(self.chat_points)
    }

    /// One scored dictation attempt.
    pub fn dictation(&self, result: &ComparisonResult) -> ProgressDelta {
        ProgressDelta::default()
            .practice(1)
            .points(self.tier_points(result.tier))
    }

    /// A submitted quiz with `correct` right answers.
    pub fn quiz(&self, correct: usize) -> ProgressDelta {
        ProgressDelta::default()
            .practice(1)
            .points(i64::try_from(correct).unwrap_or(i64::MAX))
    }

    /// A finished matching game.
    pub fn matching_game(&self, correct: usize) -> ProgressDelta {
        self.quiz(correct)
    }

    /// A word newly added to the learner's list.
    pub fn new_word(&self) -> ProgressDelta {
        ProgressDelta::default().vocabulary(1)
    }

    /// A correction made on the learner's behalf, either by the AI or a
    /// detected grammar issue.
    pub fn correction(&self) -> ProgressDelta {
        ProgressDelta::default().corrections(1)
    }
}
