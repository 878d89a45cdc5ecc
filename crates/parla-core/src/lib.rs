//! Core learning logic for Parla
//!
//! This crate holds everything that does not touch the network or the
//! database: answer normalization and similarity scoring for dictation and
//! quizzes, per-learner progress accumulation, proficiency levels, text
//! heuristics, and the quiz / matching-game builders.

pub mod analysis;
pub mod exercise;
pub mod level;
pub mod normalize;
pub mod points;
pub mod progress;
pub mod similarity;

pub use analysis::{ComplexityBand, GrammarIssue, TextAnalysis, analyze, extract_vocabulary};
pub use exercise::{ExerciseError, ItemId, MIN_VOCABULARY, VocabularyEntry};
pub use level::{ParseLevelError, ProficiencyLevel};
pub use normalize::{TextNormalizer, normalize};
pub use points::PointsPolicy;
pub use progress::{
    InMemoryProgressStore, ProgressAggregate, ProgressDelta, ProgressError, ProgressStore,
    ProgressTracker,
};
pub use similarity::{
    ComparisonResult, FeedbackTier, ScoringConfig, ScoringConfigError, SimilarityScorer, score,
};
