use chrono::{DateTime, Utc};
use parla_core::{ProficiencyLevel, ProgressAggregate, VocabularyEntry};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Learner profile
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Learner {
    /// Stable learner identifier
    pub id: Uuid,
    /// Display name (unique, used for get-or-create)
    pub name: String,
    /// CEFR level, one of A1..C2 (enforced by a CHECK constraint)
    pub level: String,
    /// When the learner was first seen
    pub created_at: DateTime<Utc>,
    /// Last get-or-create or level update
    pub last_active_at: DateTime<Utc>,
}

impl Learner {
    /// Parsed level. The column is constrained to valid levels, so a parse
    /// failure only happens on a corrupted row and falls back to A1.
    pub fn proficiency(&self) -> ProficiencyLevel {
        self.level.parse().unwrap_or_default()
    }
}

/// Learner row plus whether this call created it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LearnerUpsert {
    #[sqlx(flatten)]
    pub learner: Learner,
    pub created: bool,
}

/// Progress counters as stored in `learner_progress`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProgressRow {
    pub conversations: i64,
    pub vocabulary: i64,
    pub corrections: i64,
    pub practice: i64,
    pub points: i64,
}

impl From<ProgressRow> for ProgressAggregate {
    fn from(row: ProgressRow) -> Self {
        Self {
            conversations: row.conversations,
            vocabulary: row.vocabulary,
            corrections: row.corrections,
            practice: row.practice,
            points: row.points,
        }
    }
}

/// Vocabulary catalog item, shared between learners
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VocabularyItem {
    pub id: i64,
    pub word: String,
    /// IPA transcription
    pub phonetic: Option<String>,
    /// Meaning in the learner's native language
    pub meaning_native: String,
    /// Meaning in the target language
    pub meaning_target: Option<String>,
    /// Usage example
    pub example: Option<String>,
    pub topic: String,
    pub level: String,
    pub created_at: DateTime<Utc>,
}

impl From<&VocabularyItem> for VocabularyEntry {
    fn from(item: &VocabularyItem) -> Self {
        Self {
            id: item.id,
            word: item.word.clone(),
            meaning: item.meaning_native.clone(),
            phonetic: item.phonetic.clone(),
            example: item.example.clone(),
        }
    }
}

/// Data for inserting or refreshing a catalog item
#[derive(Debug, Clone, Default)]
pub struct NewVocabularyItem {
    pub word: String,
    pub phonetic: Option<String>,
    pub meaning_native: String,
    pub meaning_target: Option<String>,
    pub example: Option<String>,
    pub topic: String,
    pub level: String,
}

/// Catalog item as linked to one learner
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LearnerVocabulary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub item: VocabularyItem,
    pub learned_at: DateTime<Utc>,
    /// Times the learner re-added the word
    pub review_count: i32,
    pub mastery_level: i16,
}

/// One chat turn
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: i64,
    pub learner_id: Uuid,
    pub user_message: String,
    pub bot_response: String,
    pub mode: String,
    pub level: String,
    pub created_at: DateTime<Utc>,
}

/// Scored dictation attempt
#[derive(Debug, Clone)]
pub struct NewListeningAttempt {
    pub learner_id: Uuid,
    pub sentence: String,
    pub user_answer: String,
    pub ratio: f64,
    pub is_correct: bool,
    pub tier: String,
    pub difficulty: String,
}

/// One answered quiz question
#[derive(Debug, Clone)]
pub struct NewQuizAnswer {
    pub learner_id: Uuid,
    /// `None` for AI-generated questions
    pub vocabulary_id: Option<i64>,
    pub question_type: String,
    pub user_answer: String,
    pub is_correct: bool,
    /// Seconds
    pub time_taken: i32,
}

#[derive(Debug, Clone)]
pub struct NewGameScore {
    pub learner_id: Uuid,
    pub game_type: String,
    pub score: i32,
    pub correct_answers: i32,
    pub total_questions: i32,
    pub time_taken: i32,
}

/// Leaderboard row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GameScore {
    pub id: i64,
    pub game_type: String,
    pub score: i32,
    pub correct_answers: i32,
    pub total_questions: i32,
    pub time_taken: i32,
    pub created_at: DateTime<Utc>,
}
