//! Quiz and matching-game builders.
//!
//! Builders take the random source as an argument so callers decide between
//! `rand::thread_rng()` in production and a seeded `StdRng` in tests.

use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::TextNormalizer;

/// Smallest vocabulary a learner needs before quizzes or games can be built
/// from it: one correct answer plus three distractors.
pub const MIN_VOCABULARY: usize = 4;

const DISTRACTORS_PER_QUESTION: usize = 3;

/// Why a quiz or game could not be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExerciseError {
    /// The learner has too few words saved
    #[error("At least {required} vocabulary items are needed, found {available}")]
    NotEnoughVocabulary { required: usize, available: usize },
    /// Malformed input, such as an empty generated quiz
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// A vocabulary item as seen by the exercise builders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub id: i64,
    pub word: String,
    pub meaning: String,
    pub phonetic: Option<String>,
    pub example: Option<String>,
}

/// Identifier of a question or matching pair: a stored vocabulary id, or a
/// synthetic id for AI-generated content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Vocabulary(i64),
    Generated(String),
}

impl ItemId {
    pub fn generated(topic: &str, index: usize) -> Self {
        ItemId::Generated(format!("ai_{topic}_{index}"))
    }

    pub const fn vocabulary_id(&self) -> Option<i64> {
        match self {
            ItemId::Vocabulary(id) => Some(*id),
            ItemId::Generated(_) => None,
        }
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemId::Vocabulary(id) => write!(f, "{id}"),
            ItemId::Generated(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub text: String,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub id: ItemId,
    pub word: String,
    pub options: Vec<QuizOption>,
    pub phonetic: Option<String>,
    pub example: Option<String>,
}

impl QuizQuestion {
    pub fn correct_answer(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.is_correct)
            .map(|o| o.text.as_str())
    }
}

/// Quiz item as produced by the AI for a topic quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuizItem {
    pub word: String,
    pub correct_answer: String,
    #[serde(default)]
    pub wrong_answers: Vec<String>,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingPair {
    pub match_id: ItemId,
    pub word: String,
    pub meaning: String,
}

impl From<&VocabularyEntry> for MatchingPair {
    fn from(entry: &VocabularyEntry) -> Self {
        Self {
            match_id: ItemId::Vocabulary(entry.id),
            word: entry.word.clone(),
            meaning: entry.meaning.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    Word,
    Meaning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingCard {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: CardKind,
    pub text: String,
    pub match_id: ItemId,
}

/// Pick `min(count, len)` distinct entries at random.
///
/// Fails when the vocabulary holds fewer than [`MIN_VOCABULARY`] items or
/// `count` is zero.
pub fn sample_vocabulary<'a, R: Rng + ?Sized>(
    vocabulary: &'a [VocabularyEntry],
    count: usize,
    rng: &mut R,
) -> Result<Vec<&'a VocabularyEntry>, ExerciseError> {
    if vocabulary.len() < MIN_VOCABULARY {
        return Err(ExerciseError::NotEnoughVocabulary {
            required: MIN_VOCABULARY,
            available: vocabulary.len(),
        });
    }
    if count == 0 {
        return Err(ExerciseError::InvalidArgument(
            "count must be at least 1".to_string(),
        ));
    }

    Ok(vocabulary
        .choose_multiple(rng, count.min(vocabulary.len()))
        .collect())
}

/// Build a multiple-choice quiz from the learner's own vocabulary.
///
/// Each question shows a word; the options are its meaning plus up to three
/// meanings of other items, shuffled. Distractors that read the same as the
/// correct meaning are skipped.
pub fn build_quiz<R: Rng + ?Sized>(
    vocabulary: &[VocabularyEntry],
    count: usize,
    rng: &mut R,
) -> Result<Vec<QuizQuestion>, ExerciseError> {
    let selected = sample_vocabulary(vocabulary, count, rng)?;
    let folding = TextNormalizer::folding();

    let questions = selected
        .into_iter()
        .map(|entry| {
            let correct_key = folding.normalize(&entry.meaning);
            let candidates: Vec<&VocabularyEntry> = vocabulary
                .iter()
                .filter(|other| other.id != entry.id)
                .filter(|other| folding.normalize(&other.meaning) != correct_key)
                .collect();

            let distractors = candidates
                .choose_multiple(rng, DISTRACTORS_PER_QUESTION.min(candidates.len()))
                .map(|other| other.meaning.clone());

            let mut options = assemble_options(&entry.meaning, distractors, &folding);
            options.shuffle(rng);

            QuizQuestion {
                id: ItemId::Vocabulary(entry.id),
                word: entry.word.clone(),
                options,
                phonetic: entry.phonetic.clone(),
                example: entry.example.clone(),
            }
        })
        .collect();

    Ok(questions)
}

/// Turn AI-generated items into quiz questions with ids `ai_{topic}_{index}`.
///
/// Items with a blank word or answer are dropped; at most three wrong answers
/// are kept per item.
pub fn quiz_from_generated<R: Rng + ?Sized>(
    topic: &str,
    items: Vec<GeneratedQuizItem>,
    rng: &mut R,
) -> Result<Vec<QuizQuestion>, ExerciseError> {
    let folding = TextNormalizer::folding();

    let questions: Vec<QuizQuestion> = items
        .into_iter()
        .filter(|item| !item.word.trim().is_empty() && !item.correct_answer.trim().is_empty())
        .enumerate()
        .map(|(index, item)| {
            let distractors = item
                .wrong_answers
                .into_iter()
                .filter(|w| !w.trim().is_empty())
                .take(DISTRACTORS_PER_QUESTION);

            let mut options = assemble_options(&item.correct_answer, distractors, &folding);
            options.shuffle(rng);

            QuizQuestion {
                id: ItemId::generated(topic, index),
                word: item.word,
                options,
                phonetic: item.phonetic,
                example: item.example,
            }
        })
        .collect();

    if questions.is_empty() {
        return Err(ExerciseError::InvalidArgument(
            "generated quiz contained no usable items".to_string(),
        ));
    }

    Ok(questions)
}

/// Correct option first, then distinct distractors.
fn assemble_options(
    correct: &str,
    distractors: impl IntoIterator<Item = String>,
    folding: &TextNormalizer,
) -> Vec<QuizOption> {
    let mut seen = HashSet::from([folding.normalize(correct)]);
    let mut options = vec![QuizOption {
        text: correct.to_string(),
        is_correct: true,
    }];

    for text in distractors {
        if seen.insert(folding.normalize(&text)) {
            options.push(QuizOption {
                text,
                is_correct: false,
            });
        }
    }

    options
}

/// Two cards per pair (word and meaning) sharing the pair's `match_id`,
/// shuffled together.
pub fn build_matching_cards<R: Rng + ?Sized>(
    pairs: &[MatchingPair],
    rng: &mut R,
) -> Vec<MatchingCard> {
    let mut cards: Vec<MatchingCard> = pairs
        .iter()
        .flat_map(|pair| {
            [
                MatchingCard {
                    id: format!("word_{}", pair.match_id),
                    kind: CardKind::Word,
                    text: pair.word.clone(),
                    match_id: pair.match_id.clone(),
                },
                MatchingCard {
                    id: format!("meaning_{}", pair.match_id),
                    kind: CardKind::Meaning,
                    text: pair.meaning.clone(),
                    match_id: pair.match_id.clone(),
                },
            ]
        })
        .collect();

    cards.shuffle(rng);
    cards
}

/// Integer percentage of correct answers, rounded down. Zero when `total` is
/// zero; `correct` is capped at `total`.
pub fn quiz_score(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total);
    u32::try_from(correct * 100 / total).unwrap_or(100)
}
