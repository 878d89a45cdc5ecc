//! AI review of words learners add, with a local fallback.

use serde::Serialize;

use crate::gemini::{GeminiClient, VocabularyEnrichment, prompts};

const FALLBACK_TOPIC: &str = "general";

/// A word ready to be stored, after spelling and meaning review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedWord {
    pub word: String,
    pub meaning: String,
    pub meaning_target: Option<String>,
    pub phonetic: Option<String>,
    pub example: Option<String>,
    pub topic: String,
    /// Original spelling, when the AI corrected it
    pub corrected_from_word: Option<String>,
    /// Original meaning, when the AI corrected it
    pub corrected_from_meaning: Option<String>,
}

impl EnrichedWord {
    pub const fn was_corrected(&self) -> bool {
        self.corrected_from_word.is_some() || self.corrected_from_meaning.is_some()
    }

    /// The learner's input unchanged, with a generic example sentence.
    pub fn fallback(word: &str, meaning: &str) -> Self {
        Self {
            word: word.to_string(),
            meaning: meaning.to_string(),
            meaning_target: None,
            phonetic: None,
            example: Some(format!("I use {word} every day.")),
            topic: FALLBACK_TOPIC.to_string(),
            corrected_from_word: None,
            corrected_from_meaning: None,
        }
    }

    /// Apply an AI review to the learner's input.
    ///
    /// A correction counts only when the AI flags the input as wrong and
    /// supplies a non-empty replacement that actually differs.
    pub fn from_review(word: &str, meaning: &str, review: VocabularyEnrichment) -> Self {
        let corrected_word = correction(review.is_spelling_correct, review.corrected_word, word);
        let corrected_meaning =
            correction(review.is_meaning_correct, review.corrected_meaning, meaning);

        Self {
            word: corrected_word.clone().unwrap_or_else(|| word.to_string()),
            meaning: corrected_meaning.clone().unwrap_or_else(|| meaning.to_string()),
            meaning_target: non_empty(review.meaning_target),
            phonetic: non_empty(review.phonetic),
            example: non_empty(review.example)
                .or_else(|| Some(format!("I use {word} every day."))),
            topic: non_empty(review.topic)
                .map(|t| t.to_lowercase())
                .unwrap_or_else(|| FALLBACK_TOPIC.to_string()),
            corrected_from_word: corrected_word.map(|_| word.to_string()),
            corrected_from_meaning: corrected_meaning.map(|_| meaning.to_string()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn correction(is_correct: bool, replacement: Option<String>, original: &str) -> Option<String> {
    if is_correct {
        return None;
    }
    non_empty(replacement).filter(|r| r != original)
}

/// Review `word`/`meaning` with the AI when available; never fails.
pub async fn enrich(gemini: Option<&GeminiClient>, word: &str, meaning: &str) -> EnrichedWord {
    let Some(gemini) = gemini else {
        return EnrichedWord::fallback(word, meaning);
    };

    match gemini
        .generate_json::<VocabularyEnrichment>(&prompts::vocabulary_enrichment(word, meaning))
        .await
    {
        Ok(review) => EnrichedWord::from_review(word, meaning, review),
        Err(e) => {
            tracing::warn!(error = %e, word, "Vocabulary enrichment failed, using learner input");
            EnrichedWord::fallback(word, meaning)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review() -> VocabularyEnrichment {
        VocabularyEnrichment {
            is_spelling_correct: true,
            corrected_word: None,
            is_meaning_correct: true,
            corrected_meaning: None,
            meaning_target: Some("an electronic machine".to_string()),
            phonetic: Some("/kəmˈpjuːtə/".to_string()),
            example: Some("My computer is fast.".to_string()),
            topic: Some("Technology".to_string()),
        }
    }

    #[test]
    fn test_fallback() {
        let word = EnrichedWord::fallback("apple", "quả táo");
        assert_eq!(word.example.as_deref(), Some("I use apple every day."));
        assert_eq!(word.topic, "general");
        assert!(word.phonetic.is_none());
        assert!(!word.was_corrected());
    }

    #[test]
    fn test_review_without_corrections() {
        let word = EnrichedWord::from_review("computer", "máy tính", review());
        assert_eq!(word.word, "computer");
        assert_eq!(word.topic, "technology");
        assert_eq!(word.phonetic.as_deref(), Some("/kəmˈpjuːtə/"));
        assert!(!word.was_corrected());
    }

    #[test]
    fn test_review_with_spelling_correction() {
        let review = VocabularyEnrichment {
            is_spelling_correct: false,
            corrected_word: Some("computer".to_string()),
            ..review()
        };
        let word = EnrichedWord::from_review("computor", "máy tính", review);
        assert_eq!(word.word, "computer");
        assert_eq!(word.corrected_from_word.as_deref(), Some("computor"));
        assert!(word.corrected_from_meaning.is_none());
        assert!(word.was_corrected());
    }

    #[test]
    fn test_flagged_without_replacement_is_ignored() {
        let review = VocabularyEnrichment {
            is_meaning_correct: false,
            corrected_meaning: Some("  ".to_string()),
            ..review()
        };
        let word = EnrichedWord::from_review("computer", "máy tính", review);
        assert_eq!(word.meaning, "máy tính");
        assert!(!word.was_corrected());
    }

    #[tokio::test]
    async fn test_enrich_without_client_falls_back() {
        let word = enrich(None, "cat", "con mèo").await;
        assert_eq!(word, EnrichedWord::fallback("cat", "con mèo"));
    }
}
