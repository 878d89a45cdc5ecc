//! Lightweight heuristics run over each chat message.
//!
//! These are deliberately shallow: three common grammar slips, a handful of
//! content words worth saving, and a rough complexity band from word and
//! sentence length. Anything deeper is left to the AI tutor.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Words that may legitimately follow a lowercase "i" without a flag.
const I_EXEMPT_FOLLOWERS: &[&str] = &["am", "was", "will", "would", "can", "could", "should"];

/// Upper bound on words suggested from one message.
pub const MAX_SUGGESTED_WORDS: usize = 5;

/// Function words long enough to pass the length filter but not worth saving.
const STOPWORDS: &[&str] = &[
    "about", "after", "again", "also", "because", "been", "before", "being", "could", "does",
    "doing", "each", "from", "have", "having", "here", "into", "just", "many", "more", "most",
    "much", "only", "other", "over", "really", "should", "some", "such", "than", "that", "their",
    "them", "then", "there", "these", "they", "this", "those", "very", "want", "were", "what",
    "when", "where", "which", "while", "will", "with", "would", "your",
];

static THIRD_PERSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(he|she|it)\s+(am|are)\b").expect("third-person pattern is valid")
});

static PLURAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(i|you|we|they)\s+is\b").expect("plural pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarIssue {
    UncapitalizedI,
    ThirdPersonAgreement,
    PluralAgreement,
}

impl GrammarIssue {
    pub const fn message(&self) -> &'static str {
        match self {
            GrammarIssue::UncapitalizedI => "The pronoun 'I' must be capitalized",
            GrammarIssue::ThirdPersonAgreement => "Subject-verb agreement: he/she/it + is",
            GrammarIssue::PluralAgreement => "Subject-verb agreement: I/you/we/they + are/am",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplexityBand {
    #[serde(rename = "A1-A2")]
    Beginner,
    #[serde(rename = "B1-B2")]
    Intermediate,
    #[serde(rename = "C1-C2")]
    Advanced,
}

impl ComplexityBand {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ComplexityBand::Beginner => "A1-A2",
            ComplexityBand::Intermediate => "B1-B2",
            ComplexityBand::Advanced => "C1-C2",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub grammar_issues: Vec<GrammarIssue>,
    /// Content words the learner might want to save
    pub new_vocabulary: Vec<String>,
    pub complexity: ComplexityBand,
}

/// Run every heuristic over `text`.
pub fn analyze(text: &str) -> TextAnalysis {
    TextAnalysis {
        grammar_issues: detect_grammar_errors(text),
        new_vocabulary: extract_vocabulary(text),
        complexity: assess_complexity(text),
    }
}

/// Pick up to [`MAX_SUGGESTED_WORDS`] content words from `text`.
///
/// A content word is alphabetic (apostrophes allowed), longer than three
/// letters and not in [`STOPWORDS`]. Words are lowercased and returned once
/// each, in order of first appearance.
pub fn extract_vocabulary(text: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();

    for token in text.split(|c: char| !c.is_alphabetic() && c != '\'') {
        let word = token.trim_matches('\'').to_lowercase();
        if word.chars().count() <= 3
            || word.contains('\'')
            || STOPWORDS.contains(&word.as_str())
            || words.contains(&word)
        {
            continue;
        }

        words.push(word);
        if words.len() == MAX_SUGGESTED_WORDS {
            break;
        }
    }

    words
}

/// Detect common grammar slips. Each issue is reported at most once.
pub fn detect_grammar_errors(text: &str) -> Vec<GrammarIssue> {
    let mut issues = Vec::new();

    if has_uncapitalized_i(text) {
        issues.push(GrammarIssue::UncapitalizedI);
    }
    if THIRD_PERSON_RE.is_match(text) {
        issues.push(GrammarIssue::ThirdPersonAgreement);
    }
    if PLURAL_RE.is_match(text) {
        issues.push(GrammarIssue::PluralAgreement);
    }

    issues
}

/// A standalone lowercase "i" followed by another word that is not one of
/// [`I_EXEMPT_FOLLOWERS`].
fn has_uncapitalized_i(text: &str) -> bool {
    let words: Vec<&str> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .collect();

    words.windows(2).any(|pair| {
        let (current, next) = (pair[0], pair[1]);
        current == "i"
            && !next.is_empty()
            && !I_EXEMPT_FOLLOWERS
                .iter()
                .any(|exempt| next.eq_ignore_ascii_case(exempt))
    })
}

/// Rough CEFR band from average word length (letters per word) and average
/// sentence length (words per sentence). Empty text is `A1-A2`.
pub fn assess_complexity(text: &str) -> ComplexityBand {
    let words: Vec<&str> = text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() {
        return ComplexityBand::Beginner;
    }

    let sentences = text
        .split(['.', '!', '?'])
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count()
        .max(1);

    let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
    let avg_word_len = total_chars as f64 / words.len() as f64;
    let avg_sentence_len = words.len() as f64 / sentences as f64;

    if avg_word_len < 4.0 && avg_sentence_len < 8.0 {
        ComplexityBand::Beginner
    } else if avg_word_len < 5.0 && avg_sentence_len < 12.0 {
        ComplexityBand::Intermediate
    } else {
        ComplexityBand::Advanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_i() {
        assert_eq!(
            detect_grammar_errors("yesterday i go to school"),
            vec![GrammarIssue::UncapitalizedI]
        );
        assert!(detect_grammar_errors("I go to school").is_empty());
    }

    #[test]
    fn test_lowercase_i_exempt_followers() {
        assert!(detect_grammar_errors("i am happy").is_empty());
        assert!(detect_grammar_errors("i can swim").is_empty());
        assert!(detect_grammar_errors("maybe i should").is_empty());
        // Trailing "i" with nothing after it is not flagged
        assert!(detect_grammar_errors("it was me, not i").is_empty());
    }

    #[test]
    fn test_i_inside_words_ignored() {
        assert!(detect_grammar_errors("this is it").is_empty());
        assert!(detect_grammar_errors("pi is a number").is_empty());
    }

    #[test]
    fn test_third_person_agreement() {
        assert_eq!(
            detect_grammar_errors("She are my friend"),
            vec![GrammarIssue::ThirdPersonAgreement]
        );
        assert_eq!(
            detect_grammar_errors("he am tired"),
            vec![GrammarIssue::ThirdPersonAgreement]
        );
        assert!(detect_grammar_errors("She is my friend").is_empty());
        // "are" must be a whole word
        assert!(detect_grammar_errors("it area").is_empty());
    }

    #[test]
    fn test_plural_agreement() {
        assert_eq!(
            detect_grammar_errors("They is late"),
            vec![GrammarIssue::PluralAgreement]
        );
        assert_eq!(
            detect_grammar_errors("You is nice"),
            vec![GrammarIssue::PluralAgreement]
        );
        assert!(detect_grammar_errors("They are late").is_empty());
    }

    #[test]
    fn test_multiple_issues() {
        let issues = detect_grammar_errors("i think they is here and he are too");
        assert_eq!(
            issues,
            vec![
                GrammarIssue::UncapitalizedI,
                GrammarIssue::ThirdPersonAgreement,
                GrammarIssue::PluralAgreement,
            ]
        );
    }

    #[test]
    fn test_complexity_bands() {
        assert_eq!(assess_complexity(""), ComplexityBand::Beginner);
        assert_eq!(assess_complexity("I am a cat."), ComplexityBand::Beginner);
        assert_eq!(
            assess_complexity("Today I would like some coffee."),
            ComplexityBand::Intermediate
        );
        assert_eq!(
            assess_complexity(
                "Contemporary philosophical discourse frequently interrogates epistemological assumptions."
            ),
            ComplexityBand::Advanced
        );
    }

    #[test]
    fn test_long_sentence_of_short_words_is_not_beginner() {
        let text = "I go to the park and I see a dog and a cat and we all run";
        assert_ne!(assess_complexity(text), ComplexityBand::Beginner);
    }

    #[test]
    fn test_extract_vocabulary() {
        assert_eq!(
            extract_vocabulary("I would like to visit the Museum because museums are quiet."),
            vec!["like", "visit", "museum", "museums", "quiet"]
        );
        assert!(extract_vocabulary("I am a cat.").is_empty());
        assert!(extract_vocabulary("").is_empty());
    }

    #[test]
    fn test_extract_vocabulary_skips_contractions_and_caps_output() {
        assert_eq!(extract_vocabulary("Don't worry, 'friend'"), vec!["worry", "friend"]);

        let words = extract_vocabulary(
            "apple banana cherry damson elderberry feijoa guava apple banana",
        );
        assert_eq!(words, vec!["apple", "banana", "cherry", "damson", "elderberry"]);
    }

    #[test]
    fn test_analyze_serializes() {
        let analysis = analyze("he are so tall");
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["grammar_issues"][0], "third_person_agreement");
        assert_eq!(json["new_vocabulary"], serde_json::json!(["tall"]));
        assert_eq!(json["complexity"], "A1-A2");
    }
}
