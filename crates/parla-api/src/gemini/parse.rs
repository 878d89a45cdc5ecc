//! Strict parsing of model output into typed records.
//!
//! Models like to wrap JSON in markdown fences or surround it with chatter.
//! We strip fences, cut out the outermost JSON object or array, and
//! deserialize it; anything else is a [`GeminiError::ParseFailure`].

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::GeminiError;

/// AI review of a word the learner wants to add.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEnrichment {
    #[serde(default = "default_true")]
    pub is_spelling_correct: bool,
    #[serde(default)]
    pub corrected_word: Option<String>,
    #[serde(default = "default_true")]
    pub is_meaning_correct: bool,
    #[serde(default)]
    pub corrected_meaning: Option<String>,
    #[serde(default)]
    pub meaning_target: Option<String>,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

const fn default_true() -> bool {
    true
}

/// Word/meaning pair for the matching game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedWord {
    pub word: String,
    pub meaning: String,
}

/// Remove markdown code fences (```` ``` ```` or ```` ```json ````), keeping
/// their contents.
pub fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Slice from the first `{` or `[` to the last matching closer.
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let closer = if text[start..].starts_with('{') {
        '}'
    } else {
        ']'
    };
    let end = text.rfind(closer)?;

    (end > start).then(|| &text[start..=end])
}

/// Parse a model reply into `T`.
pub fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, GeminiError> {
    let cleaned = strip_code_fences(text);
    let json = extract_json(&cleaned)
        .ok_or_else(|| GeminiError::ParseFailure("no JSON object or array found".to_string()))?;

    serde_json::from_str(json).map_err(|e| GeminiError::ParseFailure(e.to_string()))
}

/// Trim a plain-text reply, dropping surrounding quotes the model sometimes
/// adds around single sentences.
pub fn clean_sentence(text: &str) -> Option<String> {
    let cleaned = strip_code_fences(text);
    let sentence = cleaned
        .trim()
        .trim_matches(|c| c == '"' || c == '\u{201C}' || c == '\u{201D}')
        .trim();

    (!sentence.is_empty()).then(|| sentence.to_string())
}

#[cfg(test)]
mod tests {
    use parla_core::exercise::GeneratedQuizItem;

    use super::*;

    #[test]
    fn test_plain_object() {
        let parsed: GeneratedWord = parse_json(r#"{"word": "apple", "meaning": "quả táo"}"#).unwrap();
        assert_eq!(parsed.word, "apple");
        assert_eq!(parsed.meaning, "quả táo");
    }

    #[test]
    fn test_fenced_object_with_chatter() {
        let reply = "Sure! Here is the analysis:\n```json\n{\n  \"is_spelling_correct\": false,\n  \"corrected_word\": \"hello\",\n  \"phonetic\": \"/həˈləʊ/\"\n}\n```\nLet me know if you need more.";
        let parsed: VocabularyEnrichment = parse_json(reply).unwrap();

        assert!(!parsed.is_spelling_correct);
        assert_eq!(parsed.corrected_word.as_deref(), Some("hello"));
        // Missing flags default to true
        assert!(parsed.is_meaning_correct);
        assert!(parsed.topic.is_none());
    }

    #[test]
    fn test_array() {
        let reply = "```\n[{\"word\": \"cat\", \"meaning\": \"con mèo\"}, {\"word\": \"dog\", \"meaning\": \"con chó\"}]\n```";
        let parsed: Vec<GeneratedWord> = parse_json(reply).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].word, "dog");
    }

    #[test]
    fn test_quiz_items() {
        let reply = r#"[{"word": "salad", "correct_answer": "rau trộn", "wrong_answers": ["bánh mì", "súp", "cơm"]}]"#;
        let parsed: Vec<GeneratedQuizItem> = parse_json(reply).unwrap();
        assert_eq!(parsed[0].wrong_answers.len(), 3);
        assert!(parsed[0].phonetic.is_none());
    }

    #[test]
    fn test_failures() {
        assert!(matches!(
            parse_json::<GeneratedWord>("I cannot help with that."),
            Err(GeminiError::ParseFailure(_))
        ));
        assert!(matches!(
            parse_json::<GeneratedWord>("{\"word\": \"cat\""),
            Err(GeminiError::ParseFailure(_))
        ));
        // Valid JSON, wrong shape
        assert!(matches!(
            parse_json::<Vec<GeneratedWord>>(r#"[{"term": "cat"}]"#),
            Err(GeminiError::ParseFailure(_))
        ));
    }

    #[test]
    fn test_extract_json_bounds() {
        assert_eq!(extract_json("x {\"a\": {\"b\": 1}} y"), Some("{\"a\": {\"b\": 1}}"));
        assert_eq!(extract_json("[1, 2] trailing"), Some("[1, 2]"));
        assert_eq!(extract_json("} backwards {"), None);
        assert_eq!(extract_json("nothing here"), None);
    }

    #[test]
    fn test_clean_sentence() {
        assert_eq!(
            clean_sentence("  \"The cat sleeps on the sofa.\"\n").as_deref(),
            Some("The cat sleeps on the sofa.")
        );
        assert_eq!(clean_sentence("```\n```"), None);
        assert_eq!(clean_sentence("   "), None);
    }
}
