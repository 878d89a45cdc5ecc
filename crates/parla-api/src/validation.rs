use std::borrow::Cow;

use parla_core::ProficiencyLevel;
use validator::ValidationError;

use crate::error::ApiError;

/// Topic used by quiz and game routes to draw from the learner's own words
pub const MY_VOCABULARY: &str = "my_vocabulary";

const MAX_TOPIC_LEN: usize = 40;

/// Parse a CEFR level such as `b1` or `B1`.
///
/// # Examples
/// ```
/// use parla_api::validation::parse_level;
///
/// assert!(parse_level("b2").is_ok());
/// assert!(parse_level("D1").is_err());
/// ```
pub fn parse_level(level: &str) -> Result<ProficiencyLevel, ApiError> {
    level
        .parse()
        .map_err(|e: parla_core::ParseLevelError| ApiError::Validation(e.to_string()))
}

/// Validate a quiz or game topic: lowercase letters, digits and underscores.
///
/// Topics end up inside AI prompts, so anything else is rejected.
pub fn validate_topic(topic: &str) -> Result<(), ApiError> {
    if topic.is_empty() {
        return Err(ApiError::Validation("Topic cannot be empty".to_string()));
    }

    if topic.len() > MAX_TOPIC_LEN {
        return Err(ApiError::Validation(format!(
            "Topic must be at most {MAX_TOPIC_LEN} characters long"
        )));
    }

    if !topic
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(ApiError::Validation(format!(
            "Invalid topic: '{topic}'. Use lowercase letters, digits and underscores"
        )));
    }

    Ok(())
}

/// Clamp an optional `count` query parameter into `min..=max`.
pub fn clamp_count(count: Option<usize>, default: usize, min: usize, max: usize) -> usize {
    count.unwrap_or(default).clamp(min, max)
}

/// `validator` custom rule rejecting whitespace-only strings.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(Cow::Borrowed("must not be blank"));
        return Err(err);
    }
    Ok(())
}
