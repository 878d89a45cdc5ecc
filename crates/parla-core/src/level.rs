//! CEFR proficiency levels.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The six CEFR levels, ordered from beginner to mastery.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ProficiencyLevel {
    #[default]
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown proficiency level '{0}', expected one of A1, A2, B1, B2, C1, C2")]
pub struct ParseLevelError(pub String);

impl ProficiencyLevel {
    pub const ALL: [ProficiencyLevel; 6] = [
        ProficiencyLevel::A1,
        ProficiencyLevel::A2,
        ProficiencyLevel::B1,
        ProficiencyLevel::B2,
        ProficiencyLevel::C1,
        ProficiencyLevel::C2,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            ProficiencyLevel::A1 => "A1",
            ProficiencyLevel::A2 => "A2",
            ProficiencyLevel::B1 => "B1",
            ProficiencyLevel::B2 => "B2",
            ProficiencyLevel::C1 => "C1",
            ProficiencyLevel::C2 => "C2",
        }
    }

    /// Suggested conversation and quiz topics for this level.
    pub const fn topics(&self) -> &'static [&'static str] {
        match self {
            ProficiencyLevel::A1 => &["greetings", "family", "food", "colors", "numbers"],
            ProficiencyLevel::A2 => &["daily_routine", "hobbies", "shopping", "weather", "travel"],
            ProficiencyLevel::B1 => &["work", "education", "health", "technology", "environment"],
            ProficiencyLevel::B2 => &["culture", "politics", "economy", "science", "art"],
            ProficiencyLevel::C1 => &["philosophy", "literature", "global_issues", "innovation"],
            ProficiencyLevel::C2 => &["advanced_topics", "debate", "research", "professional"],
        }
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProficiencyLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        ProficiencyLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ProficiencyLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(ProficiencyLevel::A1 < ProficiencyLevel::A2);
        assert!(ProficiencyLevel::B2 < ProficiencyLevel::C1);
        assert_eq!(ProficiencyLevel::ALL.iter().max(), Some(&ProficiencyLevel::C2));
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!("b1".parse::<ProficiencyLevel>(), Ok(ProficiencyLevel::B1));
        assert_eq!(" C2 ".parse::<ProficiencyLevel>(), Ok(ProficiencyLevel::C2));
        assert!("D1".parse::<ProficiencyLevel>().is_err());
        assert!("".parse::<ProficiencyLevel>().is_err());
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&ProficiencyLevel::A2).unwrap();
        assert_eq!(json, "\"A2\"");

        let level: ProficiencyLevel = serde_json::from_str("\"c1\"").unwrap();
        assert_eq!(level, ProficiencyLevel::C1);

        assert!(serde_json::from_str::<ProficiencyLevel>("\"Z9\"").is_err());
    }

    #[test]
    fn test_topics() {
        assert_eq!(ProficiencyLevel::A1.topics()[0], "greetings");
        assert!(ProficiencyLevel::B1.topics().contains(&"technology"));
        assert_eq!(ProficiencyLevel::C2.topics().len(), 4);
        for level in ProficiencyLevel::ALL {
            assert!(!level.topics().is_empty());
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for level in ProficiencyLevel::ALL {
            assert_eq!(level.to_string().parse::<ProficiencyLevel>(), Ok(level));
        }
    }
}
