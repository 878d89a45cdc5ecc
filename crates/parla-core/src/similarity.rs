//! Answer scoring for dictation and quiz checks.
//!
//! Scoring uses a Ratcliff/Obershelp matching-blocks ratio over the characters
//! of the two normalized strings, then classifies the ratio into a
//! [`FeedbackTier`] using the thresholds in [`ScoringConfig`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalize::TextNormalizer;

/// Ordered feedback category derived from a similarity ratio.
///
/// Variants are declared from worst to best so `Ord` follows quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    /// Below the needs-improvement threshold
    Retry,
    /// Recognizable but with many mistakes
    NeedsImprovement,
    /// Mostly right
    Good,
    /// A few small slips
    VeryGood,
    /// Matches or nearly matches
    Perfect,
}

impl FeedbackTier {
    /// Snake-case name, as serialized.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Retry => "retry",
            Self::NeedsImprovement => "needs_improvement",
            Self::Good => "good",
            Self::VeryGood => "very_good",
            Self::Perfect => "perfect",
        }
    }
}

impl std::fmt::Display for FeedbackTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of scoring one (reference, attempt) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Similarity ratio in `[0, 1]`
    pub ratio: f64,
    /// Whether the ratio reached the correctness threshold
    pub correct: bool,
    pub tier: FeedbackTier,
}

impl ComparisonResult {
    /// Ratio as a percentage rounded to one decimal place.
    pub fn percentage(&self) -> f64 {
        (self.ratio * 1000.0).round() / 10.0
    }
}

/// Rejected [`ScoringConfig`] values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringConfigError {
    /// A threshold lies outside `[0, 1]`
    #[error("threshold {name} must be within [0, 1], got {value}")]
    OutOfRange { name: &'static str, value: f64 },
    #[error("tier thresholds must be strictly descending: {higher} ({higher_value}) <= {lower} ({lower_value})")]
    /// Tier thresholds overlap or are out of order
    NotDescending {
        higher: &'static str,
        higher_value: f64,
        lower: &'static str,
        lower_value: f64,
    },
}

/// Tunable thresholds for correctness and tier classification.
///
/// All bounds are inclusive lower bounds: a ratio equal to a threshold
/// belongs to the higher band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub correct_threshold: f64,
    pub perfect: f64,
    pub very_good: f64,
    pub good: f64,
    pub needs_improvement: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            correct_threshold: 0.85,
            perfect: 0.95,
            very_good: 0.85,
            good: 0.70,
            needs_improvement: 0.50,
        }
    }
}

impl ScoringConfig {
    /// Check that every threshold is a ratio and the tier bands do not overlap.
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let named = [
            ("correct_threshold", self.correct_threshold),
            ("perfect", self.perfect),
            ("very_good", self.very_good),
            ("good", self.good),
            ("needs_improvement", self.needs_improvement),
        ];
        for (name, value) in named {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScoringConfigError::OutOfRange { name, value });
            }
        }

        for pair in named[1..].windows(2) {
            let (higher, higher_value) = pair[0];
            let (lower, lower_value) = pair[1];
            if higher_value <= lower_value {
                return Err(ScoringConfigError::NotDescending {
                    higher,
                    higher_value,
                    lower,
                    lower_value,
                });
            }
        }

        Ok(())
    }

    /// Map a ratio to its tier, evaluating bands from best to worst.
    pub fn classify(&self, ratio: f64) -> FeedbackTier {
        if ratio >= self.perfect {
            FeedbackTier::Perfect
        } else if ratio >= self.very_good {
            FeedbackTier::VeryGood
        } else if ratio >= self.good {
            FeedbackTier::Good
        } else if ratio >= self.needs_improvement {
            FeedbackTier::NeedsImprovement
        } else {
            FeedbackTier::Retry
        }
    }

    pub fn is_correct(&self, ratio: f64) -> bool {
        ratio >= self.correct_threshold
    }
}

/// Scores attempts against references.
#[derive(Debug, Clone, Default)]
pub struct SimilarityScorer {
    normalizer: TextNormalizer,
    config: ScoringConfig,
}

impl SimilarityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            config,
        }
    }

    pub fn with_normalizer(mut self, normalizer: TextNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Normalize both strings, compute their ratio and classify it.
    pub fn score(&self, reference: &str, attempt: &str) -> ComparisonResult {
        let reference = self.normalizer.normalize(reference);
        let attempt = self.normalizer.normalize(attempt);
        let ratio = similarity_ratio(&reference, &attempt);

        ComparisonResult {
            ratio,
            correct: self.config.is_correct(ratio),
            tier: self.config.classify(ratio),
        }
    }
}

/// Score with default thresholds and the default normalizer.
pub fn score(reference: &str, attempt: &str) -> ComparisonResult {
    SimilarityScorer::default().score(reference, attempt)
}

/// A matched run: `a[a_start..a_start + len] == b[b_start..b_start + len]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub len: usize,
}

/// `2 * M / T` over the characters of `a` and `b` (no normalization applied).
///
/// Two empty strings are identical (1.0).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched: usize = matching_blocks(&a, &b).iter().map(|m| m.len).sum();
    2.0 * matched as f64 / total as f64
}

/// Non-overlapping matched runs in ascending order of position.
///
/// Takes the longest common run in the current window (ties go to the
/// earliest start in `a`, then in `b`) and repeats on the windows to its left
/// and right until no run remains.
pub fn matching_blocks<T>(a: &[T], b: &[T]) -> Vec<MatchBlock>
where
    T: Eq + std::hash::Hash,
{
    // Positions of each element of b, ascending.
    let mut b_index: HashMap<&T, Vec<usize>> = HashMap::new();
    for (j, item) in b.iter().enumerate() {
        b_index.entry(item).or_default().push(j);
    }

    let mut blocks = Vec::new();
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = pending.pop() {
        let found = longest_match(a, &b_index, a_lo, a_hi, b_lo, b_hi);
        if found.len == 0 {
            continue;
        }

        blocks.push(found);
        if a_lo < found.a_start && b_lo < found.b_start {
            pending.push((a_lo, found.a_start, b_lo, found.b_start));
        }
        let a_end = found.a_start + found.len;
        let b_end = found.b_start + found.len;
        if a_end < a_hi && b_end < b_hi {
            pending.push((a_end, a_hi, b_end, b_hi));
        }
    }

    blocks.sort_by_key(|m| (m.a_start, m.b_start));
    blocks
}

fn longest_match<T>(
    a: &[T],
    b_index: &HashMap<&T, Vec<usize>>,
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> MatchBlock
where
    T: Eq + std::hash::Hash,
{
    let mut best = MatchBlock {
        a_start: a_lo,
        b_start: b_lo,
        len: 0,
    };

    // run_len[j] = length of the common run ending at (i - 1, j)
    let mut run_len: HashMap<usize, usize> = HashMap::new();
    for (i, item) in a.iter().enumerate().take(a_hi).skip(a_lo) {
        let mut next_run_len = HashMap::new();
        if let Some(positions) = b_index.get(item) {
            for &j in positions {
                if j < b_lo {
                    continue;
                }
                if j >= b_hi {
                    break;
                }
                let k = j
                    .checked_sub(1)
                    .and_then(|prev| run_len.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_run_len.insert(j, k);
                if k > best.len {
                    best = MatchBlock {
                        a_start: i + 1 - k,
                        b_start: j + 1 - k,
                        len: k,
                    };
                }
            }
        }
        run_len = next_run_len;
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(a: &str, b: &str) -> Vec<(usize, usize, usize)> {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        matching_blocks(&a, &b)
            .into_iter()
            .map(|m| (m.a_start, m.b_start, m.len))
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_matching_blocks_longest_first() {
        assert_eq!(
            blocks("she sells sea shells", "he sells she shells"),
            vec![(1, 0, 10), (11, 11, 1), (13, 12, 7)]
        );
        assert_eq!(blocks("hello", "olleh"), vec![(2, 1, 2)]);
        assert_eq!(blocks("abc", "xyz"), vec![]);
    }

    #[test]
    fn test_ties_prefer_earliest_match() {
        // "ab" appears twice in b; the earliest occurrence wins
        assert_eq!(blocks("ab", "abab"), vec![(0, 0, 2)]);
        // a single-char tie resolves to the earliest position in a
        assert_eq!(blocks("xy", "yx"), vec![(0, 1, 1)]);
    }

    #[test]
    fn test_ratio_values() {
        assert!(approx(similarity_ratio("hello", "olleh"), 0.4));
        assert!(approx(
            similarity_ratio("she sells sea shells", "he sells she shells"),
            36.0 / 39.0
        ));
        assert!(approx(similarity_ratio("", ""), 1.0));
        assert!(approx(similarity_ratio("abc", ""), 0.0));
        assert!(approx(similarity_ratio("", "abc"), 0.0));
    }

    #[test]
    fn test_ratio_counts_characters_not_bytes() {
        assert!(approx(similarity_ratio("café", "cafe"), 0.75));
    }

    #[test]
    fn test_identity_scores_perfect() {
        for s in ["x", "I am a student.", "Route 66", "¿Cómo estás?"] {
            let result = score(s, s);
            assert!(approx(result.ratio, 1.0));
            assert_eq!(result.tier, FeedbackTier::Perfect);
            assert!(result.correct);
        }
    }

    #[test]
    fn test_empty_edge_cases() {
        let both_empty = score("", "...");
        assert!(approx(both_empty.ratio, 1.0));
        assert_eq!(both_empty.tier, FeedbackTier::Perfect);

        let one_empty = score("Hello", "");
        assert!(approx(one_empty.ratio, 0.0));
        assert_eq!(one_empty.tier, FeedbackTier::Retry);
        assert!(!one_empty.correct);
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            ("The weather is nice today.", "Whether is nice to day"),
            ("she sells sea shells", "he sells she shells"),
            ("I go to school by bus", "I went to the school on foot"),
            ("Can you help me", "Could you help me please"),
            ("good morning", "evening"),
        ];
        for (a, b) in pairs {
            assert!(approx(score(a, b).ratio, score(b, a).ratio), "{a:?} / {b:?}");
        }
    }

    #[test]
    fn test_case_and_punctuation_ignored() {
        let result = score("I am a student.", "i am a student");
        assert!(approx(result.ratio, 1.0));
        assert_eq!(result.tier, FeedbackTier::Perfect);
        assert!(result.correct);
    }

    #[test]
    fn test_homophone_dictation() {
        // 25 + 22 characters, 20 of them matched
        let result = score("The weather is nice today.", "Whether is nice to day");
        assert!(approx(result.ratio, 40.0 / 47.0));
        assert_eq!(result.tier, FeedbackTier::VeryGood);
        assert!(result.correct);
    }

    #[test]
    fn test_each_tier() {
        assert_eq!(score("hello world", "hello word").tier, FeedbackTier::Perfect);
        assert_eq!(
            score("I like green apples", "I like red apples").tier,
            FeedbackTier::VeryGood
        );

        let good = score("We are going to the beach tomorrow", "we going beach tomorrow");
        assert_eq!(good.tier, FeedbackTier::Good);
        assert!(!good.correct);

        assert_eq!(
            score("Can you help me", "Could you help me please").tier,
            FeedbackTier::NeedsImprovement
        );
        assert_eq!(score("good morning", "evening").tier, FeedbackTier::Retry);
    }

    #[test]
    fn test_threshold_boundaries_are_inclusive() {
        let config = ScoringConfig::default();
        assert_eq!(config.classify(0.85), FeedbackTier::VeryGood);
        assert!(config.is_correct(0.85));
        assert_eq!(config.classify(0.849999), FeedbackTier::Good);
        assert!(!config.is_correct(0.849999));
        assert_eq!(config.classify(0.95), FeedbackTier::Perfect);
        assert_eq!(config.classify(0.70), FeedbackTier::Good);
        assert_eq!(config.classify(0.50), FeedbackTier::NeedsImprovement);
        assert_eq!(config.classify(0.4999), FeedbackTier::Retry);
        assert_eq!(config.classify(0.0), FeedbackTier::Retry);
    }

    #[test]
    fn test_custom_thresholds() {
        let lenient = ScoringConfig {
            correct_threshold: 0.6,
            perfect: 0.9,
            very_good: 0.8,
            good: 0.6,
            needs_improvement: 0.3,
        };
        assert!(lenient.validate().is_ok());

        let scorer = SimilarityScorer::new(lenient);
        let result = scorer.score("Can you help me", "Could you help me please");
        assert_eq!(result.tier, FeedbackTier::Good);
        assert!(result.correct);
    }

    #[test]
    fn test_config_validation() {
        assert!(ScoringConfig::default().validate().is_ok());

        let out_of_range = ScoringConfig {
            correct_threshold: 1.5,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            out_of_range.validate(),
            Err(ScoringConfigError::OutOfRange {
                name: "correct_threshold",
                ..
            })
        ));

        let overlapping = ScoringConfig {
            good: 0.9,
            ..ScoringConfig::default()
        };
        assert!(matches!(
            overlapping.validate(),
            Err(ScoringConfigError::NotDescending {
                higher: "very_good",
                lower: "good",
                ..
            })
        ));
    }

    #[test]
    fn test_folding_scorer() {
        let scorer = SimilarityScorer::default().with_normalizer(TextNormalizer::folding());
        let result = scorer.score("Xin chào", "xin chao");
        assert_eq!(result.tier, FeedbackTier::Perfect);
    }

    #[test]
    fn test_tier_serialization_and_order() {
        assert_eq!(
            serde_json::to_string(&FeedbackTier::NeedsImprovement).unwrap(),
            "\"needs_improvement\""
        );
        assert!(FeedbackTier::Perfect > FeedbackTier::VeryGood);
        assert!(FeedbackTier::Good > FeedbackTier::Retry);
    }

    #[test]
    fn test_percentage() {
        let result = score("The weather is nice today.", "Whether is nice to day");
        assert!(approx(result.percentage(), 85.1));
    }
}
