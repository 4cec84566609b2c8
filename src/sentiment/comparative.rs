//! Comparative-statement adjustment.
//!
//! Word-level scorers read "the last version was better than this" as
//! positive because of "better". These rules catch statements that describe
//! the present as worse than the past (plus blunt dismissals such as
//! "rubbish") and push the score negative; improvement comparisons
//! ("better than before") get a small positive nudge.

use crate::error::{Result, SentiscopeError};
use regex::Regex;

const NEGATIVE_PATTERNS: &[&str] = &[
    r"(?i)\b(better|good|great|excellent|superior|improved)\s+than\s+(this|that|current|now|today|this\s+one|that\s+one)",
    r"(?i)\b(better|good|great|excellent|superior|improved)\s+than\s+(it|they|we|you)\s+(is|are|was|were|now)",
    r"(?i)\b(last|previous|earlier|before)\s+(experience|time|one|service|product)\s+(was|were)\s+(better|good|great|excellent)\s+than",
    r"(?i)\b(previous|last|earlier|before)\s+(time|experience)\s+was\s+better",
    r"(?i)\b(not|isn't|aren't|wasn't|weren't)\s+(as|so)\s+(good|great|excellent|nice|well)\s+as\s+(before|previously|earlier|last|it|they)",
    r"(?i)\b(this|that|it|they)\s+(is|are|was|were)\s+not\s+(as|so)\s+(good|great|excellent|nice|well)",
    r"(?i)\b(worse|worsened|declined|deteriorated)\s+than\s+(before|previously|earlier|last)",
    r"(?i)\b(used\s+to\s+be)\s+(better|good|great)",
    r"(?i)\b(didn't|don't|doesn't|didnt|dont|doesnt|did\s+not|do\s+not|does\s+not)\s+find.*?(interesting|good|great|excellent|nice|enjoyable|engaging)",
    r"(?i)\b(not|isn't|aren't|wasn't|weren't)\s+(interesting|good|great|excellent|nice|enjoyable|engaging|worthwhile)",
    r"(?i)\b(rubbish|nonsense|stupid|idiotic|ridiculous|terrible|awful|horrible|disgusting|pathetic)",
    r"(?i)\b(don't|do\s+not)\s+talk\s+(rubbish|nonsense|garbage|trash|crap)",
];

const POSITIVE_PATTERNS: &[&str] = &[
    r"(?i)\b(better|good|great|excellent|improved)\s+than\s+(before|previously|earlier|last)",
    r"(?i)\b(improved|improving|better)\s+(than|from)\s+(before|previously|earlier|last)",
];

const DISMISSIVE_WORDS: &[&str] = &[
    "rubbish", "nonsense", "garbage", "trash", "crap", "stupid", "idiotic",
];
const NOT_FIND_PHRASES: &[&str] = &[
    "didn't find",
    "don't find",
    "not find",
    "didnt find",
    "dont find",
];
const NOT_FIND_TARGETS: &[&str] = &["interesting", "good", "great", "enjoyable", "engaging"];

const DISMISSIVE_SCORE: f64 = -0.7;
const NOT_FIND_TARGET_SCORE: f64 = -0.6;
const NOT_FIND_SCORE: f64 = -0.4;
const NEGATIVE_SHIFT: f64 = 0.4;
const POSITIVE_SHIFT: f64 = 0.2;

/// Compiled comparative patterns.
#[derive(Debug, Clone)]
pub struct ComparativeRules {
    negative: Vec<Regex>,
    positive: Vec<Regex>,
}

fn compile(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|e| SentiscopeError::Config(format!("bad comparative pattern: {e}")))
        })
        .collect()
}

impl ComparativeRules {
    /// Compile the built-in pattern set.
    ///
    /// # Errors
    ///
    /// Returns a config error if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        Ok(Self {
            negative: compile(NEGATIVE_PATTERNS)?,
            positive: compile(POSITIVE_PATTERNS)?,
        })
    }

    /// Return the adjusted score when a comparative pattern matches.
    ///
    /// Negative patterns are checked first and win. The result is clamped to
    /// `[-1, 1]`.
    pub fn adjust(&self, text: &str, score: f64) -> Option<f64> {
        let lower = text.to_lowercase();

        if self.negative.iter().any(|re| re.is_match(text)) {
            let adjusted = if DISMISSIVE_WORDS.iter().any(|w| lower.contains(w)) {
                DISMISSIVE_SCORE
            } else if NOT_FIND_PHRASES.iter().any(|p| lower.contains(p)) {
                if NOT_FIND_TARGETS.iter().any(|w| lower.contains(w)) {
                    NOT_FIND_TARGET_SCORE
                } else {
                    NOT_FIND_SCORE
                }
            } else if score > 0.0 {
                -score.abs() - NEGATIVE_SHIFT
            } else {
                score - NEGATIVE_SHIFT
            };
            return Some(adjusted.clamp(-1.0, 1.0));
        }

        if self.positive.iter().any(|re| re.is_match(text)) {
            let adjusted = if score < 0.0 {
                score.abs() + POSITIVE_SHIFT
            } else {
                score + POSITIVE_SHIFT
            };
            return Some(adjusted.clamp(-1.0, 1.0));
        }

        None
    }
}
