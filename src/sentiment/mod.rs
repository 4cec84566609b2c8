//! Per-message sentiment scoring.
//!
//! A scorer turns one utterance into a compound score in `[-1, 1]` plus a
//! discrete [`SentimentLabel`]. Scorers are plain capability values: anything
//! implementing [`SentimentScorer`] works, including closures of type
//! `Fn(&str) -> SentimentScore`. Two lexicon backends ship with the crate:
//!
//! - [`LexiconScorer`] — VADER-style normalised compound (cutoffs ±0.05).
//! - [`PolarityScorer`] — TextBlob-style mean polarity (cutoffs ±0.1).
//!
//! [`SentimentEngine`] wraps a scorer with the resolved thresholds and the
//! optional [`ComparativeRules`] adjustment pass.

mod comparative;
mod lexicon;

pub use comparative::ComparativeRules;
pub use lexicon::{LexiconScorer, PolarityScorer};

use crate::config::{ScorerBackend, SentimentConfig};
use crate::error::{Result, SentiscopeError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Discrete sentiment bucket derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// All labels in reporting order.
    pub const ALL: [SentimentLabel; 3] = [Self::Positive, Self::Negative, Self::Neutral];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Positive/negative cutoff pair used to label a score.
///
/// `score >= positive` is Positive, `score <= negative` is Negative, anything
/// in between is Neutral. Construction enforces `-1 <= negative < positive <= 1`
/// so classification is monotonic in the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentThresholds {
    positive: f64,
    negative: f64,
}

impl SentimentThresholds {
    /// Cutoffs for normalised compound scores.
    pub const COMPOUND: Self = Self {
        positive: 0.05,
        negative: -0.05,
    };

    /// Cutoffs for mean-polarity scores.
    pub const POLARITY: Self = Self {
        positive: 0.1,
        negative: -0.1,
    };

    /// Build a validated threshold pair.
    ///
    /// # Errors
    ///
    /// Returns [`SentiscopeError::Config`] when either value is non-finite,
    /// outside `[-1, 1]`, or when `negative >= positive`.
    pub fn new(positive: f64, negative: f64) -> Result<Self> {
        if !positive.is_finite() || !negative.is_finite() {
            return Err(SentiscopeError::Config(
                "sentiment thresholds must be finite".to_owned(),
            ));
        }
        if !(-1.0..=1.0).contains(&positive) || !(-1.0..=1.0).contains(&negative) {
            return Err(SentiscopeError::Config(format!(
                "sentiment thresholds must lie within [-1, 1] (positive={positive}, negative={negative})"
            )));
        }
        if negative >= positive {
            return Err(SentiscopeError::Config(format!(
                "negative threshold ({negative}) must be below positive threshold ({positive})"
            )));
        }
        Ok(Self { positive, negative })
    }

    pub fn positive(&self) -> f64 {
        self.positive
    }

    pub fn negative(&self) -> f64 {
        self.negative
    }

    /// Label a score.
    pub fn classify(&self, score: f64) -> SentimentLabel {
        if score >= self.positive {
            SentimentLabel::Positive
        } else if score <= self.negative {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self::COMPOUND
    }
}

/// Result of scoring one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    /// Compound score in `[-1, 1]`.
    pub score: f64,
    pub label: SentimentLabel,
    /// Strength of the score (`|score|` for the lexicon backends).
    pub confidence: f64,
    /// Set when [`ComparativeRules`] rewrote the backend's score.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub adjusted_for_comparison: bool,
}

impl SentimentScore {
    /// Score labelled with the given thresholds, confidence `|score|`.
    pub fn from_score(score: f64, thresholds: &SentimentThresholds) -> Self {
        Self {
            score,
            label: thresholds.classify(score),
            confidence: score.abs(),
            adjusted_for_comparison: false,
        }
    }

    /// Zero score for empty or whitespace-only text.
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
            confidence: 0.0,
            adjusted_for_comparison: false,
        }
    }
}

/// Capability: score one utterance.
pub trait SentimentScorer: Send + Sync {
    fn score(&self, text: &str) -> SentimentScore;
}

impl<F> SentimentScorer for F
where
    F: Fn(&str) -> SentimentScore + Send + Sync,
{
    fn score(&self, text: &str) -> SentimentScore {
        self(text)
    }
}

/// Scorer plus the thresholds and adjustment rules used by the chat loop.
pub struct SentimentEngine {
    scorer: Box<dyn SentimentScorer>,
    thresholds: SentimentThresholds,
    comparative: Option<ComparativeRules>,
}

impl std::fmt::Debug for SentimentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentEngine")
            .field("thresholds", &self.thresholds)
            .field("comparative", &self.comparative.is_some())
            .finish_non_exhaustive()
    }
}

impl SentimentEngine {
    /// Wrap an arbitrary scorer. Comparative adjustment is off until
    /// [`with_comparative_rules`](Self::with_comparative_rules) is called.
    pub fn new(scorer: impl SentimentScorer + 'static, thresholds: SentimentThresholds) -> Self {
        Self {
            scorer: Box::new(scorer),
            thresholds,
            comparative: None,
        }
    }

    /// Build the configured backend.
    ///
    /// # Errors
    ///
    /// Returns a config error when the threshold overrides are invalid.
    pub fn from_config(config: &SentimentConfig) -> Result<Self> {
        let thresholds = config.thresholds()?;
        let engine = match config.backend {
            ScorerBackend::Lexicon => Self::new(LexiconScorer::new(thresholds), thresholds),
            ScorerBackend::Polarity => Self::new(PolarityScorer::new(thresholds), thresholds),
        };
        if config.comparative_adjustment {
            Ok(engine.with_comparative_rules(ComparativeRules::new()?))
        } else {
            Ok(engine)
        }
    }

    #[must_use]
    pub fn with_comparative_rules(mut self, rules: ComparativeRules) -> Self {
        self.comparative = Some(rules);
        self
    }

    pub fn thresholds(&self) -> SentimentThresholds {
        self.thresholds
    }

    /// Score one utterance, applying comparative adjustment when enabled.
    pub fn analyze_text(&self, text: &str) -> SentimentScore {
        if text.trim().is_empty() {
            return SentimentScore::neutral();
        }

        let base = self.scorer.score(text);
        let Some(rules) = &self.comparative else {
            return base;
        };
        let Some(adjusted) = rules.adjust(text, base.score) else {
            return base;
        };

        debug!(
            from = base.score,
            to = adjusted,
            "adjusted sentiment for comparative statement"
        );
        SentimentScore {
            adjusted_for_comparison: true,
            ..SentimentScore::from_score(adjusted, &self.thresholds)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn classify_uses_inclusive_cutoffs() {
        let t = SentimentThresholds::COMPOUND;
        assert_eq!(t.classify(0.05), SentimentLabel::Positive);
        assert_eq!(t.classify(-0.05), SentimentLabel::Negative);
        assert_eq!(t.classify(0.049), SentimentLabel::Neutral);
        assert_eq!(t.classify(-0.049), SentimentLabel::Neutral);
        assert_eq!(t.classify(0.0), SentimentLabel::Neutral);
    }

    #[test]
    fn classify_is_monotonic() {
        let t = SentimentThresholds::new(0.1, -0.1).unwrap();
        let rank = |l: SentimentLabel| match l {
            SentimentLabel::Negative => 0,
            SentimentLabel::Neutral => 1,
            SentimentLabel::Positive => 2,
        };
        let mut prev = rank(t.classify(-1.0));
        for step in -100..=100 {
            let current = rank(t.classify(f64::from(step) / 100.0));
            assert!(current >= prev, "label rank dropped at {step}");
            prev = current;
        }
    }

    #[test]
    fn thresholds_reject_inverted_pair() {
        assert!(SentimentThresholds::new(-0.1, 0.1).is_err());
        assert!(SentimentThresholds::new(0.1, 0.1).is_err());
    }

    #[test]
    fn thresholds_reject_out_of_range_and_nan() {
        assert!(SentimentThresholds::new(1.5, -0.1).is_err());
        assert!(SentimentThresholds::new(f64::NAN, -0.1).is_err());
    }

    #[test]
    fn closure_is_a_scorer() {
        let engine = SentimentEngine::new(
            |_: &str| SentimentScore::from_score(0.6, &SentimentThresholds::COMPOUND),
            SentimentThresholds::COMPOUND,
        );
        let result = engine.analyze_text("anything");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!((result.score - 0.6).abs() < 1e-12);
    }

    #[test]
    fn empty_text_is_neutral_without_calling_backend() {
        let engine = SentimentEngine::new(
            |_: &str| -> SentimentScore { unreachable!("backend must not be called") },
            SentimentThresholds::COMPOUND,
        );
        let result = engine.analyze_text("   ");
        assert_eq!(result, SentimentScore::neutral());
    }

    #[test]
    fn comparative_rules_relabel_with_engine_thresholds() {
        let engine = SentimentEngine::new(
            |_: &str| SentimentScore::from_score(0.4, &SentimentThresholds::COMPOUND),
            SentimentThresholds::COMPOUND,
        )
        .with_comparative_rules(ComparativeRules::new().unwrap());
        let result = engine.analyze_text("It used to be better than this");
        assert!(result.adjusted_for_comparison);
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!((result.score - (-0.8)).abs() < 1e-9);
    }

    #[test]
    fn from_config_builds_default_backend() {
        let engine = SentimentEngine::from_config(&SentimentConfig::default()).unwrap();
        assert_eq!(engine.thresholds(), SentimentThresholds::COMPOUND);
        assert_eq!(
            engine.analyze_text("I love this, it is wonderful").label,
            SentimentLabel::Positive
        );
    }
}
