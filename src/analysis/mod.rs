//! Conversation-level trend and aggregation analysis.
//!
//! [`ConversationAnalyzer::analyze`] is a pure function over an ordered
//! slice of [`SentimentObservation`]s. It never mutates its input, holds no
//! state between calls, and either returns a complete
//! [`ConversationSummary`] or an error.
//!
//! # Pipeline
//!
//! ```text
//! observations ──► validate scores
//!                 ├─► verdict    (mean, label counts, dominance)
//!                 ├─► moments    (shift / extreme flags)
//!                 ├─► trend      (half averages, delta, volatility)
//!                 ├─► emotions   (tag counts, dominant tag)
//!                 ├─► progression (cumulative average)
//!                 └─► insights   (structured, rendered by `report`)
//! ```

mod emotions;
mod insights;
mod moments;
mod trend;
mod verdict;

pub use emotions::EmotionDistribution;
pub use insights::Insight;
pub use moments::{KeyMoment, KeyMomentKind, ShiftDirection};
pub use trend::{Trend, TrendResult, volatility};
pub use verdict::{Dominance, LabelDistribution, OverallVerdict};

use crate::emotion::Emotion;
use crate::error::{Result, SentiscopeError};
use crate::sentiment::{SentimentLabel, SentimentThresholds};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ── Input ───────────────────────────────────────────────────────────────

/// One scored user message.
///
/// Built once and never edited; the score is checked on construction and
/// again by the analyzer (deserialised values bypass [`new`](Self::new)).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentObservation {
    sequence_index: usize,
    score: f64,
    label: SentimentLabel,
    #[serde(default = "neutral_emotion")]
    emotion: Emotion,
    /// Tagger confidence for `emotion`, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    emotion_confidence: Option<f64>,
    /// None when the source recorded no time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<DateTime<Utc>>,
}

fn neutral_emotion() -> Emotion {
    Emotion::Neutral
}

fn check_score(index: usize, score: f64) -> Result<()> {
    if score.is_finite() && (-1.0..=1.0).contains(&score) {
        Ok(())
    } else {
        Err(SentiscopeError::InvalidScore { index, score })
    }
}

impl SentimentObservation {
    /// # Errors
    ///
    /// Returns [`SentiscopeError::InvalidScore`] when `score` is non-finite or
    /// outside `[-1, 1]`.
    pub fn new(
        sequence_index: usize,
        score: f64,
        label: SentimentLabel,
        emotion: Emotion,
        timestamp: impl Into<Option<DateTime<Utc>>>,
    ) -> Result<Self> {
        check_score(sequence_index, score)?;
        Ok(Self {
            sequence_index,
            score,
            label,
            emotion,
            emotion_confidence: None,
            timestamp: timestamp.into(),
        })
    }

    /// Observation whose label is derived from `score` with `thresholds`.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn labelled(
        sequence_index: usize,
        score: f64,
        thresholds: &SentimentThresholds,
        emotion: Emotion,
        timestamp: impl Into<Option<DateTime<Utc>>>,
    ) -> Result<Self> {
        Self::new(
            sequence_index,
            score,
            thresholds.classify(score),
            emotion,
            timestamp,
        )
    }

    /// Attach the tagger's confidence, clamped to `[0, 1]`. Non-finite
    /// values are dropped.
    #[must_use]
    pub fn with_emotion_confidence(mut self, confidence: f64) -> Self {
        self.emotion_confidence = confidence.is_finite().then(|| confidence.clamp(0.0, 1.0));
        self
    }

    pub fn sequence_index(&self) -> usize {
        self.sequence_index
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn label(&self) -> SentimentLabel {
        self.label
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    pub fn emotion_confidence(&self) -> Option<f64> {
        self.emotion_confidence
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }
}

// ── Configuration ───────────────────────────────────────────────────────

/// Thresholds used by one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisConfig {
    /// Cutoffs used to label the average score.
    pub thresholds: SentimentThresholds,
    /// `delta > t` is Improving, `delta < -t` is Declining.
    pub trend_threshold: f64,
    pub shift_threshold: f64,
    pub extreme_threshold: f64,
    pub high_volatility: f64,
    pub low_volatility: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            thresholds: SentimentThresholds::COMPOUND,
            trend_threshold: 0.1,
            shift_threshold: 0.3,
            extreme_threshold: 0.7,
            high_volatility: 0.3,
            low_volatility: 0.1,
        }
    }
}

impl AnalysisConfig {
    /// # Errors
    ///
    /// Returns a config error for negative or non-finite thresholds, an
    /// extreme threshold outside `[0, 1]`, or `low_volatility > high_volatility`.
    pub fn validate(&self) -> Result<()> {
        let named = [
            ("trend_threshold", self.trend_threshold),
            ("shift_threshold", self.shift_threshold),
            ("extreme_threshold", self.extreme_threshold),
            ("high_volatility", self.high_volatility),
            ("low_volatility", self.low_volatility),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(SentiscopeError::Config(format!(
                    "analysis.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.extreme_threshold > 1.0 {
            return Err(SentiscopeError::Config(format!(
                "analysis.extreme_threshold must not exceed 1.0, got {}",
                self.extreme_threshold
            )));
        }
        if self.low_volatility > self.high_volatility {
            return Err(SentiscopeError::Config(format!(
                "analysis.low_volatility ({}) must not exceed analysis.high_volatility ({})",
                self.low_volatility, self.high_volatility
            )));
        }
        Ok(())
    }
}

// ── Output ──────────────────────────────────────────────────────────────

/// Running view of the conversation after each message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionPoint {
    pub index: usize,
    pub score: f64,
    pub label: SentimentLabel,
    pub cumulative_average: f64,
}

/// Everything derived from one observation sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub message_count: usize,
    pub verdict: OverallVerdict,
    pub trend: TrendResult,
    pub emotions: EmotionDistribution,
    pub progression: Vec<ProgressionPoint>,
    pub insights: Vec<Insight>,
    /// Seconds between the first and last observation; None when either
    /// lacks a timestamp.
    pub duration_secs: Option<f64>,
}

// ── Analyzer ────────────────────────────────────────────────────────────

/// Stateless aggregation engine bound to one validated configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversationAnalyzer {
    config: AnalysisConfig,
}

impl ConversationAnalyzer {
    /// # Errors
    ///
    /// Returns a config error when `config` fails [`AnalysisConfig::validate`].
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Summarise an ordered observation sequence.
    ///
    /// # Errors
    ///
    /// - [`SentiscopeError::InsufficientData`] for an empty slice.
    /// - [`SentiscopeError::InvalidScore`] when any score is outside `[-1, 1]`.
    pub fn analyze(&self, observations: &[SentimentObservation]) -> Result<ConversationSummary> {
        let (Some(first), Some(last)) = (observations.first(), observations.last()) else {
            return Err(SentiscopeError::InsufficientData);
        };
        for (position, obs) in observations.iter().enumerate() {
            check_score(position, obs.score)?;
        }

        let scores: Vec<f64> = observations.iter().map(|o| o.score).collect();
        let points: Vec<(f64, SentimentLabel)> =
            observations.iter().map(|o| (o.score, o.label)).collect();

        let verdict = verdict::compute(observations, &self.config.thresholds);
        let key_moments = moments::detect(
            &points,
            self.config.shift_threshold,
            self.config.extreme_threshold,
        );
        let trend = trend::compute(&scores, self.config.trend_threshold, key_moments);
        let emotions = EmotionDistribution::from_readings(
            observations
                .iter()
                .map(|o| (o.emotion, o.emotion_confidence)),
        );
        let insights = insights::derive(&trend, &verdict.label_distribution, &self.config);

        let duration_secs = match (first.timestamp, last.timestamp) {
            (Some(start), Some(end)) => {
                Some(((end - start).num_milliseconds() as f64 / 1000.0).max(0.0))
            }
            _ => None,
        };

        debug!(
            messages = observations.len(),
            average = verdict.average_score,
            trend = %trend.trend,
            key_moments = trend.key_moments.len(),
            "conversation analyzed"
        );

        Ok(ConversationSummary {
            message_count: observations.len(),
            progression: progression(&points),
            verdict,
            trend,
            emotions,
            insights,
            duration_secs,
        })
    }
}

fn progression(points: &[(f64, SentimentLabel)]) -> Vec<ProgressionPoint> {
    let mut running = 0.0_f64;
    points
        .iter()
        .enumerate()
        .map(|(index, &(score, label))| {
            running += score;
            ProgressionPoint {
                index,
                score,
                label,
                cumulative_average: running / (index + 1) as f64,
            }
        })
        .collect()
}
