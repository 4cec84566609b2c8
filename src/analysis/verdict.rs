//! Overall conversation verdict: mean score, label counts and dominance.

use super::SentimentObservation;
use crate::sentiment::{SentimentLabel, SentimentThresholds};
use serde::{Deserialize, Serialize};

/// Number of observations per sentiment label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

impl LabelDistribution {
    pub fn from_labels(labels: impl IntoIterator<Item = SentimentLabel>) -> Self {
        let mut dist = Self::default();
        for label in labels {
            match label {
                SentimentLabel::Positive => dist.positive += 1,
                SentimentLabel::Negative => dist.negative += 1,
                SentimentLabel::Neutral => dist.neutral += 1,
            }
        }
        dist
    }

    pub fn count(&self, label: SentimentLabel) -> usize {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral
    }

    /// Which label leads the counts, and by how much.
    pub fn dominance(&self) -> Dominance {
        let total = self.total();
        let max = SentimentLabel::ALL
            .iter()
            .map(|&label| self.count(label))
            .max()
            .unwrap_or(0);
        let leaders: Vec<SentimentLabel> = SentimentLabel::ALL
            .into_iter()
            .filter(|&label| self.count(label) == max)
            .collect();

        match leaders.as_slice() {
            [label] if max * 2 > total => Dominance::Majority {
                label: *label,
                count: max,
            },
            [label] => Dominance::Plurality {
                label: *label,
                count: max,
            },
            _ => Dominance::Tie {
                labels: leaders,
                count: max,
            },
        }
    }
}

/// How strongly one label leads the distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Dominance {
    /// One label holds more than half of all messages.
    Majority { label: SentimentLabel, count: usize },
    /// One label leads but holds at most half.
    Plurality { label: SentimentLabel, count: usize },
    /// Two or more labels share the highest count.
    Tie {
        labels: Vec<SentimentLabel>,
        count: usize,
    },
}

impl Dominance {
    /// The single leading label, if there is one.
    pub fn leader(&self) -> Option<SentimentLabel> {
        match self {
            Self::Majority { label, .. } | Self::Plurality { label, .. } => Some(*label),
            Self::Tie { .. } => None,
        }
    }

    /// Whether `label` is (one of) the most frequent labels.
    pub fn includes(&self, label: SentimentLabel) -> bool {
        match self {
            Self::Majority { label: l, .. } | Self::Plurality { label: l, .. } => *l == label,
            Self::Tie { labels, .. } => labels.contains(&label),
        }
    }
}

/// Conversation-level sentiment verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallVerdict {
    /// Arithmetic mean of all scores.
    pub average_score: f64,
    /// `average_score` classified with the per-message thresholds.
    pub label: SentimentLabel,
    pub label_distribution: LabelDistribution,
    pub dominance: Dominance,
}

impl OverallVerdict {
    /// True when the average-score label is not a most-frequent label.
    pub fn disagrees_with_counts(&self) -> bool {
        !self.dominance.includes(self.label)
    }
}

/// Mean of `scores`, kept inside `[min, max]` of the input.
pub(crate) fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let sum: f64 = scores.iter().sum();
    let avg = sum / scores.len() as f64;
    let (lo, hi) = scores
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| {
            (lo.min(s), hi.max(s))
        });
    avg.clamp(lo, hi)
}

pub(crate) fn compute(
    observations: &[SentimentObservation],
    thresholds: &SentimentThresholds,
) -> OverallVerdict {
    let scores: Vec<f64> = observations.iter().map(|o| o.score()).collect();
    let average_score = mean(&scores);
    let label_distribution = LabelDistribution::from_labels(observations.iter().map(|o| o.label()));
    OverallVerdict {
        average_score,
        label: thresholds.classify(average_score),
        dominance: label_distribution.dominance(),
        label_distribution,
    }
}
