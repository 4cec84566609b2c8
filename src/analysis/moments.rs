//! Key-moment detection: large jumps between neighbours and extreme scores.

use crate::sentiment::SentimentLabel;
use serde::{Deserialize, Serialize};

/// Which way a significant shift moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftDirection {
    Positive,
    Negative,
}

/// Why a message was flagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KeyMomentKind {
    /// `|score[i] - score[i-1]|` exceeded the shift threshold.
    SignificantShift {
        direction: ShiftDirection,
        magnitude: f64,
        from_score: f64,
        to_score: f64,
        from_label: SentimentLabel,
        to_label: SentimentLabel,
    },
    /// `|score[i]|` exceeded the extreme threshold.
    Extreme { score: f64, label: SentimentLabel },
}

/// A flagged message, identified by its 0-based position in the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMoment {
    pub index: usize,
    #[serde(flatten)]
    pub kind: KeyMomentKind,
}

impl KeyMoment {
    pub fn is_shift(&self) -> bool {
        matches!(self.kind, KeyMomentKind::SignificantShift { .. })
    }

    pub fn is_extreme(&self) -> bool {
        matches!(self.kind, KeyMomentKind::Extreme { .. })
    }
}

/// Flag every index in order. When one index is both a shift and an
/// extreme, the shift entry comes first and both are kept.
pub(crate) fn detect(
    points: &[(f64, SentimentLabel)],
    shift_threshold: f64,
    extreme_threshold: f64,
) -> Vec<KeyMoment> {
    let mut moments = Vec::new();

    for (index, &(score, label)) in points.iter().enumerate() {
        if let Some(&(prev_score, prev_label)) = index.checked_sub(1).and_then(|i| points.get(i)) {
            let magnitude = (score - prev_score).abs();
            if magnitude > shift_threshold {
                let direction = if score > prev_score {
                    ShiftDirection::Positive
                } else {
                    ShiftDirection::Negative
                };
                moments.push(KeyMoment {
                    index,
                    kind: KeyMomentKind::SignificantShift {
                        direction,
                        magnitude,
                        from_score: prev_score,
                        to_score: score,
                        from_label: prev_label,
                        to_label: label,
                    },
                });
            }
        }

        if score.abs() > extreme_threshold {
            moments.push(KeyMoment {
                index,
                kind: KeyMomentKind::Extreme { score, label },
            });
        }
    }

    moments
}
