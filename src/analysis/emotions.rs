//! Emotion tag counts over a conversation.

use crate::emotion::Emotion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Occurrence count for every emotion tag, including those never seen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionDistribution {
    pub counts: BTreeMap<Emotion, usize>,
    pub dominant: Emotion,
    /// Mean tagger confidence per observed emotion. Emotions whose tags
    /// carried no confidence are absent.
    #[serde(default)]
    pub average_confidence: BTreeMap<Emotion, f64>,
    /// Number of distinct tags seen at least once.
    #[serde(default)]
    pub emotions_detected: usize,
}

impl EmotionDistribution {
    /// Count tags and pick the dominant one.
    ///
    /// A real emotion wins ties against `neutral`; `neutral` is dominant only
    /// when it outnumbers every real emotion. Ties among real emotions go to
    /// the earlier tag in [`Emotion::ALL`].
    pub fn from_tags(tags: impl IntoIterator<Item = Emotion>) -> Self {
        Self::from_readings(tags.into_iter().map(|tag| (tag, None)))
    }

    /// Like [`from_tags`](Self::from_tags), also averaging the confidence
    /// attached to each tag.
    pub fn from_readings(readings: impl IntoIterator<Item = (Emotion, Option<f64>)>) -> Self {
        let mut counts: BTreeMap<Emotion, usize> = Emotion::ALL.iter().map(|&e| (e, 0)).collect();
        let mut confidence: BTreeMap<Emotion, (f64, usize)> = BTreeMap::new();
        for (tag, value) in readings {
            *counts.entry(tag).or_insert(0) += 1;
            if let Some(value) = value {
                let (sum, n) = confidence.entry(tag).or_insert((0.0, 0));
                *sum += value;
                *n += 1;
            }
        }
        let average_confidence = confidence
            .into_iter()
            .map(|(tag, (sum, n))| (tag, sum / n as f64))
            .collect();
        let emotions_detected = counts.values().filter(|&&c| c > 0).count();

        let mut best: Option<(Emotion, usize)> = None;
        for emotion in Emotion::DETECTABLE {
            let count = counts.get(&emotion).copied().unwrap_or(0);
            if count > 0 && best.is_none_or(|(_, top)| count > top) {
                best = Some((emotion, count));
            }
        }

        let neutral = counts.get(&Emotion::Neutral).copied().unwrap_or(0);
        let dominant = match best {
            Some((emotion, count)) if count >= neutral => emotion,
            _ => Emotion::Neutral,
        };

        Self {
            counts,
            dominant,
            average_confidence,
            emotions_detected,
        }
    }

    pub fn count(&self, emotion: Emotion) -> usize {
        self.counts.get(&emotion).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Tags with a non-zero count, most frequent first (ties in vocabulary order).
    pub fn ranked(&self) -> Vec<(Emotion, usize)> {
        let mut ranked: Vec<(Emotion, usize)> = self
            .counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(&e, &c)| (e, c))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}
