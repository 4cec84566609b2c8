//! Keyword-heuristic emotion tagger.
//!
//! Maps an utterance to one tag of a fixed seven-word vocabulary. Each
//! non-neutral emotion owns a keyword table; the emotion with the highest
//! match density wins and `neutral` is returned when nothing matches. The
//! message's sentiment score, when known, sharpens the call: clearly positive
//! text boosts joy, clearly negative text boosts anger (or sadness when no
//! anger keyword matched).

use serde::{Deserialize, Serialize};

/// Fixed emotion vocabulary.
///
/// Declaration order is the tie-break order used everywhere in the crate:
/// joy, sadness, anger, fear, surprise, disgust, then neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Joy,
    Sadness,
    Anger,
    Fear,
    Surprise,
    Disgust,
    Neutral,
}

impl Emotion {
    /// Every tag, in tie-break order.
    pub const ALL: [Emotion; 7] = [
        Self::Joy,
        Self::Sadness,
        Self::Anger,
        Self::Fear,
        Self::Surprise,
        Self::Disgust,
        Self::Neutral,
    ];

    /// Non-neutral tags, in tie-break order.
    pub const DETECTABLE: [Emotion; 6] = [
        Self::Joy,
        Self::Sadness,
        Self::Anger,
        Self::Fear,
        Self::Surprise,
        Self::Disgust,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Joy => "joy",
            Self::Sadness => "sadness",
            Self::Anger => "anger",
            Self::Fear => "fear",
            Self::Surprise => "surprise",
            Self::Disgust => "disgust",
            Self::Neutral => "neutral",
        }
    }

    /// Display emoji for terminal and web output.
    pub fn emoji(self) -> &'static str {
        match self {
            Self::Joy => "😊",
            Self::Sadness => "😢",
            Self::Anger => "😠",
            Self::Fear => "😨",
            Self::Surprise => "😲",
            Self::Disgust => "🤢",
            Self::Neutral => "😐",
        }
    }

    fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Joy => &[
                "happy",
                "joy",
                "delighted",
                "excited",
                "thrilled",
                "ecstatic",
                "wonderful",
                "amazing",
                "fantastic",
                "great",
                "love",
                "adore",
            ],
            Self::Sadness => &[
                "sad",
                "depressed",
                "unhappy",
                "miserable",
                "disappointed",
                "upset",
                "down",
                "sorrow",
                "grief",
                "melancholy",
            ],
            Self::Anger => &[
                "angry",
                "mad",
                "furious",
                "rage",
                "annoyed",
                "irritated",
                "frustrated",
                "outraged",
                "livid",
                "hate",
            ],
            Self::Fear => &[
                "afraid",
                "scared",
                "fearful",
                "worried",
                "anxious",
                "nervous",
                "terrified",
                "panic",
                "dread",
                "concerned",
            ],
            Self::Surprise => &[
                "surprised",
                "shocked",
                "amazed",
                "astonished",
                "wow",
                "unexpected",
                "incredible",
                "unbelievable",
            ],
            Self::Disgust => &["disgusted", "revolted", "sickened", "repulsed", "nauseated"],
            Self::Neutral => &[],
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sentiment score beyond which the score reinforces keyword evidence.
const SENTIMENT_BOOST_CUTOFF: f64 = 0.3;
const SENTIMENT_BOOST: f64 = 1.5;

/// Result of tagging one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionReading {
    pub primary: Emotion,
    /// Match density per detected emotion, in vocabulary order.
    pub scores: Vec<(Emotion, f64)>,
    /// Score of the primary emotion, capped at `1.0`; `0.0` for neutral.
    pub confidence: f64,
}

impl EmotionReading {
    fn neutral() -> Self {
        Self {
            primary: Emotion::Neutral,
            scores: Vec::new(),
            confidence: 0.0,
        }
    }
}

/// Capability: tag one utterance with an emotion.
pub trait EmotionTagger: Send + Sync {
    fn tag(&self, text: &str, sentiment_score: Option<f64>) -> EmotionReading;
}

impl<F> EmotionTagger for F
where
    F: Fn(&str, Option<f64>) -> EmotionReading + Send + Sync,
{
    fn tag(&self, text: &str, sentiment_score: Option<f64>) -> EmotionReading {
        self(text, sentiment_score)
    }
}

/// Built-in keyword tagger.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordEmotionTagger;

impl EmotionTagger for KeywordEmotionTagger {
    fn tag(&self, text: &str, sentiment_score: Option<f64>) -> EmotionReading {
        detect(text, sentiment_score)
    }
}

/// Tag the emotion of `text`.
///
/// # Priority
///
/// 1. Keyword density per emotion (`matches / table size`, case-insensitive
///    substring match).
/// 2. Sentiment boost: `score > 0.3` multiplies joy by 1.5; `score < -0.3`
///    multiplies anger by 1.5, or sadness when anger did not match.
/// 3. Highest score wins; ties go to the earlier emotion in [`Emotion::ALL`].
/// 4. Fallback → `neutral` with confidence 0.0.
pub fn detect(text: &str, sentiment_score: Option<f64>) -> EmotionReading {
    if text.trim().is_empty() {
        return EmotionReading::neutral();
    }

    let lower = text.to_lowercase();
    let mut scores: Vec<(Emotion, f64)> = Emotion::DETECTABLE
        .iter()
        .filter_map(|&emotion| {
            let keywords = emotion.keywords();
            let hits = keywords.iter().filter(|kw| lower.contains(*kw)).count();
            (hits > 0).then(|| (emotion, hits as f64 / keywords.len() as f64))
        })
        .collect();

    if let Some(score) = sentiment_score {
        let boost_target = if score > SENTIMENT_BOOST_CUTOFF {
            Some(Emotion::Joy).filter(|e| has(&scores, *e))
        } else if score < -SENTIMENT_BOOST_CUTOFF {
            [Emotion::Anger, Emotion::Sadness]
                .into_iter()
                .find(|e| has(&scores, *e))
        } else {
            None
        };
        if let Some(target) = boost_target {
            for (emotion, value) in &mut scores {
                if *emotion == target {
                    *value *= SENTIMENT_BOOST;
                }
            }
        }
    }

    let mut best: Option<(Emotion, f64)> = None;
    for &(emotion, value) in &scores {
        if best.is_none_or(|(_, top)| value > top) {
            best = Some((emotion, value));
        }
    }

    match best {
        Some((primary, value)) => EmotionReading {
            primary,
            scores,
            confidence: value.min(1.0),
        },
        None => EmotionReading::neutral(),
    }
}

fn has(scores: &[(Emotion, f64)], emotion: Emotion) -> bool {
    scores.iter().any(|(e, _)| *e == emotion)
}

// ── Tests ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    // ── Keyword heuristic ───────────────────────────────────────────────

    #[test]
    fn heuristic_joy() {
        let result = detect("I'm so happy and excited about this!", None);
        assert_eq!(result.primary, Emotion::Joy);
        assert!(result.confidence > 0.0);
    }

    #[test]
    fn heuristic_sadness() {
        let result = detect("I feel sad and really disappointed", None);
        assert_eq!(result.primary, Emotion::Sadness);
    }

    #[test]
    fn heuristic_anger() {
        let result = detect("I'm furious and annoyed with this service", None);
        assert_eq!(result.primary, Emotion::Anger);
    }

    #[test]
    fn heuristic_fear() {
        let result = detect("I'm worried and a bit nervous about tomorrow", None);
        assert_eq!(result.primary, Emotion::Fear);
    }

    #[test]
    fn heuristic_surprise() {
        let result = detect("Wow, that was totally unexpected", None);
        assert_eq!(result.primary, Emotion::Surprise);
    }

    #[test]
    fn heuristic_disgust() {
        let result = detect("Honestly I'm disgusted and repulsed", None);
        assert_eq!(result.primary, Emotion::Disgust);
    }

    // ── Sentiment boost ─────────────────────────────────────────────────

    #[test]
    fn negative_sentiment_boosts_anger_over_sadness() {
        // one sadness hit (1/10) and one anger hit (1/10) tie without a score
        let text = "I'm upset and angry";
        assert_eq!(detect(text, None).primary, Emotion::Sadness);
        let boosted = detect(text, Some(-0.6));
        assert_eq!(boosted.primary, Emotion::Anger);
        assert!((boosted.confidence - 0.15).abs() < 1e-12);
    }

    #[test]
    fn negative_sentiment_boosts_sadness_without_anger() {
        let text = "so sad and scared";
        // sadness 1/10 vs fear 1/10: tie goes to sadness, boost widens the gap
        let boosted = detect(text, Some(-0.5));
        assert_eq!(boosted.primary, Emotion::Sadness);
        assert!(boosted.confidence > 0.1);
    }

    #[test]
    fn positive_sentiment_boosts_joy() {
        let text = "great, love it, wow, unexpected";
        // joy 2/12 < surprise 2/8 on keywords alone
        assert_eq!(detect(text, None).primary, Emotion::Surprise);
        let text = "great, love it, wow";
        // joy 2/12 * 1.5 = 0.25 > surprise 1/8
        assert_eq!(detect(text, Some(0.8)).primary, Emotion::Joy);
    }

    #[test]
    fn mild_sentiment_does_not_boost() {
        let text = "I'm upset and angry";
        assert_eq!(detect(text, Some(-0.2)).primary, Emotion::Sadness);
    }

    // ── Edge cases ──────────────────────────────────────────────────────

    #[test]
    fn empty_text_returns_neutral() {
        let result = detect("", None);
        assert_eq!(result.primary, Emotion::Neutral);
        assert_eq!(result.confidence, 0.0);
        assert!(result.scores.is_empty());
    }

    #[test]
    fn no_keywords_returns_neutral() {
        let result = detect("The package arrives on Tuesday.", Some(0.0));
        assert_eq!(result.primary, Emotion::Neutral);
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn case_insensitive_matching() {
        assert_eq!(detect("THIS IS FANTASTIC", None).primary, Emotion::Joy);
    }

    #[test]
    fn confidence_capped_at_one() {
        let text = "disgusted revolted sickened repulsed nauseated";
        let result = detect(text, None);
        assert_eq!(result.primary, Emotion::Disgust);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn every_detectable_emotion_has_keywords() {
        for emotion in Emotion::DETECTABLE {
            assert!(!emotion.keywords().is_empty(), "keywords for {emotion}");
        }
        assert!(Emotion::Neutral.keywords().is_empty());
    }

    #[test]
    fn vocabulary_order_is_tie_break_order() {
        let mut sorted = Emotion::ALL;
        sorted.sort();
        assert_eq!(sorted, Emotion::ALL);
        assert_eq!(Emotion::ALL.last(), Some(&Emotion::Neutral));
    }

    #[test]
    fn closure_is_a_tagger() {
        let tagger = |_: &str, _: Option<f64>| EmotionReading {
            primary: Emotion::Fear,
            scores: vec![(Emotion::Fear, 1.0)],
            confidence: 1.0,
        };
        assert_eq!(tagger.tag("anything", None).primary, Emotion::Fear);
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&Emotion::Surprise).unwrap();
        assert_eq!(json, "\"surprise\"");
    }
}
