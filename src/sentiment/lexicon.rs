//! Rule-based lexicon scorers.
//!
//! Both backends share one conversational valence table (VADER scale,
//! `-4.0..=4.0`), negation words and intensity boosters. They differ in how
//! matched valences are combined:
//!
//! - [`LexiconScorer`] sums valences and squashes the sum with
//!   `x / sqrt(x² + 15)`, which saturates smoothly towards ±1.
//! - [`PolarityScorer`] averages per-word polarity (`valence / 4`).

use super::{SentimentScore, SentimentScorer, SentimentThresholds};
use std::collections::HashMap;

// ── Tables ──────────────────────────────────────────────────────────────

const VALENCE: &[(&str, f64)] = &[
    // positive
    ("love", 3.2),
    ("loved", 2.9),
    ("loving", 2.9),
    ("adore", 2.9),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("wonderful", 2.7),
    ("great", 3.1),
    ("good", 1.9),
    ("nice", 1.8),
    ("happy", 2.7),
    ("glad", 2.0),
    ("delighted", 2.9),
    ("excited", 2.2),
    ("thrilled", 2.7),
    ("ecstatic", 3.2),
    ("joy", 2.8),
    ("pleased", 1.9),
    ("satisfied", 1.8),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("enjoyable", 1.9),
    ("fun", 2.3),
    ("helpful", 1.8),
    ("thanks", 1.9),
    ("thank", 1.5),
    ("appreciate", 1.7),
    ("perfect", 2.7),
    ("best", 3.2),
    ("better", 1.9),
    ("improved", 2.1),
    ("interesting", 1.7),
    ("engaging", 1.4),
    ("beautiful", 2.9),
    ("brilliant", 2.8),
    ("incredible", 2.5),
    ("like", 1.5),
    ("liked", 1.8),
    ("easy", 1.9),
    ("smooth", 1.2),
    ("calm", 1.3),
    ("friendly", 2.2),
    ("recommend", 1.5),
    ("worth", 0.9),
    ("yes", 1.2),
    ("ok", 0.9),
    ("okay", 0.9),
    ("fine", 0.8),
    ("wow", 2.3),
    // negative
    ("hate", -2.7),
    ("hated", -3.2),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("horrible", -2.5),
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("poor", -2.1),
    ("sad", -2.1),
    ("unhappy", -1.8),
    ("upset", -1.6),
    ("miserable", -2.2),
    ("depressed", -2.3),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("angry", -2.3),
    ("mad", -2.2),
    ("furious", -2.7),
    ("annoyed", -1.6),
    ("annoying", -1.8),
    ("irritated", -1.8),
    ("frustrated", -2.0),
    ("frustrating", -1.9),
    ("afraid", -2.0),
    ("scared", -2.2),
    ("worried", -1.2),
    ("anxious", -1.0),
    ("nervous", -1.2),
    ("terrified", -3.0),
    ("disgusted", -2.4),
    ("disgusting", -2.4),
    ("sick", -2.3),
    ("broken", -1.9),
    ("useless", -1.8),
    ("waste", -1.8),
    ("problem", -1.7),
    ("issue", -0.9),
    ("fail", -2.3),
    ("failed", -2.3),
    ("wrong", -2.1),
    ("slow", -1.0),
    ("rude", -2.0),
    ("boring", -1.3),
    ("stupid", -2.4),
    ("rubbish", -1.9),
    ("nonsense", -1.7),
    ("ridiculous", -1.5),
    ("pathetic", -2.3),
    ("sorry", -0.3),
    ("no", -1.2),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "nowhere", "cannot",
    "can't", "cant", "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "isn't", "isnt",
    "aren't", "arent", "wasn't", "wasnt", "weren't", "werent", "won't", "wont", "wouldn't",
    "wouldnt", "shouldn't", "shouldnt", "couldn't", "couldnt", "hardly", "barely", "rarely",
];

/// Booster increments on the valence scale; negative values dampen.
const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", 0.293),
    ("completely", 0.293),
    ("extremely", 0.293),
    ("incredibly", 0.293),
    ("really", 0.293),
    ("so", 0.293),
    ("super", 0.293),
    ("totally", 0.293),
    ("very", 0.293),
    ("highly", 0.293),
    ("quite", 0.293),
    ("barely", -0.293),
    ("kind", -0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
    ("little", -0.293),
    ("marginally", -0.293),
];

const NEGATION_SCALAR: f64 = -0.74;
const NORMALIZATION_ALPHA: f64 = 15.0;
const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
/// How many preceding tokens a negation or booster reaches.
const MODIFIER_WINDOW: usize = 3;
const BOOSTER_DECAY: [f64; MODIFIER_WINDOW] = [1.0, 0.95, 0.9];

// ── Shared vocabulary ───────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Vocabulary {
    valence: HashMap<&'static str, f64>,
    boosters: HashMap<&'static str, f64>,
}

impl Vocabulary {
    fn new() -> Self {
        Self {
            valence: VALENCE.iter().copied().collect(),
            boosters: BOOSTERS.iter().copied().collect(),
        }
    }

    fn valence(&self, token: &str) -> Option<f64> {
        self.valence.get(token).copied()
    }

    fn booster(&self, token: &str) -> Option<f64> {
        self.boosters.get(token).copied()
    }
}

fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token) || token.ends_with("n't")
}

fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Preceding tokens inside the modifier window, nearest first.
fn preceding(tokens: &[String], i: usize) -> impl Iterator<Item = &String> {
    tokens[i.saturating_sub(MODIFIER_WINDOW)..i].iter().rev()
}

// ── Compound scorer ─────────────────────────────────────────────────────

/// VADER-style compound scorer.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    vocabulary: Vocabulary,
    thresholds: SentimentThresholds,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new(SentimentThresholds::COMPOUND)
    }
}

impl LexiconScorer {
    pub fn new(thresholds: SentimentThresholds) -> Self {
        Self {
            vocabulary: Vocabulary::new(),
            thresholds,
        }
    }

    /// Normalised compound score in `(-1, 1)`.
    pub fn compound(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut sum = 0.0_f64;

        for (i, token) in tokens.iter().enumerate() {
            let Some(mut valence) = self.vocabulary.valence(token) else {
                continue;
            };

            for (distance, prev) in preceding(&tokens, i).enumerate() {
                if let Some(boost) = self.vocabulary.booster(prev) {
                    let scalar = boost * BOOSTER_DECAY[distance];
                    valence += if valence > 0.0 { scalar } else { -scalar };
                }
            }
            if preceding(&tokens, i).any(|t| is_negation(t)) {
                valence *= NEGATION_SCALAR;
            }
            sum += valence;
        }

        if sum == 0.0 {
            return 0.0;
        }

        let bangs = text.matches('!').count().min(MAX_EXCLAMATIONS) as f64;
        sum += sum.signum() * bangs * EXCLAMATION_BOOST;

        sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> SentimentScore {
        SentimentScore::from_score(self.compound(text), &self.thresholds)
    }
}

// ── Polarity scorer ─────────────────────────────────────────────────────

/// TextBlob-style mean polarity scorer.
#[derive(Debug, Clone)]
pub struct PolarityScorer {
    vocabulary: Vocabulary,
    thresholds: SentimentThresholds,
}

impl Default for PolarityScorer {
    fn default() -> Self {
        Self::new(SentimentThresholds::POLARITY)
    }
}

impl PolarityScorer {
    pub fn new(thresholds: SentimentThresholds) -> Self {
        Self {
            vocabulary: Vocabulary::new(),
            thresholds,
        }
    }

    /// Mean polarity of matched words, clamped to `[-1, 1]`.
    pub fn polarity(&self, text: &str) -> f64 {
        let tokens = tokenize(text);
        let mut matched = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(valence) = self.vocabulary.valence(token) else {
                continue;
            };
            let mut polarity = valence / 4.0;

            if let Some(prev) = i.checked_sub(1).map(|p| &tokens[p])
                && let Some(boost) = self.vocabulary.booster(prev)
            {
                polarity *= 1.0 + boost;
            }
            if preceding(&tokens, i).take(2).any(|t| is_negation(t)) {
                polarity *= -0.5;
            }
            matched.push(polarity);
        }

        if matched.is_empty() {
            return 0.0;
        }
        let mean = matched.iter().sum::<f64>() / matched.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

impl SentimentScorer for PolarityScorer {
    fn score(&self, text: &str) -> SentimentScore {
        SentimentScore::from_score(self.polarity(text), &self.thresholds)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::sentiment::SentimentLabel;

    #[test]
    fn tokenize_strips_punctuation_and_lowercases() {
        assert_eq!(tokenize("Great, REALLY great!"), vec!["great", "really", "great"]);
        assert_eq!(tokenize("don't... stop"), vec!["don't", "stop"]);
    }

    #[test]
    fn compound_positive_text() {
        let scorer = LexiconScorer::default();
        let result = scorer.score("I love this, it is wonderful");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.score > 0.5);
    }

    #[test]
    fn compound_negative_text() {
        let scorer = LexiconScorer::default();
        let result = scorer.score("This is terrible and I hate it");
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!(result.score < -0.5);
    }

    #[test]
    fn compound_no_sentiment_words_is_zero() {
        let scorer = LexiconScorer::default();
        let result = scorer.score("The meeting is at noon");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    #[test]
    fn compound_negation_flips_sign() {
        let scorer = LexiconScorer::default();
        assert!(scorer.compound("this is good") > 0.0);
        assert!(scorer.compound("this is not good") < 0.0);
    }

    #[test]
    fn compound_booster_increases_magnitude() {
        let scorer = LexiconScorer::default();
        assert!(scorer.compound("it was very good") > scorer.compound("it was good"));
        assert!(scorer.compound("it was slightly good") < scorer.compound("it was good"));
    }

    #[test]
    fn compound_exclamations_add_emphasis() {
        let scorer = LexiconScorer::default();
        assert!(scorer.compound("great!!!") > scorer.compound("great"));
    }

    #[test]
    fn compound_stays_in_range() {
        let scorer = LexiconScorer::default();
        let gushing = "love love love amazing awesome best perfect great wonderful!!!!!!";
        let score = scorer.compound(gushing);
        assert!(score > 0.9 && score < 1.0);
        let raging = "hate hate worst terrible horrible awful disgusting pathetic!!!!";
        let score = scorer.compound(raging);
        assert!(score < -0.9 && score > -1.0);
    }

    #[test]
    fn polarity_is_mean_of_matches() {
        let scorer = PolarityScorer::default();
        // good = 1.9 / 4, bad = -2.5 / 4
        let expected = (1.9 / 4.0 + -2.5 / 4.0) / 2.0;
        assert!((scorer.polarity("good and bad") - expected).abs() < 1e-12);
    }

    #[test]
    fn polarity_negation_halves_and_flips() {
        let scorer = PolarityScorer::default();
        let plain = scorer.polarity("good");
        let negated = scorer.polarity("not good");
        assert!((negated - plain * -0.5).abs() < 1e-12);
    }

    #[test]
    fn polarity_uses_wider_neutral_band() {
        let scorer = PolarityScorer::default();
        // fine = 0.8 / 4 = 0.2, sorry = -0.3 / 4 = -0.075
        assert_eq!(scorer.score("fine").label, SentimentLabel::Positive);
        let mild = scorer.score("sorry");
        assert!(mild.score.abs() < 0.1);
        assert_eq!(mild.label, SentimentLabel::Neutral);
    }
}
