//! Text rendering of analysis facts.
//!
//! The analysis module produces structured values only; everything a person
//! reads (reasoning sentences, trend narratives, insight lines, the plain-text
//! report file) is produced here.

use crate::analysis::{
    ConversationSummary, Dominance, EmotionDistribution, Insight, KeyMoment, KeyMomentKind,
    OverallVerdict, ShiftDirection, Trend, TrendResult,
};
use crate::conversation::Conversation;
use crate::sentiment::SentimentLabel;
use crate::text::format_duration;
use serde::Serialize;
use std::fmt;

/// Half averages below this read as "started negative" / "ended negative".
const NEGATIVE_HALF: f64 = -0.1;
const RULE_WIDTH: usize = 60;

// ── Verdict ─────────────────────────────────────────────────────────────

fn lower(label: SentimentLabel) -> String {
    label.as_str().to_lowercase()
}

fn join_labels(labels: &[SentimentLabel]) -> String {
    let names: Vec<String> = labels.iter().map(|&l| lower(l)).collect();
    match names.as_slice() {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} and {last}", init.join(", ")),
    }
}

/// One-paragraph explanation of the overall verdict.
///
/// The branch follows the label dominance (majority, plurality or tie); a
/// closing sentence is added when the average-score label differs from the
/// most frequent label.
pub fn reasoning(verdict: &OverallVerdict) -> String {
    let dist = &verdict.label_distribution;
    let total = dist.total();
    let breakdown = format!(
        "Distribution: {} positive, {} negative, {} neutral messages.",
        dist.positive, dist.negative, dist.neutral
    );

    let mut text = match &verdict.dominance {
        Dominance::Majority {
            label: SentimentLabel::Positive,
            count,
        } => format!(
            "Generally positive conversation with {count}/{total} positive messages. \
             User expressed satisfaction or positive feedback."
        ),
        Dominance::Majority {
            label: SentimentLabel::Negative,
            count,
        } => format!(
            "Generally negative conversation with {count}/{total} negative messages. \
             User expressed dissatisfaction or concerns."
        ),
        Dominance::Majority {
            label: SentimentLabel::Neutral,
            ..
        } => format!("Neutral conversation with balanced sentiment. {breakdown}"),
        Dominance::Plurality { label, count } => {
            let l = lower(*label);
            format!(
                "Mostly {l} conversation with {count}/{total} {l} messages, short of a majority. {breakdown}"
            )
        }
        Dominance::Tie { labels, count } => format!(
            "Mixed conversation: {} messages are tied at {count} each. {breakdown}",
            join_labels(labels)
        ),
    };

    if verdict.disagrees_with_counts() {
        text.push_str(&format!(
            " Overall tone is {} (average score {:+.3}).",
            lower(verdict.label),
            verdict.average_score
        ));
    }
    text
}

// ── Trend ───────────────────────────────────────────────────────────────

/// Narrative for the half-over-half comparison.
pub fn trend_description(trend: &TrendResult) -> String {
    let (Some(first), Some(second)) = (trend.first_half_avg, trend.second_half_avg) else {
        return "Not enough messages to analyze trend".to_owned();
    };
    match trend.trend {
        Trend::Improving if first < NEGATIVE_HALF => format!(
            "Started negative → Shifted positive (improved from {first:.2} to {second:.2})"
        ),
        Trend::Improving => format!(
            "Became increasingly positive (improved from {first:.2} to {second:.2})"
        ),
        Trend::Declining if second < NEGATIVE_HALF => format!(
            "Started positive/neutral → Shifted negative (declined from {first:.2} to {second:.2})"
        ),
        Trend::Declining => {
            format!("Became less positive (declined from {first:.2} to {second:.2})")
        }
        Trend::Stable => format!("Remained relatively stable (around {first:.2})"),
        Trend::InsufficientData => "Not enough messages to analyze trend".to_owned(),
    }
}

/// Short line describing one flagged message (1-based message number).
pub fn key_moment_line(moment: &KeyMoment) -> String {
    let number = moment.index + 1;
    match &moment.kind {
        KeyMomentKind::SignificantShift {
            direction,
            magnitude,
            from_score,
            to_score,
            ..
        } => {
            let dir = match direction {
                ShiftDirection::Positive => "positive",
                ShiftDirection::Negative => "negative",
            };
            format!(
                "Message {number}: {dir} shift of {magnitude:.2} ({from_score:+.2} → {to_score:+.2})"
            )
        }
        KeyMomentKind::Extreme { score, label } => {
            format!("Message {number}: extreme {} sentiment ({score:+.2})", lower(*label))
        }
    }
}

// ── Insights ────────────────────────────────────────────────────────────

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MoodImproved => f.write_str("Conversation mood improved over time"),
            Self::MoodDeclined => f.write_str("Conversation mood declined over time"),
            Self::MoodStable => f.write_str("Sentiment remained relatively consistent"),
            Self::SignificantShifts { count } => {
                write!(f, "Detected {count} significant sentiment shift(s)")
            }
            Self::ExtremeMoments { count } => {
                write!(f, "Detected {count} extreme sentiment moment(s)")
            }
            Self::PredominantlyPositive { count, total } => {
                write!(f, "Predominantly positive messages ({count}/{total})")
            }
            Self::PredominantlyNegative { count, total } => {
                write!(f, "Predominantly negative messages ({count}/{total})")
            }
            Self::BalancedMix => f.write_str("Balanced mix of positive and negative messages"),
            Self::HighVolatility { .. } => {
                f.write_str("High sentiment volatility - mood changed frequently")
            }
            Self::LowVolatility { .. } => {
                f.write_str("Low sentiment volatility - consistent emotional tone")
            }
        }
    }
}

// ── Emotions ────────────────────────────────────────────────────────────

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"Joy: 2, Anger: 1"`: non-zero counts, most frequent first.
pub fn emotion_breakdown(emotions: &EmotionDistribution) -> String {
    emotions
        .ranked()
        .iter()
        .map(|(emotion, count)| format!("{}: {count}", title_case(emotion.as_str())))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `"Joy: 0.42, Fear: 0.10"`: mean tagger confidence, in the order of
/// [`emotion_breakdown`]. Empty when no tag carried a confidence.
pub fn emotion_confidence(emotions: &EmotionDistribution) -> String {
    emotions
        .ranked()
        .iter()
        .filter_map(|(emotion, _)| {
            emotions
                .average_confidence
                .get(emotion)
                .map(|avg| format!("{}: {avg:.2}", title_case(emotion.as_str())))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// `"Joy 😊"`.
pub fn dominant_emotion(emotions: &EmotionDistribution) -> String {
    format!(
        "{} {}",
        title_case(emotions.dominant.as_str()),
        emotions.dominant.emoji()
    )
}

// ── Structured output ───────────────────────────────────────────────────

/// Summary plus its rendered sentences, for JSON consumers.
#[derive(Debug, Serialize)]
pub struct RenderedSummary<'a> {
    #[serde(flatten)]
    pub summary: &'a ConversationSummary,
    pub reasoning: String,
    pub trend_description: String,
    pub insight_text: Vec<String>,
}

impl<'a> RenderedSummary<'a> {
    pub fn new(summary: &'a ConversationSummary) -> Self {
        Self {
            summary,
            reasoning: reasoning(&summary.verdict),
            trend_description: trend_description(&summary.trend),
            insight_text: summary.insights.iter().map(ToString::to_string).collect(),
        }
    }
}

// ── Report file ─────────────────────────────────────────────────────────

/// Full plain-text report: header, overall verdict, trend, then every
/// logged message.
pub fn text_report(conversation: &Conversation, summary: Option<&ConversationSummary>) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("{heavy}\nCONVERSATION SENTIMENT ANALYSIS REPORT\n{heavy}\n\n"));

    out.push_str(&format!("Conversation ID: {}\n", conversation.id()));
    out.push_str(&format!(
        "Start Time: {}\n",
        conversation.started_at().to_rfc3339()
    ));
    let end_time = conversation
        .ended_at()
        .map_or_else(|| "N/A".to_owned(), |t| t.to_rfc3339());
    out.push_str(&format!("End Time: {end_time}\n"));
    out.push_str(&format!(
        "Duration: {}\n",
        format_duration(conversation.duration_secs())
    ));
    out.push_str(&format!(
        "Total Messages: {}\n\n",
        conversation.messages().len()
    ));

    if let Some(summary) = summary {
        let verdict = &summary.verdict;
        out.push_str(&format!("OVERALL SENTIMENT ANALYSIS\n{light}\n"));
        out.push_str(&format!("Overall Sentiment: {}\n", verdict.label));
        out.push_str(&format!("Average Score: {:.3}\n", verdict.average_score));
        out.push_str(&format!("Reasoning: {}\n\n", reasoning(verdict)));

        let trend = &summary.trend;
        out.push_str(&format!("TREND ANALYSIS\n{light}\n"));
        out.push_str(&format!("Trend: {}\n", trend.trend));
        out.push_str(&format!("Description: {}\n", trend_description(trend)));
        out.push_str(&format!("Volatility: {:.3}\n", trend.volatility));
        for moment in &trend.key_moments {
            out.push_str(&format!("  * {}\n", key_moment_line(moment)));
        }
        out.push('\n');

        let emotions = &summary.emotions;
        out.push_str(&format!("EMOTION ANALYSIS\n{light}\n"));
        out.push_str(&format!("Dominant Emotion: {}\n", dominant_emotion(emotions)));
        out.push_str(&format!("Distribution: {}\n", emotion_breakdown(emotions)));
        let confidence = emotion_confidence(emotions);
        if !confidence.is_empty() {
            out.push_str(&format!("Average Confidence: {confidence}\n"));
        }
        out.push('\n');

        if !summary.insights.is_empty() {
            out.push_str(&format!("KEY INSIGHTS\n{light}\n"));
            for insight in &summary.insights {
                out.push_str(&format!("- {insight}\n"));
            }
            out.push('\n');
        }
    }

    out.push_str(&format!("MESSAGE DETAILS\n{light}\n"));
    for (i, message) in conversation.messages().iter().enumerate() {
        out.push_str(&format!(
            "\n[{}] {}: {}\n",
            i + 1,
            message.role.as_str().to_uppercase(),
            message.text
        ));
        if let Some(sentiment) = &message.sentiment {
            out.push_str(&format!(
                "    Sentiment: {} ({:+.3})\n",
                sentiment.label, sentiment.score
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::analysis::{LabelDistribution, SentimentObservation};
    use crate::analysis::ConversationAnalyzer;
    use crate::emotion::Emotion;
    use crate::sentiment::{SentimentScore, SentimentThresholds};
    use chrono::{DateTime, Utc};

    fn verdict(average: f64, label: SentimentLabel, p: usize, n: usize, u: usize) -> OverallVerdict {
        let label_distribution = LabelDistribution {
            positive: p,
            negative: n,
            neutral: u,
        };
        OverallVerdict {
            average_score: average,
            label,
            dominance: label_distribution.dominance(),
            label_distribution,
        }
    }

    fn trend(kind: Trend, first: Option<f64>, second: Option<f64>) -> TrendResult {
        TrendResult {
            trend: kind,
            first_half_avg: first,
            second_half_avg: second,
            delta: first.zip(second).map(|(a, b)| b - a),
            volatility: 0.0,
            key_moments: Vec::new(),
        }
    }

    // ── Reasoning branches ──────────────────────────────────────────────

    #[test]
    fn majority_negative_reasoning() {
        let text = reasoning(&verdict(-0.33, SentimentLabel::Negative, 1, 2, 0));
        assert!(text.starts_with("Generally negative conversation with 2/3"));
        assert!(!text.contains("Overall tone"));
    }

    #[test]
    fn plurality_reasoning_mentions_short_of_majority() {
        let text = reasoning(&verdict(0.2, SentimentLabel::Positive, 2, 1, 1));
        assert!(text.starts_with("Mostly positive conversation with 2/4"));
    }

    #[test]
    fn tie_reasoning_names_tied_labels() {
        let text = reasoning(&verdict(0.0, SentimentLabel::Neutral, 2, 2, 0));
        assert!(text.contains("positive and negative messages are tied at 2"));
        assert!(text.contains("Overall tone is neutral"));
    }

    #[test]
    fn disagreement_is_noted() {
        let text = reasoning(&verdict(0.077, SentimentLabel::Positive, 2, 1, 0));
        assert!(!text.contains("Overall tone"));
        let text = reasoning(&verdict(-0.333, SentimentLabel::Negative, 2, 1, 0));
        assert!(text.ends_with("Overall tone is negative (average score -0.333)."));
    }

    // ── Trend narratives ────────────────────────────────────────────────

    #[test]
    fn trend_narratives() {
        assert_eq!(
            trend_description(&trend(Trend::Declining, Some(0.44), Some(-0.105))),
            "Started positive/neutral → Shifted negative (declined from 0.44 to -0.10)"
        );
        assert_eq!(
            trend_description(&trend(Trend::Improving, Some(-0.5), Some(0.4))),
            "Started negative → Shifted positive (improved from -0.50 to 0.40)"
        );
        assert_eq!(
            trend_description(&trend(Trend::Improving, Some(0.1), Some(0.4))),
            "Became increasingly positive (improved from 0.10 to 0.40)"
        );
        assert_eq!(
            trend_description(&trend(Trend::Stable, Some(0.25), Some(0.25))),
            "Remained relatively stable (around 0.25)"
        );
        assert_eq!(
            trend_description(&trend(Trend::InsufficientData, None, None)),
            "Not enough messages to analyze trend"
        );
    }

    #[test]
    fn insight_text() {
        assert_eq!(
            Insight::SignificantShifts { count: 2 }.to_string(),
            "Detected 2 significant sentiment shift(s)"
        );
        assert_eq!(
            Insight::PredominantlyNegative { count: 2, total: 3 }.to_string(),
            "Predominantly negative messages (2/3)"
        );
    }

    #[test]
    fn emotion_lines() {
        let dist = EmotionDistribution::from_tags([Emotion::Joy, Emotion::Neutral, Emotion::Joy]);
        assert_eq!(emotion_breakdown(&dist), "Joy: 2, Neutral: 1");
        assert_eq!(dominant_emotion(&dist), "Joy 😊");
    }

    #[test]
    fn key_moment_lines_are_one_based() {
        let moment = KeyMoment {
            index: 0,
            kind: KeyMomentKind::Extreme {
                score: -0.84,
                label: SentimentLabel::Negative,
            },
        };
        assert_eq!(
            key_moment_line(&moment),
            "Message 1: extreme negative sentiment (-0.84)"
        );
    }

    // ── Report file ─────────────────────────────────────────────────────

    #[test]
    fn text_report_sections() {
        let mut conversation = Conversation::with_id("report-test");
        conversation.push_user(
            "I love it",
            SentimentScore::from_score(0.6, &SentimentThresholds::COMPOUND),
            Some(Emotion::Joy),
        );
        conversation.push_bot("Great to hear!");
        conversation.end();

        let obs = vec![
            SentimentObservation::new(0, 0.6, SentimentLabel::Positive, Emotion::Joy, Utc::now())
                .unwrap(),
        ];
        let summary = ConversationAnalyzer::default().analyze(&obs).unwrap();
        let report = text_report(&conversation, Some(&summary));

        assert!(report.contains("CONVERSATION SENTIMENT ANALYSIS REPORT"));
        assert!(report.contains("Conversation ID: report-test"));
        assert!(report.contains("OVERALL SENTIMENT ANALYSIS"));
        assert!(report.contains("Average Score: 0.600"));
        assert!(report.contains("Trend: insufficient_data"));
        assert!(report.contains("[1] USER: I love it"));
        assert!(report.contains("    Sentiment: Positive (+0.600)"));
        assert!(report.contains("[2] BOT: Great to hear!"));
    }

    #[test]
    fn text_report_layout_and_emotion_section() {
        let mut conversation = Conversation::with_id("layout");
        conversation.push_user(
            "so happy",
            SentimentScore::from_score(0.5, &SentimentThresholds::COMPOUND),
            Some(Emotion::Joy),
        );
        let observation = SentimentObservation::new(
            0,
            0.5,
            SentimentLabel::Positive,
            Emotion::Joy,
            None::<DateTime<Utc>>,
        )
        .unwrap()
        .with_emotion_confidence(0.4);
        let obs = vec![observation];
        let summary = ConversationAnalyzer::default().analyze(&obs).unwrap();
        let report = text_report(&conversation, Some(&summary));

        let rule = "=".repeat(RULE_WIDTH);
        let mut lines = report.lines();
        assert_eq!(lines.next(), Some(rule.as_str()));
        assert_eq!(lines.next(), Some("CONVERSATION SENTIMENT ANALYSIS REPORT"));
        assert_eq!(lines.next(), Some(rule.as_str()));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("Conversation ID: layout"));
        assert!(report.contains("End Time: N/A\n"));
        assert!(report.contains("EMOTION ANALYSIS\n"));
        assert!(report.contains("Dominant Emotion: Joy 😊\n"));
        assert!(report.contains("Average Confidence: Joy: 0.40\n"));
        assert!(report.ends_with("    Sentiment: Positive (+0.500)\n"));
    }

    #[test]
    fn report_without_summary_lists_messages_only() {
        let mut conversation = Conversation::with_id("bare");
        conversation.push_bot("Hello!");
        let report = text_report(&conversation, None);
        assert!(!report.contains("OVERALL SENTIMENT ANALYSIS"));
        assert!(!report.contains("EMOTION ANALYSIS"));
        assert!(report.ends_with("[1] BOT: Hello!\n"));
    }

    #[test]
    fn rendered_summary_flattens_facts() {
        let obs = vec![
            SentimentObservation::new(0, -0.4, SentimentLabel::Negative, Emotion::Anger, Utc::now())
                .unwrap(),
        ];
        let summary = ConversationAnalyzer::default().analyze(&obs).unwrap();
        let json = serde_json::to_value(RenderedSummary::new(&summary)).unwrap();
        assert_eq!(json["message_count"], 1);
        assert_eq!(json["trend"]["trend"], "insufficient_data");
        assert_eq!(json["trend_description"], "Not enough messages to analyze trend");
        assert!(json["reasoning"].as_str().unwrap().contains("negative"));
    }
}
