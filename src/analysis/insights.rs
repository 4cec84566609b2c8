//! Structured insights derived from the trend, flags and label counts.
//!
//! Text rendering lives in [`crate::report`].

use super::{AnalysisConfig, LabelDistribution, Trend, TrendResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    MoodImproved,
    MoodDeclined,
    MoodStable,
    SignificantShifts { count: usize },
    ExtremeMoments { count: usize },
    PredominantlyPositive { count: usize, total: usize },
    PredominantlyNegative { count: usize, total: usize },
    BalancedMix,
    HighVolatility { volatility: f64 },
    LowVolatility { volatility: f64 },
}

/// Insights in reporting order: trend, shifts, extremes, distribution,
/// volatility. Trend and volatility insights need at least two messages.
pub(crate) fn derive(
    trend: &TrendResult,
    distribution: &LabelDistribution,
    config: &AnalysisConfig,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    match trend.trend {
        Trend::Improving => insights.push(Insight::MoodImproved),
        Trend::Declining => insights.push(Insight::MoodDeclined),
        Trend::Stable => insights.push(Insight::MoodStable),
        Trend::InsufficientData => {}
    }

    let shifts = trend.key_moments.iter().filter(|m| m.is_shift()).count();
    if shifts > 0 {
        insights.push(Insight::SignificantShifts { count: shifts });
    }
    let extremes = trend.key_moments.iter().filter(|m| m.is_extreme()).count();
    if extremes > 0 {
        insights.push(Insight::ExtremeMoments { count: extremes });
    }

    let total = distribution.total();
    insights.push(if distribution.positive > distribution.negative {
        Insight::PredominantlyPositive {
            count: distribution.positive,
            total,
        }
    } else if distribution.negative > distribution.positive {
        Insight::PredominantlyNegative {
            count: distribution.negative,
            total,
        }
    } else {
        Insight::BalancedMix
    });

    if trend.trend != Trend::InsufficientData {
        let volatility = trend.volatility;
        if volatility > config.high_volatility {
            insights.push(Insight::HighVolatility { volatility });
        } else if volatility < config.low_volatility {
            insights.push(Insight::LowVolatility { volatility });
        }
    }

    insights
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::super::moments::{KeyMoment, KeyMomentKind};
    use super::*;
    use crate::sentiment::SentimentLabel;

    fn trend(kind: Trend, volatility: f64, key_moments: Vec<KeyMoment>) -> TrendResult {
        TrendResult {
            trend: kind,
            first_half_avg: None,
            second_half_avg: None,
            delta: None,
            volatility,
            key_moments,
        }
    }

    fn extreme(index: usize) -> KeyMoment {
        KeyMoment {
            index,
            kind: KeyMomentKind::Extreme {
                score: 0.9,
                label: SentimentLabel::Positive,
            },
        }
    }

    #[test]
    fn single_message_gets_only_distribution_insight() {
        let dist = LabelDistribution {
            positive: 1,
            negative: 0,
            neutral: 0,
        };
        let insights = derive(
            &trend(Trend::InsufficientData, 0.0, Vec::new()),
            &dist,
            &AnalysisConfig::default(),
        );
        assert_eq!(
            insights,
            vec![Insight::PredominantlyPositive { count: 1, total: 1 }]
        );
    }

    #[test]
    fn stable_low_volatility_balanced() {
        let dist = LabelDistribution {
            positive: 1,
            negative: 1,
            neutral: 2,
        };
        let insights = derive(
            &trend(Trend::Stable, 0.05, Vec::new()),
            &dist,
            &AnalysisConfig::default(),
        );
        assert_eq!(
            insights,
            vec![
                Insight::MoodStable,
                Insight::BalancedMix,
                Insight::LowVolatility { volatility: 0.05 }
            ]
        );
    }

    #[test]
    fn counts_extremes_separately_from_shifts() {
        let dist = LabelDistribution {
            positive: 3,
            negative: 0,
            neutral: 0,
        };
        let insights = derive(
            &trend(Trend::Improving, 0.2, vec![extreme(0), extreme(2)]),
            &dist,
            &AnalysisConfig::default(),
        );
        assert_eq!(
            insights,
            vec![
                Insight::MoodImproved,
                Insight::ExtremeMoments { count: 2 },
                Insight::PredominantlyPositive { count: 3, total: 3 }
            ]
        );
    }

    #[test]
    fn high_volatility_uses_configured_cutoff() {
        let dist = LabelDistribution::default();
        let config = AnalysisConfig {
            high_volatility: 0.5,
            ..AnalysisConfig::default()
        };
        let insights = derive(&trend(Trend::Declining, 0.4, Vec::new()), &dist, &config);
        assert!(!insights.iter().any(|i| matches!(i, Insight::HighVolatility { .. })));
        let insights = derive(
            &trend(Trend::Declining, 0.4, Vec::new()),
            &dist,
            &AnalysisConfig::default(),
        );
        assert!(insights.contains(&Insight::HighVolatility { volatility: 0.4 }));
    }
}
