//! Half-over-half trend classification and volatility.

use super::KeyMoment;
use super::verdict::mean;
use serde::{Deserialize, Serialize};

/// Direction of sentiment movement between the two halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    /// Fewer than two observations; no halves to compare.
    InsufficientData,
}

impl Trend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
            Self::InsufficientData => "insufficient_data",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trend, half averages, volatility and flagged moments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub trend: Trend,
    /// Mean of indices `0..N/2`; None when `N < 2`.
    pub first_half_avg: Option<f64>,
    /// Mean of indices `N/2..N`; None when `N < 2`.
    pub second_half_avg: Option<f64>,
    /// `second_half_avg - first_half_avg`; None when `N < 2`.
    pub delta: Option<f64>,
    /// Population standard deviation of all scores; 0.0 for a single score.
    pub volatility: f64,
    pub key_moments: Vec<KeyMoment>,
}

pub(crate) struct Halves {
    pub first_avg: f64,
    pub second_avg: f64,
}

/// Split at `N/2` (extra element to the second half) and average each side.
pub(crate) fn halves(scores: &[f64]) -> Option<Halves> {
    if scores.len() < 2 {
        return None;
    }
    let (first, second) = scores.split_at(scores.len() / 2);
    Some(Halves {
        first_avg: mean(first),
        second_avg: mean(second),
    })
}

pub(crate) fn classify(delta: f64, threshold: f64) -> Trend {
    if delta > threshold {
        Trend::Improving
    } else if delta < -threshold {
        Trend::Declining
    } else {
        Trend::Stable
    }
}

/// Population standard deviation; exactly 0.0 for fewer than two scores or
/// when every score is identical.
pub fn volatility(scores: &[f64]) -> f64 {
    let Some(&first) = scores.first() else {
        return 0.0;
    };
    if scores.iter().all(|&s| s == first) {
        return 0.0;
    }
    let n = scores.len() as f64;
    let avg = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - avg).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

pub(crate) fn compute(scores: &[f64], threshold: f64, key_moments: Vec<KeyMoment>) -> TrendResult {
    let volatility = volatility(scores);
    match halves(scores) {
        Some(h) => {
            let delta = h.second_avg - h.first_avg;
            TrendResult {
                trend: classify(delta, threshold),
                first_half_avg: Some(h.first_avg),
                second_half_avg: Some(h.second_avg),
                delta: Some(delta),
                volatility,
                key_moments,
            }
        }
        None => TrendResult {
            trend: Trend::InsufficientData,
            first_half_avg: None,
            second_half_avg: None,
            delta: None,
            volatility,
            key_moments,
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn odd_length_gives_extra_element_to_second_half() {
        let h = halves(&[0.44, -0.73, 0.52]).unwrap();
        assert!((h.first_avg - 0.44).abs() < 1e-12);
        assert!((h.second_avg - (-0.105)).abs() < 1e-12);
    }

    #[test]
    fn even_length_splits_evenly() {
        let h = halves(&[0.0, 0.2, 0.4, 0.6]).unwrap();
        assert!((h.first_avg - 0.1).abs() < 1e-12);
        assert!((h.second_avg - 0.5).abs() < 1e-12);
    }

    #[test]
    fn single_score_has_no_halves() {
        assert!(halves(&[0.3]).is_none());
        assert!(halves(&[]).is_none());
    }

    #[test]
    fn classification_is_strict_at_threshold() {
        assert_eq!(classify(0.1, 0.1), Trend::Stable);
        assert_eq!(classify(-0.1, 0.1), Trend::Stable);
        assert_eq!(classify(0.11, 0.1), Trend::Improving);
        assert_eq!(classify(-0.11, 0.1), Trend::Declining);
    }

    #[test]
    fn single_score_trend_is_insufficient_not_stable() {
        let result = compute(&[0.5], 0.1, Vec::new());
        assert_eq!(result.trend, Trend::InsufficientData);
        assert_eq!(result.first_half_avg, None);
        assert_eq!(result.delta, None);
        assert_eq!(result.volatility, 0.0);
    }

    #[test]
    fn volatility_is_population_stdev() {
        // mean 0.5, deviations ±0.5 → stdev 0.5 (sample stdev would be ~0.707)
        assert!((volatility(&[0.0, 1.0]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn volatility_zero_for_identical_scores() {
        assert_eq!(volatility(&[0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1]), 0.0);
        assert_eq!(volatility(&[]), 0.0);
        assert_eq!(volatility(&[-0.9]), 0.0);
    }

    #[test]
    fn trend_display_matches_serde_name() {
        for trend in [
            Trend::Improving,
            Trend::Declining,
            Trend::Stable,
            Trend::InsufficientData,
        ] {
            let json = serde_json::to_string(&trend).unwrap();
            assert_eq!(json, format!("\"{trend}\""));
        }
    }
}
