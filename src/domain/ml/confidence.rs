//! Confidence buckets derived from the distance between a probability and
//! the decision boundary.
//!
//! Default bands (kept in line with the scoring service the pipeline was
//! trained for):
//!
//! | distance from 0.5 | confidence |
//! |-------------------|------------|
//! | `<= 0.1`          | low        |
//! | `<= 0.2`          | medium     |
//! | `> 0.2`           | high       |
//!
//! i.e. high when `p < 0.3` or `p > 0.7`, medium when `p < 0.4` or `p > 0.6`.

use serde::Serialize;
use thiserror::Error;

/// Probability at which the classes are indistinguishable.
pub const DECISION_BOUNDARY: f64 = 0.5;

/// Default distance from the boundary still counted as low confidence.
pub const DEFAULT_LOW_BAND: f64 = 0.1;

/// Default distance from the boundary still counted as medium confidence.
pub const DEFAULT_MEDIUM_BAND: f64 = 0.2;

/// Ordered by distance from the boundary: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid confidence bands low={low}, medium={medium}: need 0 <= low <= medium <= 0.5")]
pub struct InvalidConfidencePolicy {
    pub low: f64,
    pub medium: f64,
}

/// Tunable confidence thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidencePolicy {
    low_band: f64,
    medium_band: f64,
}

impl ConfidencePolicy {
    pub const DEFAULT: ConfidencePolicy = ConfidencePolicy {
        low_band: DEFAULT_LOW_BAND,
        medium_band: DEFAULT_MEDIUM_BAND,
    };

    pub fn new(low_band: f64, medium_band: f64) -> Result<Self, InvalidConfidencePolicy> {
        let ordered = 0.0 <= low_band && low_band <= medium_band && medium_band <= DECISION_BOUNDARY;
        if !ordered {
            return Err(InvalidConfidencePolicy {
                low: low_band,
                medium: medium_band,
            });
        }
        Ok(Self {
            low_band,
            medium_band,
        })
    }

    pub fn low_band(&self) -> f64 {
        self.low_band
    }

    pub fn medium_band(&self) -> f64 {
        self.medium_band
    }

    /// Total over `f64`: NaN carries no information and maps to `Low`.
    pub fn classify(&self, probability: f64) -> Confidence {
        let distance = (probability - DECISION_BOUNDARY).abs();
        if distance.is_nan() || distance <= self.low_band {
            Confidence::Low
        } else if distance <= self.medium_band {
            Confidence::Medium
        } else {
            Confidence::High
        }
    }
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Classifies with the default bands.
pub fn classify(probability: f64) -> Confidence {
    ConfidencePolicy::DEFAULT.classify(probability)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_is_low() {
        assert_eq!(classify(0.5), Confidence::Low);
        let wide = ConfidencePolicy::new(0.0, 0.0).unwrap();
        assert_eq!(wide.classify(0.5), Confidence::Low);
    }

    #[test]
    fn test_default_bands() {
        assert_eq!(classify(0.4), Confidence::Low);
        assert_eq!(classify(0.6), Confidence::Low);
        assert_eq!(classify(0.35), Confidence::Medium);
        assert_eq!(classify(0.65), Confidence::Medium);
        assert_eq!(classify(0.29), Confidence::High);
        assert_eq!(classify(0.71), Confidence::High);
        assert_eq!(classify(0.0), Confidence::High);
        assert_eq!(classify(1.0), Confidence::High);
    }

    #[test]
    fn test_total_over_odd_inputs() {
        assert_eq!(classify(f64::NAN), Confidence::Low);
        assert_eq!(classify(f64::INFINITY), Confidence::High);
        assert_eq!(classify(-3.0), Confidence::High);
    }

    #[test]
    fn test_monotonic_in_distance() {
        let mut previous = Confidence::Low;
        for step in 0..=50 {
            let p = 0.5 + step as f64 / 100.0;
            let current = classify(p);
            assert!(current >= previous, "confidence dropped at p={p}");
            assert_eq!(current, classify(1.0 - p));
            previous = current;
        }
    }

    #[test]
    fn test_policy_rejects_unordered_bands() {
        assert!(ConfidencePolicy::new(0.3, 0.2).is_err());
        assert!(ConfidencePolicy::new(-0.1, 0.2).is_err());
        assert!(ConfidencePolicy::new(0.1, 0.6).is_err());
        assert!(ConfidencePolicy::new(f64::NAN, 0.2).is_err());
    }

    #[test]
    fn test_custom_policy() {
        let policy = ConfidencePolicy::new(0.1, 0.25).unwrap();
        assert_eq!(policy.classify(0.72), Confidence::Medium);
        assert_eq!(policy.classify(0.76), Confidence::High);
    }
}
