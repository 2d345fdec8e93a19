//! Soil health rating
//!
//! Seven labels over fixed thresholds. Each threshold starts the next band,
//! so every score maps to exactly one label.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bounds of Poor through Excellent
pub const RATING_THRESHOLDS: [f64; 6] = [0.2, 0.4, 0.6, 0.7, 0.8, 0.9];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "Very Poor")]
    VeryPoor,
    Poor,
    #[serde(rename = "Below Average")]
    BelowAverage,
    Average,
    #[serde(rename = "Above Average")]
    AboveAverage,
    Good,
    Excellent,
}

impl Rating {
    pub const ALL: [Rating; 7] = [
        Rating::VeryPoor,
        Rating::Poor,
        Rating::BelowAverage,
        Rating::Average,
        Rating::AboveAverage,
        Rating::Good,
        Rating::Excellent,
    ];

    /// Classify a score
    ///
    /// - [0.9, ∞) → Excellent
    /// - [0.8, 0.9) → Good
    /// - [0.7, 0.8) → Above Average
    /// - [0.6, 0.7) → Average
    /// - [0.4, 0.6) → Below Average
    /// - [0.2, 0.4) → Poor
    /// - below 0.2 → Very Poor
    pub fn from_score(score: f64) -> Self {
        if score < 0.2 {
            Rating::VeryPoor
        } else if score < 0.4 {
            Rating::Poor
        } else if score < 0.6 {
            Rating::BelowAverage
        } else if score < 0.7 {
            Rating::Average
        } else if score < 0.8 {
            Rating::AboveAverage
        } else if score < 0.9 {
            Rating::Good
        } else {
            Rating::Excellent
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rating::VeryPoor => "Very Poor",
            Rating::Poor => "Poor",
            Rating::BelowAverage => "Below Average",
            Rating::Average => "Average",
            Rating::AboveAverage => "Above Average",
            Rating::Good => "Good",
            Rating::Excellent => "Excellent",
        }
    }

    /// Score interval `[min, max)` covered by this rating
    pub fn score_interval(&self) -> (f64, f64) {
        let i = *self as usize;
        let lower = if i == 0 { f64::NEG_INFINITY } else { RATING_THRESHOLDS[i - 1] };
        let upper = RATING_THRESHOLDS.get(i).copied().unwrap_or(f64::INFINITY);
        (lower, upper)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_exact() {
        assert_eq!(Rating::from_score(0.0), Rating::VeryPoor);
        assert_eq!(Rating::from_score(0.2), Rating::Poor);
        assert_eq!(Rating::from_score(0.4), Rating::BelowAverage);
        assert_eq!(Rating::from_score(0.6), Rating::Average);
        assert_eq!(Rating::from_score(0.7), Rating::AboveAverage);
        assert_eq!(Rating::from_score(0.8), Rating::Good);
        assert_eq!(Rating::from_score(0.9), Rating::Excellent);
        assert_eq!(Rating::from_score(1.0), Rating::Excellent);
    }

    #[test]
    fn test_thresholds_neighbourhood() {
        for (i, threshold) in RATING_THRESHOLDS.iter().enumerate() {
            assert_eq!(Rating::from_score(threshold - 0.001), Rating::ALL[i]);
            assert_eq!(Rating::from_score(threshold + 0.001), Rating::ALL[i + 1]);
        }
    }

    #[test]
    fn test_every_score_hits_exactly_one_interval() {
        for step in 0..=1000 {
            let score = step as f64 / 1000.0;
            let matching: Vec<Rating> = Rating::ALL
                .iter()
                .copied()
                .filter(|r| {
                    let (lo, hi) = r.score_interval();
                    score >= lo && score < hi
                })
                .collect();
            assert_eq!(matching.len(), 1, "score {score}");
            assert_eq!(matching[0], Rating::from_score(score), "score {score}");
        }
    }

    #[test]
    fn test_labels_serialize_as_display_text() {
        assert_eq!(serde_json::to_string(&Rating::BelowAverage).unwrap(), "\"Below Average\"");
        assert_eq!(Rating::VeryPoor.to_string(), "Very Poor");
    }
}
