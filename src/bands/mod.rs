//! Classification Bands
//!
//! Ordered, read-only lookup tables applied after scoring:
//! - `rating`: score → rating label (fixed thresholds)
//! - `crop`: score → crop recommendation (table driven)
//! - `fertility`: raw values → Low / Medium / High fertility class
//! - `fertilizer`: raw values → fertilizer recommendation (8-window rows)
//!
//! Every table lookup returns the first band whose half-open interval
//! `[min, max)` contains the query. A band without `max` is unbounded above.

pub mod crop;
pub mod fertility;
pub mod fertilizer;
pub mod rating;

pub use crop::{CropBand, CropBands, NO_CROP_RECOMMENDATION};
pub use fertility::{classify_fertility, FertilityClass};
pub use fertilizer::{FertilizerRow, FertilizerTable, NO_FERTILIZER_RECOMMENDATION};
pub use rating::{Rating, RATING_THRESHOLDS};

use crate::error::{Result, SoilHealthError};
use serde::{Deserialize, Serialize};

/// Half-open interval `[min, max)`
///
/// `min = -∞` (omitted in JSON) leaves the band open below and
/// `max = None` leaves it open above.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandRange {
    #[serde(default = "unbounded_below", skip_serializing_if = "is_unbounded_below")]
    pub min: f64,
    pub max: Option<f64>,
}

fn unbounded_below() -> f64 {
    f64::NEG_INFINITY
}

fn is_unbounded_below(min: &f64) -> bool {
    *min == f64::NEG_INFINITY
}

impl BandRange {
    /// Matches every value
    pub const ANY: BandRange = BandRange {
        min: f64::NEG_INFINITY,
        max: None,
    };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_least(min: f64) -> Self {
        Self { min, max: None }
    }

    pub const fn below(max: f64) -> Self {
        Self {
            min: f64::NEG_INFINITY,
            max: Some(max),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.is_none_or(|max| value < max)
    }

    /// True when the band places no constraint at all
    pub fn is_unbounded(&self) -> bool {
        is_unbounded_below(&self.min) && self.max.is_none()
    }

    /// Lower bound is a number or -∞ and, when bounded, max > min
    pub fn validate(&self, context: &str) -> Result<()> {
        if self.min.is_nan() || self.min == f64::INFINITY {
            return Err(SoilHealthError::configuration(format!(
                "{context}: lower bound {} is not usable",
                self.min
            )));
        }
        if let Some(max) = self.max {
            if max.is_nan() || max <= self.min {
                return Err(SoilHealthError::configuration(format!(
                    "{context}: empty interval [{}, {})",
                    self.min, max
                )));
            }
        }
        Ok(())
    }
}
