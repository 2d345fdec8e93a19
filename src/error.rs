//! Error types for soil health assessment
//!
//! Hard errors (input validation, configuration) propagate to the caller of
//! `assess`. The consistency check has its own error type because it is a
//! diagnostic and never blocks scoring.

use thiserror::Error;

/// Errors surfaced by validation, normalization and scoring
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SoilHealthError {
    /// Indicator value outside its admissible `[min, max]` range
    #[error("{indicator} value {value} is outside the valid range [{min}, {max}]")]
    OutOfRange {
        indicator: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Degenerate range, malformed matrix or malformed band table
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    /// Reading absent while the policy requires all indicators
    #[error("missing required indicator: {indicator}")]
    MissingIndicator { indicator: String },

    /// Value vector does not have one entry per indicator
    #[error("expected {expected} indicator values, got {actual}")]
    VectorLength { expected: usize, actual: usize },
}

impl SoilHealthError {
    pub fn configuration(reason: impl Into<String>) -> Self {
        SoilHealthError::Configuration {
            reason: reason.into(),
        }
    }
}

/// Consistency ratio could not be computed for the comparison matrix
#[derive(Debug, Clone, PartialEq, Error)]
#[error("consistency check unavailable: {reason}")]
pub struct ConsistencyCheckUnavailable {
    pub reason: String,
}

impl ConsistencyCheckUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SoilHealthError>;
