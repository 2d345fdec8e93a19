//! Soil Health FAHP Scoring Engine
//!
//! Scores agricultural soil samples from eight measured indicators (pH, N,
//! P, K, electrical conductivity, temperature, moisture, humidity) using
//! weights derived by the Fuzzy Analytic Hierarchy Process.
//!
//! Module layout:
//! - `indicators`: the 8 indicators, their admissible ranges, validation
//! - `utils/`: min-max normalization
//! - `fahp/`: fuzzy comparison matrix, weight derivation, consistency ratio
//! - `bands/`: rating, crop, fertility and fertilizer lookups
//! - `scorer`: composite score and the `SoilHealthAssessor` facade
//! - `data`: JSON config and CSV band tables (Polars)
//!
//! ```no_run
//! let result = soil_health_fahp::assess(&[6.75, 150.0, 60.0, 125.0, 1.0, 20.0, 50.0, 50.0])?;
//! println!("{:.4} {}", result.score, result.rating);
//! # Ok::<(), soil_health_fahp::SoilHealthError>(())
//! ```

pub mod bands;
pub mod data;
pub mod error;
pub mod fahp;
pub mod indicators;
pub mod scorer;
pub mod utils;

// Re-export commonly used types
pub use bands::{classify_fertility, CropBands, FertilityClass, FertilizerTable, Rating};
pub use data::AssessmentConfig;
pub use error::{ConsistencyCheckUnavailable, Result, SoilHealthError};
pub use fahp::{check_consistency, ConsistencyReport, FuzzyComparisonMatrix, WeightVector};
pub use indicators::{
    Indicator, IndicatorRegistry, IndicatorSpec, IndicatorValues, PartialIndicatorValues,
    INDICATOR_COUNT,
};
pub use scorer::{
    assess, score, AssessmentBreakdown, AssessmentResult, IndicatorContribution,
    MissingIndicatorPolicy, SoilHealthAssessor,
};
pub use utils::{normalize, normalize_value, NormalizedValues};
