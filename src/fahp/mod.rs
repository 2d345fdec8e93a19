//! Fuzzy Weight Engine
//!
//! Converts the constant fuzzy comparison matrix into crisp indicator
//! weights, with a consistency-ratio diagnostic on the side.

pub mod consistency;
pub mod fuzzy_number;
pub mod matrix;
pub mod weights;

pub use consistency::{check_consistency, ConsistencyReport, CONSISTENCY_THRESHOLD};
pub use fuzzy_number::TriangularFuzzyNumber;
pub use matrix::FuzzyComparisonMatrix;
pub use weights::{derive_weights, FahpBreakdown, WeightVector, WEIGHT_SUM_TOLERANCE};
