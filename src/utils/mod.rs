//! Utility modules for soil health scoring
//!
//! - Normalization: min-max scaling of raw readings to [0, 1]

pub mod normalization;

pub use normalization::{normalize, normalize_value, NormalizedValues};
