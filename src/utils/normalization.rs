//! Normalization Utilities
//!
//! Converts raw indicator readings to the [0, 1] scale using each
//! indicator's admissible range from the registry.
//!
//! Validation is a separate step: callers run `IndicatorRegistry::check_all`
//! first and only then normalize. Values outside the range are not clamped
//! here, they simply land outside [0, 1].

use crate::error::{Result, SoilHealthError};
use crate::indicators::{IndicatorRegistry, IndicatorSpec, IndicatorValues, INDICATOR_COUNT};

/// Indicator values on the [0, 1] scale, in registry order
pub type NormalizedValues = [f64; INDICATOR_COUNT];

/// Min-max normalize a single value
///
/// Algorithm:
/// 1. range = max_value - min_value
/// 2. normalized = (value - min_value) / range
///
/// A zero range is a configuration error rather than a NaN/Inf result.
pub fn normalize_value(value: f64, spec: &IndicatorSpec) -> Result<f64> {
    let range = spec.max_value - spec.min_value;
    if range == 0.0 || !range.is_finite() {
        return Err(SoilHealthError::configuration(format!(
            "{} has a degenerate range [{}, {}]; cannot normalize",
            spec.name, spec.min_value, spec.max_value
        )));
    }
    Ok((value - spec.min_value) / range)
}

/// Normalize a full value vector against the registry
pub fn normalize(values: &IndicatorValues, registry: &IndicatorRegistry) -> Result<NormalizedValues> {
    let mut normalized = [0.0; INDICATOR_COUNT];
    for ((slot, &value), spec) in normalized.iter_mut().zip(values).zip(registry.specs()) {
        *slot = normalize_value(value, spec)?;
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::Indicator;
    use approx::assert_relative_eq;

    #[test]
    fn test_min_and_max_map_to_unit_interval_ends() {
        let registry = IndicatorRegistry::default();
        for (_, spec) in registry.iter() {
            assert_relative_eq!(normalize_value(spec.min_value, spec).unwrap(), 0.0);
            assert_relative_eq!(normalize_value(spec.max_value, spec).unwrap(), 1.0);
        }
    }

    #[test]
    fn test_vector_normalization() {
        let registry = IndicatorRegistry::default();
        let values = [4.25, 255.0, 105.0, 205.0, 2.0, 25.0, 50.0, 50.0];
        let normalized = normalize(&values, &registry).unwrap();
        for v in normalized {
            assert_relative_eq!(v, 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_degenerate_range_fails_fast() {
        let mut specs = IndicatorRegistry::default().specs().clone();
        specs[Indicator::Temperature.index()].max_value = 0.0;
        let registry = IndicatorRegistry::new_unchecked(specs);
        let err = normalize(&registry.minimums(), &registry).unwrap_err();
        match err {
            SoilHealthError::Configuration { reason } => assert!(reason.contains("Temperature")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
