//! Indicator Registry
//!
//! The eight soil health indicators in their fixed order. The order is the
//! row/column order of the fuzzy comparison matrix and the position order of
//! every value vector, so it must never change.

use crate::error::{Result, SoilHealthError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const INDICATOR_COUNT: usize = 8;

/// Raw measurements, one per indicator, in registry order
pub type IndicatorValues = [f64; INDICATOR_COUNT];

/// Measurements where some readings may be absent
pub type PartialIndicatorValues = [Option<f64>; INDICATOR_COUNT];

/// Soil health indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Ph,
    Nitrogen,
    Phosphorus,
    Potassium,
    ElectricalConductivity,
    Temperature,
    Moisture,
    Humidity,
}

impl Indicator {
    pub const ALL: [Indicator; INDICATOR_COUNT] = [
        Indicator::Ph,
        Indicator::Nitrogen,
        Indicator::Phosphorus,
        Indicator::Potassium,
        Indicator::ElectricalConductivity,
        Indicator::Temperature,
        Indicator::Moisture,
        Indicator::Humidity,
    ];

    /// Position in every value vector and in the comparison matrix
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Stable machine key (CSV column prefixes, JSON)
    pub fn key(self) -> &'static str {
        match self {
            Indicator::Ph => "ph",
            Indicator::Nitrogen => "nitrogen",
            Indicator::Phosphorus => "phosphorus",
            Indicator::Potassium => "potassium",
            Indicator::ElectricalConductivity => "ec",
            Indicator::Temperature => "temperature",
            Indicator::Moisture => "moisture",
            Indicator::Humidity => "humidity",
        }
    }
}

/// Immutable descriptor for one indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSpec {
    pub name: String,
    pub min_value: f64,
    pub max_value: f64,
    /// Display only; never used in scoring
    pub optimal_range: (f64, f64),
    pub unit: String,
}

impl IndicatorSpec {
    pub fn new(name: &str, min_value: f64, max_value: f64, optimal_range: (f64, f64), unit: &str) -> Self {
        Self {
            name: name.to_string(),
            min_value,
            max_value,
            optimal_range,
            unit: unit.to_string(),
        }
    }

    /// Inclusive range check; NaN is never in range
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min_value && value <= self.max_value
    }

    pub fn optimal_midpoint(&self) -> f64 {
        (self.optimal_range.0 + self.optimal_range.1) / 2.0
    }
}

impl fmt::Display for IndicatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}-{} {})", self.name, self.min_value, self.max_value, self.unit)
    }
}

/// The 8 indicator specs in fixed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[IndicatorSpec; INDICATOR_COUNT]", into = "[IndicatorSpec; INDICATOR_COUNT]")]
pub struct IndicatorRegistry {
    specs: [IndicatorSpec; INDICATOR_COUNT],
}

impl IndicatorRegistry {
    /// Build a registry, rejecting degenerate or non-finite ranges up front
    pub fn new(specs: [IndicatorSpec; INDICATOR_COUNT]) -> Result<Self> {
        for spec in &specs {
            if !spec.min_value.is_finite() || !spec.max_value.is_finite() {
                return Err(SoilHealthError::configuration(format!(
                    "{} has a non-finite range [{}, {}]",
                    spec.name, spec.min_value, spec.max_value
                )));
            }
            if spec.max_value <= spec.min_value {
                return Err(SoilHealthError::configuration(format!(
                    "{} has a degenerate range [{}, {}]",
                    spec.name, spec.min_value, spec.max_value
                )));
            }
        }
        Ok(Self { specs })
    }

    /// Registry without range checks; the normalizer still fails fast on
    /// degenerate ranges
    pub fn new_unchecked(specs: [IndicatorSpec; INDICATOR_COUNT]) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &[IndicatorSpec; INDICATOR_COUNT] {
        &self.specs
    }

    pub fn spec(&self, indicator: Indicator) -> &IndicatorSpec {
        &self.specs[indicator.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Indicator, &IndicatorSpec)> {
        Indicator::ALL.iter().copied().zip(self.specs.iter())
    }

    /// Whether `value` lies within the indicator's range (inclusive).
    /// An unknown index is never valid.
    pub fn validate(&self, index: usize, value: f64) -> bool {
        self.specs.get(index).is_some_and(|spec| spec.contains(value))
    }

    /// Range check that reports which indicator failed
    pub fn check(&self, indicator: Indicator, value: f64) -> Result<()> {
        let spec = self.spec(indicator);
        if spec.contains(value) {
            Ok(())
        } else {
            Err(SoilHealthError::OutOfRange {
                indicator: spec.name.clone(),
                value,
                min: spec.min_value,
                max: spec.max_value,
            })
        }
    }

    /// Check every value, stopping at the first failure in registry order
    pub fn check_all(&self, values: &IndicatorValues) -> Result<()> {
        for indicator in Indicator::ALL {
            self.check(indicator, values[indicator.index()])?;
        }
        Ok(())
    }

    /// Values at each indicator's optimal-range midpoint
    pub fn optimal_midpoints(&self) -> IndicatorValues {
        std::array::from_fn(|i| self.specs[i].optimal_midpoint())
    }

    pub fn minimums(&self) -> IndicatorValues {
        std::array::from_fn(|i| self.specs[i].min_value)
    }

    pub fn maximums(&self) -> IndicatorValues {
        std::array::from_fn(|i| self.specs[i].max_value)
    }
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::new_unchecked([
            IndicatorSpec::new("Soil pH", 0.0, 8.5, (6.0, 7.5), ""),
            IndicatorSpec::new("Nitrogen (N)", 10.0, 500.0, (50.0, 250.0), "mg/kg"),
            IndicatorSpec::new("Phosphorus (P)", 10.0, 200.0, (20.0, 100.0), "mg/kg"),
            IndicatorSpec::new("Potassium (K)", 10.0, 400.0, (50.0, 200.0), "mg/kg"),
            IndicatorSpec::new("Electrical Conductivity (EC)", 0.0, 4.0, (0.0, 2.0), "dS/m"),
            IndicatorSpec::new("Temperature", 0.0, 50.0, (10.0, 30.0), "°C"),
            IndicatorSpec::new("Moisture", 0.0, 100.0, (20.0, 80.0), "%"),
            IndicatorSpec::new("Humidity", 0.0, 100.0, (30.0, 70.0), "%"),
        ])
    }
}

impl TryFrom<[IndicatorSpec; INDICATOR_COUNT]> for IndicatorRegistry {
    type Error = SoilHealthError;

    fn try_from(specs: [IndicatorSpec; INDICATOR_COUNT]) -> Result<Self> {
        Self::new(specs)
    }
}

impl From<IndicatorRegistry> for [IndicatorSpec; INDICATOR_COUNT] {
    fn from(registry: IndicatorRegistry) -> Self {
        registry.specs
    }
}
