//! Fertility classification from indicator range bins
//!
//! Each indicator is split into five bins by four edges. A sample is:
//! - Low (fuzzy value 0.2) if pH falls in either outer bin, or any other
//!   indicator falls in its lowest bin
//! - High (0.8) if every indicator falls in its central bin
//! - Medium (0.5) otherwise
//!
//! Bins are half-open `[lower, upper)`, so a value equal to an edge belongs
//! to the bin above it.

use crate::indicators::{Indicator, IndicatorValues, INDICATOR_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BIN_COUNT: usize = 5;
const CENTRAL_BIN: usize = 2;

/// Bin edges per indicator, registry order
pub const BIN_EDGES: [[f64; BIN_COUNT - 1]; INDICATOR_COUNT] = [
    [5.5, 6.5, 7.5, 8.5],         // pH
    [100.0, 150.0, 200.0, 250.0], // N (mg/kg)
    [10.0, 20.0, 30.0, 40.0],     // P (mg/kg)
    [50.0, 100.0, 150.0, 200.0],  // K (mg/kg)
    [0.5, 1.0, 1.5, 2.0],         // EC (dS/m)
    [20.0, 25.0, 30.0, 35.0],     // Temperature (°C)
    [30.0, 50.0, 70.0, 90.0],     // Moisture (%)
    [30.0, 50.0, 70.0, 90.0],     // Humidity (%)
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FertilityClass {
    Low,
    Medium,
    High,
}

impl FertilityClass {
    pub fn fuzzy_value(&self) -> f64 {
        match self {
            FertilityClass::Low => 0.2,
            FertilityClass::Medium => 0.5,
            FertilityClass::High => 0.8,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FertilityClass::Low => "Low",
            FertilityClass::Medium => "Medium",
            FertilityClass::High => "High",
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(FertilityClass::Low),
            "medium" => Some(FertilityClass::Medium),
            "high" => Some(FertilityClass::High),
            _ => None,
        }
    }
}

impl fmt::Display for FertilityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bin index (0..5) of a value for an indicator
pub fn bin_index(indicator: Indicator, value: f64) -> usize {
    BIN_EDGES[indicator.index()]
        .iter()
        .take_while(|&&edge| value >= edge)
        .count()
}

/// Display label of a bin, e.g. "<5.5", "5.5-6.5", ">8.5"
pub fn bin_label(indicator: Indicator, bin: usize) -> String {
    let edges = &BIN_EDGES[indicator.index()];
    match bin {
        0 => format!("<{}", edges[0]),
        b if b >= BIN_COUNT - 1 => format!(">{}", edges[BIN_COUNT - 2]),
        b => format!("{}-{}", edges[b - 1], edges[b]),
    }
}

/// Classify a sample into Low / Medium / High fertility
pub fn classify_fertility(values: &IndicatorValues) -> FertilityClass {
    let bins: [usize; INDICATOR_COUNT] =
        std::array::from_fn(|i| bin_index(Indicator::ALL[i], values[i]));

    let ph_bin = bins[Indicator::Ph.index()];
    let ph_extreme = ph_bin == 0 || ph_bin == BIN_COUNT - 1;
    let any_lowest = bins.iter().skip(1).any(|&b| b == 0);

    if ph_extreme || any_lowest {
        FertilityClass::Low
    } else if bins.iter().all(|&b| b == CENTRAL_BIN) {
        FertilityClass::High
    } else {
        FertilityClass::Medium
    }
}
