//! FAHP weight derivation (fuzzy geometric mean method)
//!
//! Algorithm:
//! 1. Row geometric mean, componentwise: gm[i] = (Π_j m[i][j])^(1/n)
//! 2. Fuzzy weight, componentwise: fw[i] = gm[i] / Σ_k gm[k]
//! 3. Centroid defuzzification: d[i] = (a + b + c) / 3
//! 4. Normalization: w[i] = d[i] / Σ_k d[k]
//!
//! Step 2 divides each component by the matching component of the sum. The
//! standard fuzzy division would divide `a` by the upper sum and `c` by the
//! lower sum; the componentwise form is kept so weights stay comparable with
//! previously published scores.

use super::fuzzy_number::TriangularFuzzyNumber;
use super::matrix::FuzzyComparisonMatrix;
use crate::error::{Result, SoilHealthError};
use crate::indicators::{Indicator, INDICATOR_COUNT};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Tolerance for the weight-sum invariant
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Intermediate values of one weight derivation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FahpBreakdown {
    pub geometric_means: Vec<TriangularFuzzyNumber>,
    pub fuzzy_weights: Vec<TriangularFuzzyNumber>,
    pub defuzzified: Vec<f64>,
    pub weights: Vec<f64>,
}

/// Fuzzy geometric mean of every row
pub fn fuzzy_geometric_means(matrix: &FuzzyComparisonMatrix) -> Vec<TriangularFuzzyNumber> {
    let n = matrix.size() as f64;
    matrix
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .fold(TriangularFuzzyNumber::ONE, |acc, &tfn| acc * tfn)
                .powf(1.0 / n)
        })
        .collect()
}

/// Fuzzy weights by componentwise division over the column sum
pub fn fuzzy_weights(geometric_means: &[TriangularFuzzyNumber]) -> Vec<TriangularFuzzyNumber> {
    let total = geometric_means
        .iter()
        .fold(TriangularFuzzyNumber::ZERO, |acc, &gm| acc + gm);
    geometric_means
        .iter()
        .map(|gm| gm.div_componentwise(total))
        .collect()
}

/// Run the full derivation and keep every intermediate step
pub fn derive_weights(matrix: &FuzzyComparisonMatrix) -> Result<FahpBreakdown> {
    let breakdown = derive_breakdown(matrix);
    let total: f64 = breakdown.defuzzified.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return Err(SoilHealthError::configuration(format!(
            "defuzzified weights sum to {total}; cannot normalize"
        )));
    }
    Ok(breakdown)
}

fn derive_breakdown(matrix: &FuzzyComparisonMatrix) -> FahpBreakdown {
    let geometric_means = fuzzy_geometric_means(matrix);
    let fuzzy_weights = fuzzy_weights(&geometric_means);
    let defuzzified: Vec<f64> = fuzzy_weights.iter().map(|fw| fw.centroid()).collect();
    let total: f64 = defuzzified.iter().sum();
    let weights = defuzzified.iter().map(|d| d / total).collect();

    FahpBreakdown {
        geometric_means,
        fuzzy_weights,
        defuzzified,
        weights,
    }
}

impl FahpBreakdown {
    /// Derivation of the expert matrix, computed once per process
    ///
    /// The expert matrix is a compile-time constant with positive entries,
    /// so its defuzzified sum is always positive.
    pub fn expert_default() -> &'static FahpBreakdown {
        static EXPERT_BREAKDOWN: OnceLock<FahpBreakdown> = OnceLock::new();
        EXPERT_BREAKDOWN.get_or_init(|| derive_breakdown(&FuzzyComparisonMatrix::expert_default()))
    }
}

/// Crisp, normalized weight per indicator (sums to 1)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; INDICATOR_COUNT]", into = "[f64; INDICATOR_COUNT]")]
pub struct WeightVector([f64; INDICATOR_COUNT]);

impl WeightVector {
    /// Derive weights from an 8×8 comparison matrix
    pub fn from_matrix(matrix: &FuzzyComparisonMatrix) -> Result<Self> {
        if matrix.size() != INDICATOR_COUNT {
            return Err(SoilHealthError::configuration(format!(
                "comparison matrix is {n}×{n}, expected {INDICATOR_COUNT}×{INDICATOR_COUNT}",
                n = matrix.size()
            )));
        }
        let breakdown = derive_weights(matrix)?;
        let mut weights = [0.0; INDICATOR_COUNT];
        weights.copy_from_slice(&breakdown.weights);
        Self::from_weights(weights)
    }

    /// Accept explicit weights; they must be finite, non-negative and sum to 1
    pub fn from_weights(weights: [f64; INDICATOR_COUNT]) -> Result<Self> {
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SoilHealthError::configuration(format!(
                "weights must be finite and non-negative: {weights:?}"
            )));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(SoilHealthError::configuration(format!(
                "weights sum to {sum}, expected 1.0"
            )));
        }
        Ok(Self(weights))
    }

    /// Weights of the expert matrix, derived once per process
    pub fn expert_default() -> &'static WeightVector {
        static EXPERT_WEIGHTS: OnceLock<WeightVector> = OnceLock::new();
        EXPERT_WEIGHTS.get_or_init(|| {
            let mut weights = [0.0; INDICATOR_COUNT];
            weights.copy_from_slice(&FahpBreakdown::expert_default().weights);
            WeightVector(weights)
        })
    }

    pub fn as_array(&self) -> &[f64; INDICATOR_COUNT] {
        &self.0
    }

    pub fn get(&self, indicator: Indicator) -> f64 {
        self.0[indicator.index()]
    }

    pub fn sum(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Weights restricted to the present indicators and rescaled to sum to 1
    pub fn renormalized_over(&self, present: &[bool; INDICATOR_COUNT]) -> Result<[f64; INDICATOR_COUNT]> {
        let present_sum: f64 = self
            .0
            .iter()
            .zip(present)
            .filter(|&(_, &p)| p)
            .map(|(w, _)| w)
            .sum();
        if present_sum <= 0.0 {
            return Err(SoilHealthError::configuration(
                "no weighted indicator is present; cannot renormalize",
            ));
        }
        Ok(std::array::from_fn(|i| {
            if present[i] {
                self.0[i] / present_sum
            } else {
                0.0
            }
        }))
    }
}

impl TryFrom<[f64; INDICATOR_COUNT]> for WeightVector {
    type Error = SoilHealthError;

    fn try_from(weights: [f64; INDICATOR_COUNT]) -> Result<Self> {
        Self::from_weights(weights)
    }
}

impl From<WeightVector> for [f64; INDICATOR_COUNT] {
    fn from(weights: WeightVector) -> Self {
        weights.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_expert_weights_sum_to_one() {
        let weights = WeightVector::from_matrix(&FuzzyComparisonMatrix::expert_default()).unwrap();
        assert_relative_eq!(weights.sum(), 1.0, epsilon = WEIGHT_SUM_TOLERANCE);
        assert!(weights.as_array().iter().all(|w| *w > 0.0));
    }

    #[test]
    fn test_expert_weights_known_values() {
        let weights = WeightVector::expert_default();
        assert_relative_eq!(weights.get(Indicator::Ph), 0.215391, epsilon = 1e-6);
        assert_relative_eq!(weights.get(Indicator::Nitrogen), 0.185427, epsilon = 1e-6);
        assert_relative_eq!(weights.get(Indicator::Phosphorus), 0.159677, epsilon = 1e-6);
        assert_relative_eq!(weights.get(Indicator::Potassium), 0.129830, epsilon = 1e-6);
        assert_relative_eq!(weights.get(Indicator::ElectricalConductivity), 0.088770, epsilon = 1e-6);
        assert_relative_eq!(weights.get(Indicator::Temperature), 0.091019, epsilon = 1e-6);
        assert_relative_eq!(weights.get(Indicator::Moisture), 0.062241, epsilon = 1e-6);
        assert_relative_eq!(weights.get(Indicator::Humidity), 0.067645, epsilon = 1e-6);
    }

    #[test]
    fn test_cached_weights_match_checked_derivation() {
        let derived = WeightVector::from_matrix(&FuzzyComparisonMatrix::expert_default()).unwrap();
        assert_eq!(&derived, WeightVector::expert_default());
    }

    #[test]
    fn test_derivation_is_bit_identical() {
        let matrix = FuzzyComparisonMatrix::expert_default();
        let first = WeightVector::from_matrix(&matrix).unwrap();
        let second = WeightVector::from_matrix(&matrix).unwrap();
        for (a, b) in first.as_array().iter().zip(second.as_array()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_equal_judgments_give_uniform_weights() {
        let rows = vec![vec![TriangularFuzzyNumber::ONE; INDICATOR_COUNT]; INDICATOR_COUNT];
        let matrix = FuzzyComparisonMatrix::new(rows).unwrap();
        let weights = WeightVector::from_matrix(&matrix).unwrap();
        for w in weights.as_array() {
            assert_relative_eq!(*w, 1.0 / INDICATOR_COUNT as f64, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_breakdown_geometric_mean_of_first_row() {
        let breakdown = derive_weights(&FuzzyComparisonMatrix::expert_default()).unwrap();
        // row 0: a = 1*1*1*1*2*1*2*1 = 4, b = 1*2*2*2*3*2*3*2 = 288, c = 1*3*3*3*4*3*4*3 = 3888
        let gm = breakdown.geometric_means[0];
        assert_relative_eq!(gm.a, 4.0_f64.powf(0.125), epsilon = 1e-12);
        assert_relative_eq!(gm.b, 288.0_f64.powf(0.125), epsilon = 1e-12);
        assert_relative_eq!(gm.c, 3888.0_f64.powf(0.125), epsilon = 1e-12);
        assert_relative_eq!(gm.b, 2.0296636, epsilon = 1e-6);
        let fw_sum: f64 = breakdown.fuzzy_weights.iter().map(|fw| fw.b).sum();
        assert_relative_eq!(fw_sum, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_wrong_size_matrix_is_configuration_error() {
        let rows = vec![vec![TriangularFuzzyNumber::ONE; 3]; 3];
        let matrix = FuzzyComparisonMatrix::new(rows).unwrap();
        assert!(derive_weights(&matrix).is_ok());
        assert!(matches!(
            WeightVector::from_matrix(&matrix),
            Err(SoilHealthError::Configuration { .. })
        ));
    }

    #[test]
    fn test_from_weights_rejects_bad_sum() {
        assert!(WeightVector::from_weights([0.125; INDICATOR_COUNT]).is_ok());
        assert!(WeightVector::from_weights([0.2; INDICATOR_COUNT]).is_err());
        let mut negative = [0.125; INDICATOR_COUNT];
        negative[0] = -0.125;
        negative[1] = 0.375;
        assert!(WeightVector::from_weights(negative).is_err());
    }

    #[test]
    fn test_renormalized_over_subset() {
        let weights = WeightVector::from_weights([0.125; INDICATOR_COUNT]).unwrap();
        let mut present = [true; INDICATOR_COUNT];
        present[0] = false;
        present[1] = false;
        let renormalized = weights.renormalized_over(&present).unwrap();
        assert_eq!(renormalized[0], 0.0);
        assert_relative_eq!(renormalized[2], 1.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(renormalized.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(weights.renormalized_over(&[false; INDICATOR_COUNT]).is_err());
    }
}
