//! Fuzzy pairwise comparison matrix
//!
//! Entry (i, j) is the importance of indicator i relative to indicator j.
//! The expert matrix below is the fixed judgment set used for every
//! assessment; it is never derived from user input.

use super::fuzzy_number::TriangularFuzzyNumber;
use crate::error::{Result, SoilHealthError};
use crate::indicators::INDICATOR_COUNT;
use serde::{Deserialize, Serialize};

const fn t(a: f64, b: f64, c: f64) -> TriangularFuzzyNumber {
    TriangularFuzzyNumber::from_parts(a, b, c)
}

const EQUAL: TriangularFuzzyNumber = t(1.0, 1.0, 1.0);
const MODERATE: TriangularFuzzyNumber = t(1.0, 2.0, 3.0);
const STRONG: TriangularFuzzyNumber = t(2.0, 3.0, 4.0);
const MODERATE_INV: TriangularFuzzyNumber = t(1.0 / 3.0, 1.0 / 2.0, 1.0);
const STRONG_INV: TriangularFuzzyNumber = t(1.0 / 4.0, 1.0 / 3.0, 1.0 / 2.0);

// Rows/columns: pH, N, P, K, EC, Temperature, Moisture, Humidity
const EXPERT_MATRIX: [[TriangularFuzzyNumber; INDICATOR_COUNT]; INDICATOR_COUNT] = [
    [EQUAL, MODERATE, MODERATE, MODERATE, STRONG, MODERATE, STRONG, MODERATE],
    [MODERATE_INV, EQUAL, MODERATE, MODERATE, STRONG, MODERATE, STRONG, MODERATE],
    [MODERATE_INV, MODERATE_INV, EQUAL, MODERATE, STRONG, MODERATE, STRONG, MODERATE],
    [MODERATE_INV, MODERATE_INV, MODERATE_INV, EQUAL, MODERATE, MODERATE, STRONG, MODERATE],
    [STRONG_INV, STRONG_INV, STRONG_INV, MODERATE_INV, EQUAL, MODERATE, MODERATE, MODERATE],
    [MODERATE_INV, MODERATE_INV, MODERATE_INV, MODERATE_INV, MODERATE_INV, EQUAL, MODERATE, MODERATE],
    [STRONG_INV, STRONG_INV, STRONG_INV, STRONG_INV, MODERATE_INV, MODERATE_INV, EQUAL, MODERATE],
    [MODERATE_INV, MODERATE_INV, MODERATE_INV, MODERATE_INV, MODERATE_INV, MODERATE_INV, MODERATE_INV, EQUAL],
];

/// Square matrix of triangular fuzzy judgments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Vec<Vec<TriangularFuzzyNumber>>",
    into = "Vec<Vec<TriangularFuzzyNumber>>"
)]
pub struct FuzzyComparisonMatrix {
    rows: Vec<Vec<TriangularFuzzyNumber>>,
}

impl FuzzyComparisonMatrix {
    /// Validate and wrap a matrix
    ///
    /// Rejects empty or non-square input, unordered or non-positive
    /// judgments, and diagonal entries other than (1, 1, 1).
    pub fn new(rows: Vec<Vec<TriangularFuzzyNumber>>) -> Result<Self> {
        let n = rows.len();
        if n == 0 {
            return Err(SoilHealthError::configuration("comparison matrix is empty"));
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(SoilHealthError::configuration(format!(
                    "comparison matrix row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
            for (j, tfn) in row.iter().enumerate() {
                if !tfn.is_finite() || !tfn.is_ordered() {
                    return Err(SoilHealthError::configuration(format!(
                        "comparison matrix entry ({i}, {j}) = {tfn} is not an ordered fuzzy number"
                    )));
                }
                if tfn.a <= 0.0 {
                    return Err(SoilHealthError::configuration(format!(
                        "comparison matrix entry ({i}, {j}) = {tfn} must be strictly positive"
                    )));
                }
            }
            if row[i] != TriangularFuzzyNumber::ONE {
                return Err(SoilHealthError::configuration(format!(
                    "comparison matrix diagonal ({i}, {i}) = {} must be (1, 1, 1)",
                    row[i]
                )));
            }
        }

        Ok(Self { rows })
    }

    /// The fixed expert judgments for the 8 soil indicators
    pub fn expert_default() -> Self {
        Self {
            rows: EXPERT_MATRIX.iter().map(|row| row.to_vec()).collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<TriangularFuzzyNumber>] {
        &self.rows
    }

    pub fn get(&self, i: usize, j: usize) -> Option<TriangularFuzzyNumber> {
        self.rows.get(i).and_then(|row| row.get(j)).copied()
    }

    /// Crisp matrix by centroid defuzzification of every entry
    pub fn defuzzified(&self) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|tfn| tfn.centroid()).collect())
            .collect()
    }

    /// Largest deviation of m[j][i] from the fuzzy reciprocal of m[i][j].
    ///
    /// Zero for a perfectly reciprocal matrix. Reported only; the weight
    /// derivation accepts non-reciprocal judgments.
    pub fn reciprocity_deviation(&self) -> f64 {
        let n = self.size();
        let mut worst: f64 = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let expected = self.rows[i][j].reciprocal();
                worst = worst.max(self.rows[j][i].max_abs_diff(expected));
            }
        }
        worst
    }
}

impl Default for FuzzyComparisonMatrix {
    fn default() -> Self {
        Self::expert_default()
    }
}

impl TryFrom<Vec<Vec<TriangularFuzzyNumber>>> for FuzzyComparisonMatrix {
    type Error = SoilHealthError;

    fn try_from(rows: Vec<Vec<TriangularFuzzyNumber>>) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<FuzzyComparisonMatrix> for Vec<Vec<TriangularFuzzyNumber>> {
    fn from(matrix: FuzzyComparisonMatrix) -> Self {
        matrix.rows
    }
}
