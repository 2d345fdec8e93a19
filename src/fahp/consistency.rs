//! Consistency ratio diagnostic
//!
//! CI = (λmax - n) / (n - 1), CR = CI / RI[n], where λmax is the dominant
//! eigenvalue of the centroid-defuzzified matrix. The result never gates
//! weight derivation.

use super::matrix::FuzzyComparisonMatrix;
use crate::error::ConsistencyCheckUnavailable;
use serde::{Deserialize, Serialize};

/// Conventional acceptance threshold for the consistency ratio
pub const CONSISTENCY_THRESHOLD: f64 = 0.1;

const MAX_ITERATIONS: usize = 1000;
const CONVERGENCE_TOLERANCE: f64 = 1e-12;

/// Saaty random index for matrix sizes 1..=10
pub fn random_index(n: usize) -> Option<f64> {
    match n {
        1 | 2 => Some(0.0),
        3 => Some(0.58),
        4 => Some(0.9),
        5 => Some(1.12),
        6 => Some(1.24),
        7 => Some(1.32),
        8 => Some(1.41),
        9 => Some(1.45),
        10 => Some(1.49),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub size: usize,
    pub lambda_max: f64,
    pub consistency_index: f64,
    pub random_index: f64,
    pub consistency_ratio: f64,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.consistency_ratio <= CONSISTENCY_THRESHOLD
    }
}

/// Dominant eigenvalue of a positive square matrix by power iteration
pub fn dominant_eigenvalue(matrix: &[Vec<f64>]) -> Result<f64, ConsistencyCheckUnavailable> {
    let n = matrix.len();
    if n == 0 {
        return Err(ConsistencyCheckUnavailable::new("matrix is empty"));
    }
    if matrix.iter().any(|row| row.len() != n) {
        return Err(ConsistencyCheckUnavailable::new("matrix is not square"));
    }
    if matrix.iter().flatten().any(|v| !v.is_finite() || *v <= 0.0) {
        return Err(ConsistencyCheckUnavailable::new(
            "power iteration needs strictly positive finite entries",
        ));
    }

    let mut x = vec![1.0 / n as f64; n];
    let mut lambda = 0.0;

    for _ in 0..MAX_ITERATIONS {
        let y: Vec<f64> = matrix
            .iter()
            .map(|row| row.iter().zip(&x).map(|(a, b)| a * b).sum())
            .collect();

        // x sums to 1, so the growth factor is the sum of y
        let next_lambda: f64 = y.iter().sum();
        let next_x: Vec<f64> = y.iter().map(|v| v / next_lambda).collect();

        let drift = next_x
            .iter()
            .zip(&x)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0_f64, f64::max);
        let converged = drift < CONVERGENCE_TOLERANCE
            && (next_lambda - lambda).abs() < CONVERGENCE_TOLERANCE * next_lambda.max(1.0);

        x = next_x;
        lambda = next_lambda;

        if converged {
            return Ok(lambda);
        }
    }

    Err(ConsistencyCheckUnavailable::new(format!(
        "power iteration did not converge after {MAX_ITERATIONS} iterations"
    )))
}

/// Consistency ratio of the defuzzified comparison matrix
pub fn check_consistency(
    matrix: &FuzzyComparisonMatrix,
) -> Result<ConsistencyReport, ConsistencyCheckUnavailable> {
    let n = matrix.size();
    let random_index = random_index(n).ok_or_else(|| {
        ConsistencyCheckUnavailable::new(format!("no random index for a {n}×{n} matrix"))
    })?;

    let lambda_max = dominant_eigenvalue(&matrix.defuzzified())?;
    let consistency_index = if n > 1 {
        (lambda_max - n as f64) / (n as f64 - 1.0)
    } else {
        0.0
    };
    // RI is zero for n <= 2, where any judgment set counts as consistent
    let consistency_ratio = if random_index > 0.0 {
        consistency_index / random_index
    } else {
        0.0
    };

    Ok(ConsistencyReport {
        size: n,
        lambda_max,
        consistency_index,
        random_index,
        consistency_ratio,
    })
}
