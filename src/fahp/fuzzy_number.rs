//! Triangular fuzzy numbers
//!
//! A judgment (a, b, c) holds the pessimistic, most likely and optimistic
//! values of a pairwise comparison. Arithmetic here is componentwise, which
//! is what the weight derivation relies on.

use crate::error::{Result, SoilHealthError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// Fuzzy triangular number with a <= b <= c
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 3]", into = "[f64; 3]")]
pub struct TriangularFuzzyNumber {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl TriangularFuzzyNumber {
    pub const ONE: TriangularFuzzyNumber = TriangularFuzzyNumber { a: 1.0, b: 1.0, c: 1.0 };
    pub const ZERO: TriangularFuzzyNumber = TriangularFuzzyNumber { a: 0.0, b: 0.0, c: 0.0 };

    /// Checked constructor
    pub fn new(a: f64, b: f64, c: f64) -> Result<Self> {
        let tfn = Self { a, b, c };
        if !tfn.is_finite() {
            return Err(SoilHealthError::configuration(format!(
                "fuzzy number {tfn} has non-finite components"
            )));
        }
        if !tfn.is_ordered() {
            return Err(SoilHealthError::configuration(format!(
                "fuzzy number {tfn} violates a <= b <= c"
            )));
        }
        Ok(tfn)
    }

    /// Constructor for compile-time constants known to be ordered
    pub const fn from_parts(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    pub fn is_ordered(&self) -> bool {
        self.a <= self.b && self.b <= self.c
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }

    /// Componentwise power
    pub fn powf(self, exponent: f64) -> Self {
        Self {
            a: self.a.powf(exponent),
            b: self.b.powf(exponent),
            c: self.c.powf(exponent),
        }
    }

    /// Componentwise division (a/a', b/b', c/c').
    ///
    /// Not the textbook fuzzy division, which would pair each bound with the
    /// opposite bound of the divisor.
    pub fn div_componentwise(self, divisor: Self) -> Self {
        Self {
            a: self.a / divisor.a,
            b: self.b / divisor.b,
            c: self.c / divisor.c,
        }
    }

    /// Fuzzy reciprocal (1/c, 1/b, 1/a)
    pub fn reciprocal(self) -> Self {
        Self {
            a: 1.0 / self.c,
            b: 1.0 / self.b,
            c: 1.0 / self.a,
        }
    }

    /// Centroid defuzzification
    pub fn centroid(self) -> f64 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Largest componentwise absolute difference
    pub fn max_abs_diff(self, other: Self) -> f64 {
        (self.a - other.a)
            .abs()
            .max((self.b - other.b).abs())
            .max((self.c - other.c).abs())
    }
}

impl Mul for TriangularFuzzyNumber {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self {
            a: self.a * rhs.a,
            b: self.b * rhs.b,
            c: self.c * rhs.c,
        }
    }
}

impl Add for TriangularFuzzyNumber {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            a: self.a + rhs.a,
            b: self.b + rhs.b,
            c: self.c + rhs.c,
        }
    }
}

impl fmt::Display for TriangularFuzzyNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.a, self.b, self.c)
    }
}

impl TryFrom<[f64; 3]> for TriangularFuzzyNumber {
    type Error = SoilHealthError;

    fn try_from(parts: [f64; 3]) -> Result<Self> {
        Self::new(parts[0], parts[1], parts[2])
    }
}

impl From<TriangularFuzzyNumber> for [f64; 3] {
    fn from(tfn: TriangularFuzzyNumber) -> Self {
        [tfn.a, tfn.b, tfn.c]
    }
}
