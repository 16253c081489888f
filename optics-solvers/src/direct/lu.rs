//! LU decomposition solver
//!
//! Provides LU factorization with partial pivoting for solving small dense real systems,
//! such as the normal equations of a least-squares ray intersection.
//!
//! Singularity is judged relative to the largest absolute entry of the matrix: a pivot
//! smaller than `tolerance * max|a_ij|` rejects the system. An absolute threshold would let
//! a nearly rank-deficient system through whenever its entries are large.

use ndarray::{Array1, Array2};
use thiserror::Error;

/// Default relative pivot tolerance
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-12;

/// Errors that can occur during LU factorization
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LuError {
    /// A pivot fell below the relative tolerance
    #[error("matrix is singular (pivot {pivot:e} at column {column}, scale {scale:e})")]
    SingularMatrix {
        /// Column where elimination failed
        column: usize,
        /// Magnitude of the rejected pivot
        pivot: f64,
        /// Largest absolute entry of the input matrix
        scale: f64,
    },
    /// Matrix or right-hand side has the wrong shape
    #[error("matrix dimensions mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        got: usize,
    },
    /// Matrix contains NaN or infinite entries
    #[error("matrix contains non-finite entries")]
    NonFinite,
}

/// A specialized `Result` type for LU operations.
pub type Result<T> = std::result::Result<T, LuError>;

impl LuError {
    /// Returns `true` if the system was rejected as singular.
    pub fn is_singular(&self) -> bool {
        matches!(self, LuError::SingularMatrix { .. })
    }

    /// Returns `true` if this is a dimension mismatch error.
    pub fn is_dimension_error(&self) -> bool {
        matches!(self, LuError::DimensionMismatch { .. })
    }
}

/// LU factorization result
///
/// Stores L and U factors along with pivot information
#[derive(Debug, Clone)]
pub struct LuFactorization {
    /// Combined L and U matrices (L is unit lower triangular, stored below diagonal)
    pub lu: Array2<f64>,
    /// Row permutation applied during elimination
    pub pivots: Vec<usize>,
    /// Matrix dimension
    pub n: usize,
}

impl LuFactorization {
    /// Solve Ax = b using the pre-computed LU factorization
    pub fn solve(&self, b: &Array1<f64>) -> Result<Array1<f64>> {
        if b.len() != self.n {
            return Err(LuError::DimensionMismatch {
                expected: self.n,
                got: b.len(),
            });
        }

        // Apply row permutation: x = Pb
        let mut x: Array1<f64> = self.pivots.iter().map(|&p| b[p]).collect();

        // Forward substitution: Ly = Pb
        for i in 0..self.n {
            for j in 0..i {
                x[i] -= self.lu[[i, j]] * x[j];
            }
        }

        // Backward substitution: Ux = y
        for i in (0..self.n).rev() {
            for j in (i + 1)..self.n {
                x[i] -= self.lu[[i, j]] * x[j];
            }
            x[i] /= self.lu[[i, i]];
        }

        Ok(x)
    }
}

/// Compute LU factorization with partial pivoting
///
/// # Arguments
/// * `a` - Square matrix
/// * `tolerance` - Relative pivot threshold, scaled by the largest absolute entry of `a`
pub fn lu_factorize_with_tolerance(a: &Array2<f64>, tolerance: f64) -> Result<LuFactorization> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(LuError::DimensionMismatch {
            expected: n,
            got: a.ncols(),
        });
    }
    if a.iter().any(|v| !v.is_finite()) {
        return Err(LuError::NonFinite);
    }

    let scale = a.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let threshold = tolerance * scale;

    let mut lu = a.clone();
    let mut pivots: Vec<usize> = (0..n).collect();

    for k in 0..n {
        // Find pivot
        let mut max_val = lu[[k, k]].abs();
        let mut max_row = k;

        for i in (k + 1)..n {
            let val = lu[[i, k]].abs();
            if val > max_val {
                max_val = val;
                max_row = i;
            }
        }

        // Check for singularity (an all-zero matrix has scale 0 and fails here too)
        if max_val <= threshold {
            log::debug!(
                "LU rejected: pivot {:e} at column {} below {:e} (scale {:e})",
                max_val,
                k,
                threshold,
                scale
            );
            return Err(LuError::SingularMatrix {
                column: k,
                pivot: max_val,
                scale,
            });
        }

        // Swap rows if needed
        if max_row != k {
            for j in 0..n {
                lu.swap([k, j], [max_row, j]);
            }
            pivots.swap(k, max_row);
        }

        // Compute multipliers and eliminate
        let pivot = lu[[k, k]];
        for i in (k + 1)..n {
            let mult = lu[[i, k]] / pivot;
            lu[[i, k]] = mult; // Store multiplier in L part

            for j in (k + 1)..n {
                let update = mult * lu[[k, j]];
                lu[[i, j]] -= update;
            }
        }
    }

    Ok(LuFactorization { lu, pivots, n })
}

/// Solve Ax = b using LU decomposition
///
/// This is a convenience function that combines factorization and solve.
pub fn lu_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    lu_solve_with_tolerance(a, b, DEFAULT_PIVOT_TOLERANCE)
}

/// Solve Ax = b with an explicit relative pivot tolerance
pub fn lu_solve_with_tolerance(
    a: &Array2<f64>,
    b: &Array1<f64>,
    tolerance: f64,
) -> Result<Array1<f64>> {
    let factorization = lu_factorize_with_tolerance(a, tolerance)?;
    factorization.solve(b)
}
