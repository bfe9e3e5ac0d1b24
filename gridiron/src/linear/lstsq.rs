//! Linear least squares.
//!
//! Solves an overdetermined (or underdetermined) system `Ax ≈ b` by minimising `‖b - Ax‖²`. The
//! solution is computed from the singular value decomposition of `A`, so rank-deficient designs
//! are accepted; among the infinitely many minimisers, the one with the smallest norm is returned.

use nalgebra::{DMatrix, DVector};
use thiserror::Error;
use tracing::trace;

use crate::linear::matrix::Matrix;

#[derive(Debug, Error, PartialEq)]
pub enum SolveError {
    #[error("the design matrix is empty")]
    Empty,

    #[error("design matrix has {rows} rows but the response vector has {len} elements")]
    DimensionMismatch { rows: usize, len: usize },

    #[error("singular value decomposition did not converge")]
    NoConvergence,
}

/// The outcome of a least-squares solve.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// The minimum-norm minimiser of the sum of squared residuals.
    pub x: Vec<f64>,

    /// The effective rank of the design: the number of singular values above the cutoff.
    pub rank: usize,

    /// Singular values of the design, in descending order.
    pub singular_values: Vec<f64>,

    pub r_squared: RSquared,
}
impl Solution {
    pub fn is_rank_deficient(&self, expected_rank: usize) -> bool {
        self.rank < expected_rank
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RSquared {
    pub sum_sq_residual: f64,
    pub sum_sq_total: f64,
    pub samples: usize,
}
impl RSquared {
    /// `1 - SSR/SST`. Undefined (`NaN`) when the response is constant.
    pub fn unadjusted(&self) -> f64 {
        1. - self.sum_sq_residual / self.sum_sq_total
    }
}

/// Convergence threshold of the iterative SVD. Tighter values stall the bidiagonal sweeps and
/// return an inaccurate decomposition.
const SVD_CONVERGENCE_EPS: f64 = f64::EPSILON * 5.0;

/// The default relative cutoff for small singular values: machine epsilon scaled by the larger
/// of the two design dimensions.
pub fn default_rcond(rows: usize, cols: usize) -> f64 {
    f64::EPSILON * rows.max(cols) as f64
}

/// Solves `design · x ≈ response` in the least-squares sense.
///
/// Singular values less than or equal to `rcond` times the largest singular value are treated
/// as zero. When `rcond` is `None`, [default_rcond] applies.
pub fn solve(
    design: &Matrix<f64>,
    response: &[f64],
    rcond: Option<f64>,
) -> Result<Solution, SolveError> {
    if design.rows() == 0 || design.cols() == 0 {
        return Err(SolveError::Empty);
    }
    if design.rows() != response.len() {
        return Err(SolveError::DimensionMismatch {
            rows: design.rows(),
            len: response.len(),
        });
    }

    let a = DMatrix::from_row_slice(design.rows(), design.cols(), design.as_slice());
    let b = DVector::from_column_slice(response);
    let svd = a
        .clone()
        .try_svd(true, true, SVD_CONVERGENCE_EPS, 0)
        .ok_or(SolveError::NoConvergence)?;

    let mut singular_values: Vec<f64> = svd.singular_values.iter().copied().collect();
    singular_values.sort_by(|a, b| b.total_cmp(a));
    let largest = singular_values.first().copied().unwrap_or(0.0);
    let cutoff = rcond.unwrap_or_else(|| default_rcond(design.rows(), design.cols())) * largest;
    let rank = singular_values.iter().filter(|&&value| value > cutoff).count();
    trace!("largest singular value {largest}, cutoff {cutoff}, rank {rank}");

    let x = svd
        .solve(&b, cutoff)
        .map_err(|_| SolveError::NoConvergence)?;

    let fitted = &a * &x;
    let samples = response.len();
    let mean = response.iter().sum::<f64>() / samples as f64;
    let (mut sum_sq_residual, mut sum_sq_total) = (0., 0.);
    for (index, &observed) in response.iter().enumerate() {
        sum_sq_residual += (observed - fitted[index]).powi(2);
        sum_sq_total += (observed - mean).powi(2);
    }

    Ok(Solution {
        x: x.iter().copied().collect(),
        rank,
        singular_values,
        r_squared: RSquared {
            sum_sq_residual,
            sum_sq_total,
            samples,
        },
    })
}
