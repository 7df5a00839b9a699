//! Least squares solver.
//!
//! The only regression we solve is the polynomial fit of each experimental
//! creep curve, a tall Vandermonde system (hundreds of rows, 16 columns).
//!
//! Implementation choices:
//! - SVD rather than QR: nalgebra's `QR::solve` is intended for square systems
//!   and panics on tall matrices.
//! - The singular value cutoff is relative to the largest singular value, so
//!   the same tolerances work regardless of how the columns are scaled.

use nalgebra::{DMatrix, DVector};

/// Solve `min ||x β - y||²` using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() != y.len() || x.ncols() == 0 {
        return None;
    }

    let svd = x.clone().svd(true, true);
    let s_max = svd.singular_values.max();
    if !(s_max.is_finite() && s_max > 0.0) {
        return None;
    }

    // Try progressively looser cutoffs if the strict solve is not finite.
    for &rel_tol in &[1e-13, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, rel_tol * s_max) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}
