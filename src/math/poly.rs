//! Least squares polynomial fits.
//!
//! A degree-15 monomial basis on raw creep times (hours, up to ~1e4) is
//! hopeless in double precision: `x^15` spans some sixty orders of magnitude.
//! We therefore fit in the mapped variable
//!
//! ```text
//! u = (x - center) / half_range,   u ∈ [-1, 1] over the fitted data
//! ```
//!
//! and keep the mapping next to the coefficients. Evaluation and
//! differentiation apply it transparently, so callers only ever see `x`.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::math::solve_least_squares;

/// A polynomial in the mapped variable `u = (x - center) / half_range`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polynomial {
    /// Ascending powers of `u`: `coeffs[k]` multiplies `u^k`.
    coeffs: Vec<f64>,
    center: f64,
    half_range: f64,
}

impl Polynomial {
    /// Fit a least squares polynomial of the given degree to `(x, y)`.
    ///
    /// Requires at least `degree + 1` points and a non-degenerate x range.
    pub fn fit(x: &[f64], y: &[f64], degree: usize) -> Result<Self, AppError> {
        if x.len() != y.len() {
            return Err(AppError::invalid_input(format!(
                "Polynomial fit needs equal-length inputs (got {} x, {} y).",
                x.len(),
                y.len()
            )));
        }
        let n = x.len();
        let p = degree + 1;
        if n < p {
            return Err(AppError::insufficient_data(format!(
                "A degree-{degree} fit needs at least {p} points, got {n}."
            )));
        }
        if x.iter().chain(y).any(|v| !v.is_finite()) {
            return Err(AppError::invalid_input("Polynomial fit input contains non-finite values."));
        }

        let x_min = x.iter().copied().fold(f64::INFINITY, f64::min);
        let x_max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let half_range = 0.5 * (x_max - x_min);
        if !(half_range > 0.0) {
            return Err(AppError::invalid_input(format!(
                "Polynomial fit needs a non-zero x range (all x = {x_min})."
            )));
        }
        let center = 0.5 * (x_max + x_min);

        let mut vander = DMatrix::<f64>::zeros(n, p);
        for (i, &xi) in x.iter().enumerate() {
            let u = (xi - center) / half_range;
            let mut power = 1.0;
            for k in 0..p {
                vander[(i, k)] = power;
                power *= u;
            }
        }
        let rhs = DVector::from_column_slice(y);

        let beta = solve_least_squares(&vander, &rhs).ok_or_else(|| {
            AppError::internal(format!("Degree-{degree} least squares fit did not produce a finite solution."))
        })?;

        Ok(Self {
            coeffs: beta.iter().copied().collect(),
            center,
            half_range,
        })
    }

    /// Evaluate at `x` (Horner's scheme in the mapped variable).
    pub fn eval(&self, x: f64) -> f64 {
        let u = (x - self.center) / self.half_range;
        self.coeffs.iter().rev().fold(0.0, |acc, &c| acc * u + c)
    }

    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    /// The analytic derivative `d/dx`, expressed on the same mapping.
    pub fn derivative(&self) -> Polynomial {
        let coeffs = if self.coeffs.len() <= 1 {
            vec![0.0]
        } else {
            self.coeffs
                .iter()
                .enumerate()
                .skip(1)
                .map(|(k, &c)| k as f64 * c / self.half_range)
                .collect()
        };
        Polynomial {
            coeffs,
            center: self.center,
            half_range: self.half_range,
        }
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    pub fn center(&self) -> f64 {
        self.center
    }

    pub fn half_range(&self) -> f64 {
        self.half_range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_a_cubic_exactly() {
        let x: Vec<f64> = (0..40).map(|i| i as f64 * 250.0).collect();
        let y: Vec<f64> = x.iter().map(|&t| 1e-3 + 2e-6 * t - 3e-10 * t * t + 1e-14 * t * t * t).collect();
        let poly = Polynomial::fit(&x, &y, 3).unwrap();
        for (&t, &v) in x.iter().zip(&y) {
            assert!((poly.eval(t) - v).abs() < 1e-12, "at t={t}: {} vs {v}", poly.eval(t));
        }
        let d = poly.derivative();
        let t = 4_000.0;
        let expected = 2e-6 - 6e-10 * t + 3e-14 * t * t;
        assert!((d.eval(t) - expected).abs() < 1e-12);
    }

    #[test]
    fn degree_fifteen_fit_is_stable_on_long_time_axis() {
        let x: Vec<f64> = (0..200).map(|i| i as f64 * 50.0).collect();
        let y: Vec<f64> = x.iter().map(|&t| 0.01 * (1.0 - (-t / 800.0).exp()) + 1e-6 * t).collect();
        let poly = Polynomial::fit(&x, &y, 15).unwrap();
        assert_eq!(poly.degree(), 15);
        let max_err = x
            .iter()
            .zip(&y)
            .map(|(&t, &v)| (poly.eval(t) - v).abs())
            .fold(0.0, f64::max);
        assert!(max_err < 1e-6, "max residual {max_err}");
    }

    #[test]
    fn too_few_points_is_insufficient_data() {
        let err = Polynomial::fit(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0], 15).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InsufficientData);
    }

    #[test]
    fn zero_width_x_range_is_rejected() {
        let err = Polynomial::fit(&[1.0; 5], &[0.0, 1.0, 2.0, 3.0, 4.0], 2).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidInput);
    }

    #[test]
    fn derivative_of_constant_is_zero() {
        let poly = Polynomial::fit(&[0.0, 1.0, 2.0], &[5.0, 5.0, 5.0], 0).unwrap();
        assert!((poly.eval(7.0) - 5.0).abs() < 1e-12);
        assert_eq!(poly.derivative().eval(3.0), 0.0);
    }
}
