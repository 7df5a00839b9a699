//! Precomputed experimental profiles.
//!
//! Every evaluation compares predictions against the same experimental
//! curves, so the expensive part (a degree-15 least squares fit) and the
//! scalar descriptors are computed once at startup and then only read.

use tracing::debug;

use crate::domain::{MinRateSource, ProfileSummary, TestCase};
use crate::error::AppError;
use crate::math::{Polynomial, min_rate};

/// Degree of the smooth experimental fit.
pub const POLY_DEG: usize = 15;

/// Immutable summary of one experimental creep test.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentalProfile {
    pub name: String,
    pub stress: f64,
    pub poly: Polynomial,
    pub x_end: f64,
    pub y_end: f64,
    pub min_rate: f64,
    pub min_rate_source: MinRateSource,
    pub n_points: usize,
    /// Root mean square residual of the polynomial over the raw samples.
    pub fit_rmse: f64,
}

impl ExperimentalProfile {
    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            name: self.name.clone(),
            stress: self.stress,
            n_points: self.n_points,
            coeffs: self.poly.coeffs().to_vec(),
            center: self.poly.center(),
            half_range: self.poly.half_range(),
            x_end: self.x_end,
            y_end: self.y_end,
            min_rate: self.min_rate,
            min_rate_source: self.min_rate_source,
            fit_rmse: self.fit_rmse,
        }
    }
}

/// Build the profile for a single test case.
pub fn build_profile(case: &TestCase, source: MinRateSource) -> Result<ExperimentalProfile, AppError> {
    let curve = &case.curve;
    if curve.x.len() != curve.y.len() {
        return Err(AppError::invalid_input(format!(
            "Test '{}': {} time values vs {} strain values.",
            case.name,
            curve.x.len(),
            curve.y.len()
        )));
    }
    if curve.len() < POLY_DEG + 1 {
        return Err(AppError::insufficient_data(format!(
            "Test '{}' has {} points; the degree-{POLY_DEG} fit needs at least {}.",
            case.name,
            curve.len(),
            POLY_DEG + 1
        )));
    }

    let poly = Polynomial::fit(&curve.x, &curve.y, POLY_DEG)
        .map_err(|e| AppError::new(e.kind(), format!("Test '{}': {e}", case.name)))?;

    let (x_end, y_end) = curve
        .end_point()
        .ok_or_else(|| AppError::insufficient_data(format!("Test '{}' has no samples.", case.name)))?;

    let min_rate = match source {
        MinRateSource::Polynomial => {
            let d = poly.derivative();
            curve.x.iter().map(|&x| d.eval(x)).fold(f64::INFINITY, f64::min)
        }
        MinRateSource::FiniteDifference => min_rate(&curve.x, &curve.y),
    };

    let sse: f64 = curve.points().map(|(x, y)| (poly.eval(x) - y).powi(2)).sum();
    let fit_rmse = (sse / curve.len() as f64).sqrt();

    debug!(
        test = %case.name,
        n = curve.len(),
        x_end,
        y_end,
        min_rate,
        fit_rmse,
        "built experimental profile"
    );

    Ok(ExperimentalProfile {
        name: case.name.clone(),
        stress: case.stress,
        poly,
        x_end,
        y_end,
        min_rate,
        min_rate_source: source,
        n_points: curve.len(),
        fit_rmse,
    })
}

/// Build one profile per test case, preserving order.
///
/// Any test that cannot be profiled aborts the whole build.
pub fn build_profiles(cases: &[TestCase], source: MinRateSource) -> Result<Vec<ExperimentalProfile>, AppError> {
    if cases.is_empty() {
        return Err(AppError::insufficient_data("No experimental test cases supplied."));
    }
    cases.iter().map(|case| build_profile(case, source)).collect()
}
