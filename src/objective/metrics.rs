//! Error terms comparing predicted curves against experimental profiles.
//!
//! Each metric takes the full set of predicted curves (one per test case, in
//! profile order) and sums an unsigned per-test difference, so an overshoot
//! at one stress never cancels an undershoot at another.
//!
//! The metrics are public and accept arbitrary input: a curve count that
//! differs from the profile count, an empty curve, or a curve with ragged
//! x/y lengths makes the whole metric return [`INFEASIBLE`].

use crate::domain::{Curve, ErrorMetric};
use crate::math::min_rate;
use crate::objective::evaluator::INFEASIBLE;
use crate::objective::profile::ExperimentalProfile;
use crate::objective::thin::thin_indexes;

/// Mean vertical gap between each thinned prediction and its experimental fit, summed over tests.
///
/// The experimental side is the polynomial evaluated at the predicted x
/// samples, so both sides share one x basis regardless of native sampling.
pub fn area_error(predicted: &[Curve], profiles: &[ExperimentalProfile], density: usize) -> f64 {
    if !scorable(predicted, profiles) {
        return INFEASIBLE;
    }
    let mut total = 0.0;
    for (curve, profile) in predicted.iter().zip(profiles) {
        let idx = thin_indexes(curve.len(), density);
        let gap: f64 = idx
            .iter()
            .map(|&j| (curve.y[j] - profile.poly.eval(curve.x[j])).abs())
            .sum();
        total += gap / idx.len() as f64;
    }
    total
}

/// Sum of `|x_end(pred) - x_end(exp)|`.
pub fn x_end_error(predicted: &[Curve], profiles: &[ExperimentalProfile]) -> f64 {
    if !scorable(predicted, profiles) {
        return INFEASIBLE;
    }
    let mut total = 0.0;
    for (curve, profile) in predicted.iter().zip(profiles) {
        let Some((x_end, _)) = curve.end_point() else {
            return INFEASIBLE;
        };
        total += (x_end - profile.x_end).abs();
    }
    total
}

/// Sum of `|y_end(pred) - y_end(exp)|`, each y taken at its own curve's maximum x.
pub fn y_end_error(predicted: &[Curve], profiles: &[ExperimentalProfile]) -> f64 {
    if !scorable(predicted, profiles) {
        return INFEASIBLE;
    }
    let mut total = 0.0;
    for (curve, profile) in predicted.iter().zip(profiles) {
        let Some((_, y_end)) = curve.end_point() else {
            return INFEASIBLE;
        };
        total += (y_end - profile.y_end).abs();
    }
    total
}

/// Sum of `|min_rate(pred) - min_rate(exp)|`.
///
/// The predicted rate always comes from raw finite differences; the
/// experimental one from whichever source the profile was built with.
pub fn min_rate_error(predicted: &[Curve], profiles: &[ExperimentalProfile]) -> f64 {
    if !scorable(predicted, profiles) {
        return INFEASIBLE;
    }
    let mut total = 0.0;
    for (curve, profile) in predicted.iter().zip(profiles) {
        total += (min_rate(&curve.x, &curve.y) - profile.min_rate).abs();
    }
    total
}

/// One non-empty, equal-length curve per profile.
fn scorable(predicted: &[Curve], profiles: &[ExperimentalProfile]) -> bool {
    predicted.len() == profiles.len() && predicted.iter().all(|c| !c.is_empty() && c.x.len() == c.y.len())
}

impl ErrorMetric {
    /// Compute this error term.
    pub fn compute(self, predicted: &[Curve], profiles: &[ExperimentalProfile], density: usize) -> f64 {
        match self {
            ErrorMetric::Area => area_error(predicted, profiles, density),
            ErrorMetric::XEnd => x_end_error(predicted, profiles),
            ErrorMetric::YEnd => y_end_error(predicted, profiles),
            ErrorMetric::MinRate => min_rate_error(predicted, profiles),
        }
    }
}
