//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during scoring
//! - exported to JSON/CSV
//! - handed to an external search engine as plain data

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One objective vector: one scalar per requested [`ErrorMetric`], same order.
pub type ErrorVector = Vec<f64>;

/// A sampled curve `(x, y)`, typically time (hours) against strain.
///
/// `x` is expected to be non-decreasing but may contain plateaus.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Curve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Curve {
    /// Build a curve, rejecting mismatched lengths.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self, AppError> {
        if x.len() != y.len() {
            return Err(AppError::invalid_input(format!(
                "Curve length mismatch: {} x values vs {} y values.",
                x.len(),
                y.len()
            )));
        }
        Ok(Self { x, y })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// True when every sample in both coordinates is finite.
    pub fn is_finite(&self) -> bool {
        self.x.iter().chain(self.y.iter()).all(|v| v.is_finite())
    }

    /// The rightmost point: maximum `x` and the `y` paired with its first occurrence.
    pub fn end_point(&self) -> Option<(f64, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, &x) in self.x.iter().enumerate() {
            match best {
                Some((_, bx)) if x <= bx => {}
                _ => best = Some((i, x)),
            }
        }
        let (idx, x_end) = best?;
        Some((x_end, *self.y.get(idx)?))
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// One experimental creep test: a curve measured at a fixed stress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    /// Applied stress (MPa).
    pub stress: f64,
    pub curve: Curve,
}

/// The error terms a candidate can be scored on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum ErrorMetric {
    /// Mean vertical gap between the thinned prediction and the experimental fit.
    #[serde(rename = "err_area")]
    #[value(name = "err_area")]
    Area,
    /// Horizontal distance between curve endpoints.
    #[serde(rename = "err_x_end")]
    #[value(name = "err_x_end")]
    XEnd,
    /// Vertical distance between curve endpoints.
    #[serde(rename = "err_y_end")]
    #[value(name = "err_y_end")]
    YEnd,
    /// Difference between minimum creep rates.
    #[serde(rename = "err_mrate")]
    #[value(name = "err_mrate")]
    MinRate,
}

impl ErrorMetric {
    /// Canonical order used when no explicit list is supplied.
    pub const ALL: [ErrorMetric; 4] = [
        ErrorMetric::Area,
        ErrorMetric::XEnd,
        ErrorMetric::YEnd,
        ErrorMetric::MinRate,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ErrorMetric::Area => "err_area",
            ErrorMetric::XEnd => "err_x_end",
            ErrorMetric::YEnd => "err_y_end",
            ErrorMetric::MinRate => "err_mrate",
        }
    }
}

impl fmt::Display for ErrorMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ErrorMetric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ErrorMetric::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                AppError::invalid_input(format!(
                    "Unknown error kind '{s}'. Expected one of: err_area, err_x_end, err_y_end, err_mrate."
                ))
            })
    }
}

/// Where the experimental minimum creep rate is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MinRateSource {
    /// Analytic derivative of the polynomial fit, evaluated at the raw x samples.
    Polynomial,
    /// Forward finite differences of the raw experimental samples.
    FiniteDifference,
}

/// Named, bounded parameters of a constitutive model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpace {
    pub names: Vec<String>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl ParameterSpace {
    pub fn new(names: Vec<String>, lower: Vec<f64>, upper: Vec<f64>) -> Result<Self, AppError> {
        if names.len() != lower.len() || names.len() != upper.len() {
            return Err(AppError::invalid_input(format!(
                "Parameter space mismatch: {} names, {} lower bounds, {} upper bounds.",
                names.len(),
                lower.len(),
                upper.len()
            )));
        }
        for ((name, &lo), &hi) in names.iter().zip(&lower).zip(&upper) {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(AppError::invalid_input(format!(
                    "Invalid bounds for parameter '{name}': [{lo}, {hi}]."
                )));
            }
        }
        Ok(Self { names, lower, upper })
    }

    pub fn dimension(&self) -> usize {
        self.names.len()
    }

    /// True when `params` has the right length and lies inside the box.
    pub fn contains(&self, params: &[f64]) -> bool {
        params.len() == self.dimension()
            && params
                .iter()
                .zip(self.lower.iter().zip(&self.upper))
                .all(|(&p, (&lo, &hi))| p >= lo && p <= hi)
    }

    pub fn midpoint(&self) -> Vec<f64> {
        self.lower
            .iter()
            .zip(&self.upper)
            .map(|(&lo, &hi)| 0.5 * (lo + hi))
            .collect()
    }
}

/// Static problem metadata for an external multi-objective search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemSpec {
    pub n_var: usize,
    pub n_obj: usize,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub objectives: Vec<ErrorMetric>,
}

/// A scored candidate, as handed to a recorder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub params: Vec<f64>,
    pub errors: ErrorVector,
}

/// Serializable view of one experimental profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub name: String,
    pub stress: f64,
    pub n_points: usize,
    /// Ascending-power coefficients in the mapped variable `u = (x - center) / half_range`.
    pub coeffs: Vec<f64>,
    pub center: f64,
    pub half_range: f64,
    pub x_end: f64,
    pub y_end: f64,
    pub min_rate: f64,
    pub min_rate_source: MinRateSource,
    pub fit_rmse: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags, environment fallbacks, and defaults.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub info_path: PathBuf,
    pub data_path: PathBuf,
    /// Tests to include, in scoring order; empty means all.
    pub tests: Vec<String>,
    pub min_rate_source: MinRateSource,

    /// Saved simulator output to score (`creep score` only).
    pub predicted_path: Option<PathBuf>,
    pub objectives: Vec<ErrorMetric>,
    /// Candidate to score; `None` means the midpoint of the parameter space.
    pub params: Option<Vec<f64>>,
    pub density: usize,
    pub min_data: usize,

    pub export_profiles: Option<PathBuf>,
    pub record_path: Option<PathBuf>,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
}
