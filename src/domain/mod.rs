//! Domain types used throughout the calibration pipeline.
//!
//! This module defines:
//!
//! - sampled curves and experimental test cases (`Curve`, `TestCase`)
//! - objective selection (`ErrorMetric`, `MinRateSource`)
//! - search-engine facing metadata (`ParameterSpace`, `ProblemSpec`)
//! - export views (`EvaluationRecord`, `ProfileSummary`)

pub mod types;

pub use types::*;
