//! `creep-calib` library crate.
//!
//! Scores candidate parameter sets of a creep constitutive model against
//! measured creep curves, producing one error vector per candidate for a
//! multi-objective search.
//!
//! The binary (`creep`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the evaluator can be embedded in any search engine
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod models;
pub mod objective;
pub mod plot;
pub mod report;
