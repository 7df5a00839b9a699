//! Objective function evaluation.
//!
//! Responsibilities:
//!
//! - precompute one read-only profile per experimental test (`profile`)
//! - thin predicted curves to a fixed density (`thin`)
//! - compute the individual error terms (`metrics`)
//! - turn a parameter vector into an error vector (`evaluator`)

pub mod evaluator;
pub mod metrics;
pub mod profile;
pub mod thin;

pub use evaluator::*;
pub use metrics::*;
pub use profile::*;
pub use thin::*;
