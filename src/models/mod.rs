//! Constitutive model boundary.
//!
//! - the simulator contract and its tagged outcome (`simulator`)
//! - parameter metadata for the visco-plastic damage model (`visco_plastic`)

pub mod simulator;
pub mod visco_plastic;

pub use simulator::*;
