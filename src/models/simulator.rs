//! The simulation oracle boundary.
//!
//! A simulator integrates the constitutive model for one parameter vector at
//! every configured stress level and hands back one predicted creep curve per
//! test case. Integration can diverge or stall for unphysical parameters, which
//! is routine during a search; that outcome is a value ([`Simulation::Failed`]),
//! never a panic or an error.

use crate::domain::Curve;

/// Outcome of one simulator invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Simulation {
    /// One predicted curve per test case, in profile order.
    Curves(Vec<Curve>),
    /// No usable prediction for these parameters.
    Failed { reason: String },
}

impl Simulation {
    pub fn failed(reason: impl Into<String>) -> Self {
        Simulation::Failed { reason: reason.into() }
    }
}

/// A reentrant creep simulator.
///
/// `Sync` so a whole population can be scored in parallel against one instance.
pub trait CreepSimulator: Sync {
    fn simulate(&self, params: &[f64]) -> Simulation;
}

impl<F> CreepSimulator for F
where
    F: Fn(&[f64]) -> Simulation + Sync,
{
    fn simulate(&self, params: &[f64]) -> Simulation {
        self(params)
    }
}

/// Returns the same pre-computed curves for every parameter vector.
///
/// Used to score simulator output that was produced elsewhere and saved to disk.
#[derive(Debug, Clone)]
pub struct ReplaySimulator {
    curves: Vec<Curve>,
}

impl ReplaySimulator {
    pub fn new(curves: Vec<Curve>) -> Self {
        Self { curves }
    }
}

impl CreepSimulator for ReplaySimulator {
    fn simulate(&self, _params: &[f64]) -> Simulation {
        if self.curves.is_empty() {
            return Simulation::failed("replay source holds no curves");
        }
        Simulation::Curves(self.curves.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_simulators() {
        let sim = |p: &[f64]| {
            if p[0] > 0.0 {
                Simulation::Curves(vec![Curve::default()])
            } else {
                Simulation::failed("negative")
            }
        };
        assert!(matches!(sim.simulate(&[1.0]), Simulation::Curves(_)));
        assert_eq!(sim.simulate(&[-1.0]), Simulation::failed("negative"));
    }

    #[test]
    fn empty_replay_fails() {
        let sim = ReplaySimulator::new(Vec::new());
        assert!(matches!(sim.simulate(&[]), Simulation::Failed { .. }));
    }
}
