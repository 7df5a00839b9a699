//! The objective function handed to a multi-objective search.
//!
//! One call scores one parameter vector:
//!
//! 1. run the simulator
//! 2. reject the whole result if any curve is missing, short, or non-finite
//! 3. compute the requested error terms, in the requested order
//!
//! A rejected simulation scores [`INFEASIBLE`] on every objective; there is
//! no partial scoring.
//!
//! The evaluator holds only immutable profiles and configuration, so
//! `evaluate` takes `&self` and a population can be scored in parallel.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::domain::{Curve, ErrorMetric, ErrorVector, ParameterSpace, ProblemSpec};
use crate::error::AppError;
use crate::models::{CreepSimulator, Simulation};
use crate::objective::profile::ExperimentalProfile;
use crate::objective::thin::DATA_DENSITY;

/// Minimum number of samples a predicted curve needs to be scored.
///
/// The bound is exclusive: a curve with exactly `MIN_DATA` samples is scored.
/// Older tooling rejected that boundary too (`len <= MIN_DATA`); pass
/// `MIN_DATA + 1` as `EvaluatorConfig::min_data` to reproduce it.
pub const MIN_DATA: usize = 50;

/// Objective value reported for an unusable simulation.
pub const INFEASIBLE: f64 = 1.0e50;

/// Tunables for scoring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluatorConfig {
    /// Samples per curve for the area comparison.
    pub density: usize,
    /// Predicted curves shorter than this reject the simulation.
    pub min_data: usize,
    /// Value substituted for every objective on rejection.
    pub infeasible: f64,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            density: DATA_DENSITY,
            min_data: MIN_DATA,
            infeasible: INFEASIBLE,
        }
    }
}

/// Scores candidate parameter vectors against a fixed set of experimental profiles.
#[derive(Debug)]
pub struct ObjectiveEvaluator<S> {
    simulator: S,
    profiles: Vec<ExperimentalProfile>,
    space: ParameterSpace,
    objectives: Vec<ErrorMetric>,
    config: EvaluatorConfig,
}

impl<S: CreepSimulator> ObjectiveEvaluator<S> {
    pub fn new(
        simulator: S,
        profiles: Vec<ExperimentalProfile>,
        space: ParameterSpace,
        objectives: Vec<ErrorMetric>,
        config: EvaluatorConfig,
    ) -> Result<Self, AppError> {
        if profiles.is_empty() {
            return Err(AppError::invalid_input("An evaluator needs at least one experimental profile."));
        }
        if objectives.is_empty() {
            return Err(AppError::invalid_input("At least one error kind must be requested."));
        }
        if space.dimension() == 0 {
            return Err(AppError::invalid_input("The parameter space is empty."));
        }
        Ok(Self {
            simulator,
            profiles,
            space,
            objectives,
            config,
        })
    }

    /// Static metadata for the search engine.
    pub fn problem(&self) -> ProblemSpec {
        ProblemSpec {
            n_var: self.space.dimension(),
            n_obj: self.objectives.len(),
            lower: self.space.lower.clone(),
            upper: self.space.upper.clone(),
            objectives: self.objectives.clone(),
        }
    }

    pub fn profiles(&self) -> &[ExperimentalProfile] {
        &self.profiles
    }

    pub fn objectives(&self) -> &[ErrorMetric] {
        &self.objectives
    }

    pub fn space(&self) -> &ParameterSpace {
        &self.space
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Score one parameter vector. Never fails: rejections become [`INFEASIBLE`] entries.
    pub fn evaluate(&self, params: &[f64]) -> ErrorVector {
        if params.len() != self.space.dimension() {
            warn!(
                expected = self.space.dimension(),
                got = params.len(),
                "parameter vector has the wrong dimension"
            );
            return self.infeasible();
        }

        let curves = match self.simulator.simulate(params) {
            Simulation::Curves(curves) => curves,
            Simulation::Failed { reason } => {
                debug!(%reason, "simulation failed");
                return self.infeasible();
            }
        };

        if let Err(reason) = self.check_viable(&curves) {
            debug!(%reason, "simulation rejected");
            return self.infeasible();
        }

        self.objectives
            .iter()
            .map(|metric| metric.compute(&curves, &self.profiles, self.config.density))
            .collect()
    }

    /// Score a population in parallel; output order matches input order.
    pub fn evaluate_batch(&self, population: &[Vec<f64>]) -> Vec<ErrorVector> {
        population.par_iter().map(|params| self.evaluate(params)).collect()
    }

    fn infeasible(&self) -> ErrorVector {
        vec![self.config.infeasible; self.objectives.len()]
    }

    fn check_viable(&self, curves: &[Curve]) -> Result<(), String> {
        if curves.len() != self.profiles.len() {
            return Err(format!(
                "expected {} curves, simulator returned {}",
                self.profiles.len(),
                curves.len()
            ));
        }
        for (curve, profile) in curves.iter().zip(&self.profiles) {
            if curve.x.len() != curve.y.len() {
                return Err(format!("test '{}': x/y length mismatch", profile.name));
            }
            if curve.len() < self.config.min_data {
                return Err(format!(
                    "test '{}': {} samples < {}",
                    profile.name,
                    curve.len(),
                    self.config.min_data
                ));
            }
            if !curve.is_finite() {
                return Err(format!("test '{}': non-finite samples", profile.name));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MinRateSource, TestCase};
    use crate::models::ReplaySimulator;
    use crate::objective::profile::build_profiles;

    fn creep_curve(n: usize, rate: f64) -> Curve {
        let x: Vec<f64> = (0..n).map(|i| i as f64 * 20.0).collect();
        let y: Vec<f64> = x.iter().map(|&t| 0.001 + 0.004 * (1.0 - (-t / 200.0).exp()) + rate * t).collect();
        Curve::new(x, y).unwrap()
    }

    fn profiles() -> Vec<ExperimentalProfile> {
        let cases = vec![
            TestCase {
                name: "s80".to_string(),
                stress: 80.0,
                curve: creep_curve(120, 1e-6),
            },
            TestCase {
                name: "s100".to_string(),
                stress: 100.0,
                curve: creep_curve(90, 3e-6),
            },
        ];
        build_profiles(&cases, MinRateSource::Polynomial).unwrap()
    }

    fn space() -> ParameterSpace {
        ParameterSpace::new(vec!["a".into(), "b".into()], vec![0.0, 0.0], vec![1.0, 1.0]).unwrap()
    }

    #[test]
    fn failure_reports_sentinel_for_every_objective() {
        let sim = |_: &[f64]| Simulation::failed("integrator diverged");
        let objectives = vec![ErrorMetric::XEnd, ErrorMetric::MinRate];
        let ev = ObjectiveEvaluator::new(sim, profiles(), space(), objectives, EvaluatorConfig::default()).unwrap();
        assert_eq!(ev.evaluate(&[0.5, 0.5]), vec![1.0e50, 1.0e50]);
    }

    #[test]
    fn short_or_missing_curves_are_rejected() {
        let objectives = ErrorMetric::ALL.to_vec();

        let short = ReplaySimulator::new(vec![creep_curve(120, 1e-6), creep_curve(MIN_DATA - 1, 3e-6)]);
        let ev = ObjectiveEvaluator::new(short, profiles(), space(), objectives.clone(), EvaluatorConfig::default())
            .unwrap();
        assert_eq!(ev.evaluate(&[0.1, 0.2]), vec![INFEASIBLE; 4]);

        let missing = ReplaySimulator::new(vec![creep_curve(120, 1e-6)]);
        let ev = ObjectiveEvaluator::new(missing, profiles(), space(), objectives.clone(), EvaluatorConfig::default())
            .unwrap();
        assert_eq!(ev.evaluate(&[0.1, 0.2]), vec![INFEASIBLE; 4]);

        let mut bad = creep_curve(60, 3e-6);
        bad.y[10] = f64::NAN;
        let nan = ReplaySimulator::new(vec![creep_curve(120, 1e-6), bad]);
        let ev = ObjectiveEvaluator::new(nan, profiles(), space(), objectives, EvaluatorConfig::default()).unwrap();
        assert_eq!(ev.evaluate(&[0.1, 0.2]), vec![INFEASIBLE; 4]);
    }

    #[test]
    fn min_data_boundary_is_exclusive() {
        let objectives = vec![ErrorMetric::XEnd];
        let at_bound = ReplaySimulator::new(vec![creep_curve(120, 1e-6), creep_curve(MIN_DATA, 3e-6)]);
        let ev = ObjectiveEvaluator::new(at_bound, profiles(), space(), objectives.clone(), EvaluatorConfig::default())
            .unwrap();
        let errs = ev.evaluate(&[0.5, 0.5]);
        assert!(errs[0] < INFEASIBLE, "{errs:?}");
        // x_end of the 50-sample curve is 49 * 20 against 89 * 20 for the profile.
        assert_eq!(errs[0], 800.0);

        let inclusive = EvaluatorConfig {
            min_data: MIN_DATA + 1,
            ..EvaluatorConfig::default()
        };
        let at_bound = ReplaySimulator::new(vec![creep_curve(120, 1e-6), creep_curve(MIN_DATA, 3e-6)]);
        let ev = ObjectiveEvaluator::new(at_bound, profiles(), space(), objectives, inclusive).unwrap();
        assert_eq!(ev.evaluate(&[0.5, 0.5]), vec![INFEASIBLE]);
    }

    #[test]
    fn exact_replay_scores_near_zero_in_requested_order() {
        let sim = ReplaySimulator::new(vec![creep_curve(120, 1e-6), creep_curve(90, 3e-6)]);
        let objectives = vec![ErrorMetric::YEnd, ErrorMetric::Area, ErrorMetric::XEnd];
        let ev = ObjectiveEvaluator::new(sim, profiles(), space(), objectives, EvaluatorConfig::default()).unwrap();
        let errs = ev.evaluate(&[0.3, 0.3]);
        assert_eq!(errs.len(), 3);
        assert_eq!(errs[0], 0.0);
        assert!(errs[1] < 1e-9, "area {}", errs[1]);
        assert_eq!(errs[2], 0.0);
    }

    #[test]
    fn wrong_dimension_is_infeasible() {
        let sim = ReplaySimulator::new(vec![creep_curve(120, 1e-6), creep_curve(90, 3e-6)]);
        let ev = ObjectiveEvaluator::new(sim, profiles(), space(), vec![ErrorMetric::Area], EvaluatorConfig::default())
            .unwrap();
        assert_eq!(ev.evaluate(&[0.3]), vec![INFEASIBLE]);
    }

    #[test]
    fn batch_matches_sequential_and_preserves_order() {
        // Parameter `a` stretches the time axis so each candidate scores differently.
        let sim = |p: &[f64]| {
            let stretch = 1.0 + p[0];
            let curves = [creep_curve(120, 1e-6), creep_curve(90, 3e-6)]
                .into_iter()
                .map(|mut c| {
                    c.x.iter_mut().for_each(|x| *x *= stretch);
                    c
                })
                .collect();
            Simulation::Curves(curves)
        };
        let objectives = ErrorMetric::ALL.to_vec();
        let ev = ObjectiveEvaluator::new(sim, profiles(), space(), objectives, EvaluatorConfig::default()).unwrap();
        let population: Vec<Vec<f64>> = (0..16).map(|i| vec![i as f64 / 16.0, 0.5]).collect();
        let batch = ev.evaluate_batch(&population);
        let sequential: Vec<ErrorVector> = population.iter().map(|p| ev.evaluate(p)).collect();
        assert_eq!(batch, sequential);
        assert!(batch[1][1] < batch[15][1]);
    }

    #[test]
    fn problem_spec_reflects_configuration() {
        let sim = |_: &[f64]| Simulation::failed("unused");
        let ev = ObjectiveEvaluator::new(
            sim,
            profiles(),
            space(),
            vec![ErrorMetric::Area, ErrorMetric::MinRate],
            EvaluatorConfig::default(),
        )
        .unwrap();
        let spec = ev.problem();
        assert_eq!(spec.n_var, 2);
        assert_eq!(spec.n_obj, 2);
        assert_eq!(spec.upper, vec![1.0, 1.0]);
        assert_eq!(ev.profiles().len(), 2);
    }

    #[test]
    fn construction_rejects_empty_inputs() {
        let sim = |_: &[f64]| Simulation::failed("unused");
        assert!(ObjectiveEvaluator::new(sim, profiles(), space(), Vec::new(), EvaluatorConfig::default()).is_err());
        assert!(
            ObjectiveEvaluator::new(sim, Vec::new(), space(), vec![ErrorMetric::Area], EvaluatorConfig::default())
                .is_err()
        );
    }

    #[test]
    fn random_population_scores_deterministically() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let sim = |p: &[f64]| {
            if p[1] > 0.8 {
                return Simulation::failed("unstable");
            }
            let lift = p[0] * 1e-3;
            let curves = [creep_curve(120, 1e-6), creep_curve(90, 3e-6)]
                .into_iter()
                .map(|mut c| {
                    c.y.iter_mut().for_each(|y| *y += lift);
                    c
                })
                .collect();
            Simulation::Curves(curves)
        };
        let objectives = ErrorMetric::ALL.to_vec();
        let ev = ObjectiveEvaluator::new(sim, profiles(), space(), objectives, EvaluatorConfig::default()).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        let population: Vec<Vec<f64>> = (0..32)
            .map(|_| vec![rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)])
            .collect();
        let first = ev.evaluate_batch(&population);
        let second = ev.evaluate_batch(&population);
        assert_eq!(first, second);

        for (params, errs) in population.iter().zip(&first) {
            if params[1] > 0.8 {
                assert_eq!(errs, &vec![INFEASIBLE; 4]);
            } else {
                assert!(errs.iter().all(|e| e.is_finite() && *e < 1.0));
                // A vertical lift moves the end strain but never the end time.
                assert_eq!(errs[1], 0.0);
            }
        }
    }
}
