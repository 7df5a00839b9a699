//! Shared "score pipeline" logic used by the CLI subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> profiles -> (replayed simulation -> evaluator -> error vector)
//!
//! The subcommands can then focus on presentation (printing, plots, exports).

use tracing::{info, warn};

use crate::domain::{Curve, ErrorVector, EvaluationRecord, RunConfig};
use crate::error::AppError;
use crate::io::ingest::{IngestedData, load_curves, load_test_cases};
use crate::models::{ReplaySimulator, visco_plastic};
use crate::objective::{EvaluatorConfig, ExperimentalProfile, INFEASIBLE, ObjectiveEvaluator, build_profiles};

/// Outputs of loading and profiling the experimental data.
#[derive(Debug, Clone)]
pub struct ProfileOutput {
    pub ingest: IngestedData,
    pub profiles: Vec<ExperimentalProfile>,
}

/// All computed outputs of a single `creep score` run.
#[derive(Debug)]
pub struct ScoreOutput {
    pub ingest: IngestedData,
    pub evaluator: ObjectiveEvaluator<ReplaySimulator>,
    pub predicted: Vec<Curve>,
    pub record: EvaluationRecord,
}

impl ScoreOutput {
    pub fn errors(&self) -> &ErrorVector {
        &self.record.errors
    }
}

/// Load the experimental tests and build their profiles.
pub fn run_profiles(config: &RunConfig) -> Result<ProfileOutput, AppError> {
    let include = (!config.tests.is_empty()).then_some(config.tests.as_slice());
    let ingest = load_test_cases(&config.info_path, &config.data_path, include)?;
    let profiles = build_profiles(&ingest.cases, config.min_rate_source)?;
    info!(profiles = profiles.len(), source = ?config.min_rate_source, "experimental profiles ready");
    Ok(ProfileOutput { ingest, profiles })
}

/// Score saved simulator output for one candidate parameter vector.
pub fn run_score(config: &RunConfig) -> Result<ScoreOutput, AppError> {
    let predicted_path = config
        .predicted_path
        .as_ref()
        .ok_or_else(|| AppError::invalid_input("Scoring needs a predicted-curves table (--predicted)."))?;

    let ProfileOutput { ingest, profiles } = run_profiles(config)?;

    let names: Vec<String> = profiles.iter().map(|p| p.name.clone()).collect();
    let predicted = load_curves(predicted_path, &names)?;

    let space = visco_plastic::parameter_space()?;
    let params = match &config.params {
        Some(p) => p.clone(),
        None => space.midpoint(),
    };
    if params.len() != space.dimension() {
        return Err(AppError::invalid_input(format!(
            "Expected {} parameters ({}), got {}.",
            space.dimension(),
            space.names.join(", "),
            params.len()
        )));
    }
    if !space.contains(&params) {
        warn!("parameter vector lies outside the model bounds");
    }

    let eval_config = EvaluatorConfig {
        density: config.density,
        min_data: config.min_data,
        infeasible: INFEASIBLE,
    };
    let evaluator = ObjectiveEvaluator::new(
        ReplaySimulator::new(predicted.clone()),
        profiles,
        space,
        config.objectives.clone(),
        eval_config,
    )?;

    let errors = evaluator.evaluate(&params);
    info!(?errors, "scored candidate");

    Ok(ScoreOutput {
        ingest,
        evaluator,
        predicted,
        record: EvaluationRecord { params, errors },
    })
}
