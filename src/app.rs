//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - installs the log subscriber
//! - runs profiling / scoring
//! - prints reports/plots
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;
use tracing::Level;

use crate::cli::{Command, DataArgs, PlotArgs, ProfileArgs, ScoreArgs};
use crate::domain::{ErrorMetric, RunConfig};
use crate::error::AppError;
use crate::io::{CsvRecorder, Recorder};

pub mod pipeline;

/// Entry point for the `creep` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();
    init_logging(cli.verbose);

    tracing::info!(started = %chrono::Local::now().format("%H:%M:%S"), "creep run begun");

    match cli.command {
        Command::Profile(args) => handle_profile(args),
        Command::Score(args) => handle_score(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    // A second `run()` in the same process (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_profile(args: ProfileArgs) -> Result<(), AppError> {
    let config = profile_config_from_args(&args)?;
    let run = pipeline::run_profiles(&config)?;

    println!("{}", crate::report::format_profile_summary(&run.ingest, &run.profiles));

    if config.plot {
        for (case, profile) in run.ingest.cases.iter().zip(&run.profiles) {
            let plot = crate::plot::render_profile_plot(
                &case.curve,
                profile,
                None,
                config.plot_width,
                config.plot_height,
            );
            println!("{plot}");
        }
    }

    if let Some(path) = &config.export_profiles {
        crate::io::profile::write_profiles_json(path, &run.profiles)?;
        tracing::info!(path = %path.display(), "wrote profile JSON");
    }

    Ok(())
}

fn handle_score(args: ScoreArgs) -> Result<(), AppError> {
    let config = score_config_from_args(&args)?;
    let run = pipeline::run_score(&config)?;
    let evaluator = &run.evaluator;

    println!("{}", crate::report::format_profile_summary(&run.ingest, evaluator.profiles()));
    println!("{}", crate::report::format_parameters(evaluator.space(), &run.record.params));
    println!(
        "{}",
        crate::report::format_error_vector(evaluator.objectives(), run.errors(), evaluator.config().infeasible)
    );

    if config.plot {
        let cases = run.ingest.cases.iter().zip(evaluator.profiles()).zip(&run.predicted);
        for ((case, profile), predicted) in cases {
            let plot = crate::plot::render_profile_plot(
                &case.curve,
                profile,
                Some(predicted),
                config.plot_width,
                config.plot_height,
            );
            println!("{plot}");
        }
    }

    if let Some(path) = &config.record_path {
        let mut recorder = CsvRecorder::new(path, evaluator.space().names.clone(), evaluator.objectives().to_vec());
        recorder.record(std::slice::from_ref(&run.record))?;
        tracing::info!(path = %recorder.path().display(), "recorded candidate");
    }

    Ok(())
}

pub fn profile_config_from_args(args: &ProfileArgs) -> Result<RunConfig, AppError> {
    let mut config = base_config(&args.data, &args.plot)?;
    config.export_profiles = args.export.clone();
    Ok(config)
}

pub fn score_config_from_args(args: &ScoreArgs) -> Result<RunConfig, AppError> {
    let mut config = base_config(&args.data, &args.plot)?;
    config.predicted_path = Some(args.predicted.clone());
    if !args.errors.is_empty() {
        config.objectives = args.errors.clone();
    }
    config.params = (!args.params.is_empty()).then(|| args.params.clone());
    config.density = args.density;
    config.min_data = args.min_data;
    config.record_path = args.record.clone();
    Ok(config)
}

fn base_config(data: &DataArgs, plot: &PlotArgs) -> Result<RunConfig, AppError> {
    Ok(RunConfig {
        info_path: resolve_path(data.info.as_ref(), "CREEP_INFO", "--info")?,
        data_path: resolve_path(data.data.as_ref(), "CREEP_DATA", "--data")?,
        tests: data.tests.iter().map(|t| t.trim().to_string()).filter(|t| !t.is_empty()).collect(),
        min_rate_source: data.min_rate_source,
        predicted_path: None,
        objectives: ErrorMetric::ALL.to_vec(),
        params: None,
        density: crate::objective::DATA_DENSITY,
        min_data: crate::objective::MIN_DATA,
        export_profiles: None,
        record_path: None,
        plot: plot.plot,
        plot_width: plot.width,
        plot_height: plot.height,
    })
}

/// A path from the command line, else from the environment (`.env` included).
fn resolve_path(flag: Option<&PathBuf>, env_key: &str, flag_name: &str) -> Result<PathBuf, AppError> {
    if let Some(path) = flag {
        return Ok(path.clone());
    }
    std::env::var_os(env_key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| AppError::invalid_input(format!("Missing {flag_name} (or {env_key} in environment/.env).")))
}
