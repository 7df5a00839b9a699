//! Command-line parsing for the creep calibration tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the scoring/math code.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::domain::{ErrorMetric, MinRateSource};
use crate::objective::{DATA_DENSITY, MIN_DATA};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "creep", version, about = "Creep curve calibration objectives")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit and summarize the experimental profiles, optionally plot/export them.
    Profile(ProfileArgs),
    /// Score saved simulator output against the experimental profiles.
    Score(ScoreArgs),
}

/// Where the experimental data lives and how it is profiled.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Info table with `test` and `stress` columns (falls back to `CREEP_INFO`).
    #[arg(long, value_name = "CSV")]
    pub info: Option<PathBuf>,

    /// Wide data table with `<test>_time` / `<test>_strain` columns (falls back to `CREEP_DATA`).
    #[arg(long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Comma-separated tests to include, in scoring order (default: all in the info table).
    #[arg(long, value_delimiter = ',')]
    pub tests: Vec<String>,

    /// Source of the experimental minimum creep rate.
    #[arg(long, value_enum, default_value_t = MinRateSource::Polynomial)]
    pub min_rate_source: MinRateSource,
}

/// Plot options shared by both subcommands.
#[derive(Debug, Args, Clone)]
pub struct PlotArgs {
    /// Render an ASCII plot per test.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,
}

/// Options for `creep profile`.
#[derive(Debug, Parser, Clone)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub plot: PlotArgs,

    /// Export profiles (coefficients + descriptors) to JSON.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,
}

/// Options for `creep score`.
#[derive(Debug, Parser, Clone)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub data: DataArgs,

    #[command(flatten)]
    pub plot: PlotArgs,

    /// Predicted curves in the same wide layout as the data table.
    #[arg(long, value_name = "CSV")]
    pub predicted: PathBuf,

    /// Comma-separated error kinds, in output order (default: all four).
    #[arg(long, value_enum, value_delimiter = ',')]
    pub errors: Vec<ErrorMetric>,

    /// Comma-separated parameter vector (default: midpoint of the bounds).
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    pub params: Vec<f64>,

    /// Samples per curve for the area error.
    #[arg(long, default_value_t = DATA_DENSITY)]
    pub density: usize,

    /// Predicted curves with fewer samples reject the simulation.
    #[arg(long, default_value_t = MIN_DATA)]
    pub min_data: usize,

    /// Append the scored candidate to this CSV.
    #[arg(long, value_name = "CSV")]
    pub record: Option<PathBuf>,
}
