//! Recording scored candidates to CSV.
//!
//! A search engine hands its current best-known candidates to a [`Recorder`]
//! after each generation. The CSV recorder appends one row per candidate so
//! a long run leaves a readable trail in a spreadsheet.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::{ErrorMetric, EvaluationRecord};
use crate::error::AppError;

/// Sink for scored candidates.
pub trait Recorder {
    fn record(&mut self, records: &[EvaluationRecord]) -> Result<(), AppError>;
}

/// Appends records to a CSV file, writing the header when the file is new.
#[derive(Debug, Clone)]
pub struct CsvRecorder {
    path: PathBuf,
    param_names: Vec<String>,
    objectives: Vec<ErrorMetric>,
}

impl CsvRecorder {
    pub fn new(path: impl Into<PathBuf>, param_names: Vec<String>, objectives: Vec<ErrorMetric>) -> Self {
        Self {
            path: path.into(),
            param_names,
            objectives,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn header(&self) -> Vec<String> {
        let mut header = vec!["recorded_at".to_string()];
        header.extend(self.param_names.iter().cloned());
        header.extend(self.objectives.iter().map(|m| m.name().to_string()));
        header
    }
}

impl Recorder for CsvRecorder {
    fn record(&mut self, records: &[EvaluationRecord]) -> Result<(), AppError> {
        let is_new = std::fs::metadata(&self.path).map(|m| m.len() == 0).unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AppError::io(format!("Failed to open record CSV '{}': {e}", self.path.display())))?;
        let mut writer = csv::Writer::from_writer(file);

        if is_new {
            writer
                .write_record(self.header())
                .map_err(|e| AppError::io(format!("Failed to write record CSV header: {e}")))?;
        }

        let stamp = Local::now().to_rfc3339();
        for r in records {
            if r.params.len() != self.param_names.len() || r.errors.len() != self.objectives.len() {
                return Err(AppError::invalid_input(format!(
                    "Record shape ({} params, {} errors) does not match recorder ({} params, {} errors).",
                    r.params.len(),
                    r.errors.len(),
                    self.param_names.len(),
                    self.objectives.len()
                )));
            }
            let mut row = Vec::with_capacity(1 + r.params.len() + r.errors.len());
            row.push(stamp.clone());
            row.extend(r.params.iter().map(|v| format!("{v:.10e}")));
            row.extend(r.errors.iter().map(|v| format!("{v:.10e}")));
            writer
                .write_record(&row)
                .map_err(|e| AppError::io(format!("Failed to write record CSV row: {e}")))?;
        }

        writer
            .flush()
            .map_err(|e| AppError::io(format!("Failed to flush record CSV: {e}")))?;
        Ok(())
    }
}
