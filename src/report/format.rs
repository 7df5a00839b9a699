//! Formatted terminal output for profiles, parameters and error vectors.

use crate::domain::{ErrorMetric, ParameterSpace};
use crate::io::ingest::IngestedData;
use crate::objective::ExperimentalProfile;

/// Format the dataset + profile table printed by `creep profile` and `creep score`.
pub fn format_profile_summary(ingest: &IngestedData, profiles: &[ExperimentalProfile]) -> String {
    let mut out = String::new();

    out.push_str("=== creep - Experimental Profiles ===\n");
    out.push_str(&format!("Tests: {}\n", profiles.len()));
    if let Some(first) = profiles.first() {
        out.push_str(&format!(
            "Fit: degree {} polynomial | min rate from {:?}\n",
            first.poly.degree(),
            first.min_rate_source
        ));
    }
    if !ingest.row_errors.is_empty() {
        out.push_str(&format!("Skipped cells/rows: {}\n", ingest.row_errors.len()));
        for e in ingest.row_errors.iter().take(5) {
            let column = e.column.as_deref().unwrap_or("-");
            out.push_str(&format!("  line {} [{}]: {}\n", e.line, column, e.message));
        }
        if ingest.row_errors.len() > 5 {
            out.push_str(&format!("  ... and {} more\n", ingest.row_errors.len() - 5));
        }
    }

    out.push('\n');
    out.push_str(&format!(
        "{:<12} {:>8} {:>6} {:>12} {:>12} {:>12} {:>12}\n",
        "test", "stress", "n", "x_end", "y_end", "min_rate", "fit_rmse"
    ));
    for p in profiles {
        out.push_str(&format!(
            "{:<12} {:>8.2} {:>6} {:>12.4} {:>12.6} {:>12.4e} {:>12.4e}\n",
            truncate(&p.name, 12),
            p.stress,
            p.n_points,
            p.x_end,
            p.y_end,
            p.min_rate,
            p.fit_rmse
        ));
    }

    out
}

/// Format a parameter vector next to its names and bounds.
pub fn format_parameters(space: &ParameterSpace, params: &[f64]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<8} {:>14} {:>14} {:>14}\n", "param", "value", "lower", "upper"));
    for (i, name) in space.names.iter().enumerate() {
        let value = params.get(i).copied().unwrap_or(f64::NAN);
        let flag = if value < space.lower[i] || value > space.upper[i] {
            "  (out of bounds)"
        } else {
            ""
        };
        out.push_str(&format!(
            "{:<8} {:>14.6e} {:>14.6e} {:>14.6e}{flag}\n",
            name, value, space.lower[i], space.upper[i]
        ));
    }
    out
}

/// Format an error vector, one objective per line, in request order.
pub fn format_error_vector(objectives: &[ErrorMetric], errors: &[f64], infeasible: f64) -> String {
    let mut out = String::new();
    if !errors.is_empty() && errors.iter().all(|&e| e == infeasible) {
        out.push_str("Simulation rejected: every objective is infeasible.\n");
    }
    for (metric, value) in objectives.iter().zip(errors) {
        out.push_str(&format!("{:<10} {:>16.8e}\n", metric.name(), value));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('~');
        t
    }
}
