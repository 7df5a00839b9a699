//! Reporting utilities: Pareto filtering and formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the scoring code stays clean and testable
//! - output changes are localized

mod format;

pub use format::*;

use crate::domain::EvaluationRecord;

/// True when `a` is no worse than `b` on every objective and strictly better on one.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    let mut strictly_better = false;
    for (&x, &y) in a.iter().zip(b) {
        if x > y {
            return false;
        }
        if x < y {
            strictly_better = true;
        }
    }
    strictly_better
}

/// The non-dominated subset of `records` (minimisation), in input order.
///
/// Duplicated error vectors are all kept.
pub fn non_dominated(records: &[EvaluationRecord]) -> Vec<EvaluationRecord> {
    records
        .iter()
        .filter(|r| !records.iter().any(|other| dominates(&other.errors, &r.errors)))
        .cloned()
        .collect()
}
