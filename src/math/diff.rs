//! Forward finite differences.
//!
//! The same routine is applied to experimental and predicted curves so the two
//! sides of a rate comparison are computed identically.

/// Stand-in for a rate that is undefined or non-physical.
///
/// Emitted for zero-width steps (`x[i] == x[i-1]`) and for non-increasing
/// strain (`y[i] <= y[i-1]`).
pub const RATE_SENTINEL: f64 = 1.0e50;

/// Forward differences `dy/dx` between consecutive samples.
///
/// Returns `min(x.len(), y.len()) - 1` values (empty for fewer than two samples).
pub fn derivative_fd(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len().min(y.len());
    if n < 2 {
        return Vec::new();
    }
    (1..n)
        .map(|i| {
            let dx = x[i] - x[i - 1];
            let dy = y[i] - y[i - 1];
            if x[i] != x[i - 1] && y[i] > y[i - 1] {
                dy / dx
            } else {
                RATE_SENTINEL
            }
        })
        .collect()
}

/// Minimum of [`derivative_fd`]; [`RATE_SENTINEL`] when no step is usable.
pub fn min_rate(x: &[f64], y: &[f64]) -> f64 {
    derivative_fd(x, y).into_iter().fold(RATE_SENTINEL, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_step_emits_sentinel() {
        let d = derivative_fd(&[0.0, 1.0, 2.0], &[0.0, 2.0, 2.0]);
        assert_eq!(d, vec![2.0, RATE_SENTINEL]);
        assert_eq!(min_rate(&[0.0, 1.0, 2.0], &[0.0, 2.0, 2.0]), 2.0);
    }

    #[test]
    fn zero_run_and_decrease_emit_sentinel() {
        let x = [0.0, 1.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 2.0, 1.5, 3.5];
        let d = derivative_fd(&x, &y);
        assert_eq!(d.len(), 4);
        assert_eq!(d[0], 1.0);
        assert_eq!(d[1], RATE_SENTINEL);
        assert_eq!(d[2], RATE_SENTINEL);
        assert_eq!(d[3], 2.0);
    }

    #[test]
    fn fully_non_physical_curve_flags_with_sentinel() {
        assert_eq!(min_rate(&[0.0, 1.0, 2.0], &[3.0, 2.0, 1.0]), RATE_SENTINEL);
        assert_eq!(min_rate(&[0.0], &[0.0]), RATE_SENTINEL);
        assert!(derivative_fd(&[], &[]).is_empty());
    }
}
