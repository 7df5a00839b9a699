//! Curve thinning.
//!
//! Simulators sample unevenly and at very different densities. Before the
//! area comparison every predicted curve is reduced to the same number of
//! samples so a finely stepped simulation is not weighted more heavily than a
//! coarse one.

/// Number of samples kept per curve for the area comparison.
pub const DATA_DENSITY: usize = 50;

/// `density` indices into a curve of `n` samples.
///
/// The first (`0`) and last (`n - 1`) samples are always kept; the interior
/// indices are `floor(n / density * k)` for `k = 1..density-1`. For
/// `n < density` indices repeat. `density` is clamped to at least 2.
pub fn thin_indexes(n: usize, density: usize) -> Vec<usize> {
    if n == 0 {
        return Vec::new();
    }
    let density = density.max(2);
    let step = n as f64 / density as f64;

    let mut out = Vec::with_capacity(density);
    out.push(0);
    for k in 1..density - 1 {
        let idx = (step * k as f64).floor() as usize;
        out.push(idx.min(n - 1));
    }
    out.push(n - 1);
    out
}
