//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks of a fit in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - experimental samples: `o`
//! - polynomial fit: `-` line
//! - optional predicted curve: `*`

use crate::domain::Curve;
use crate::objective::ExperimentalProfile;

/// Render one experimental test with its fit, optionally overlaying a prediction.
pub fn render_profile_plot(
    experimental: &Curve,
    profile: &ExperimentalProfile,
    predicted: Option<&Curve>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = x_range(experimental, predicted).unwrap_or((0.0, 1.0));
    let fit = sample_fit(profile, x_min, x_max, width);

    let (y_min, y_max) = y_range(experimental, predicted, &fit).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the fit first so samples overlay it.
    draw_curve(&mut grid, &fit, x_min, x_max, y_min, y_max);

    if let Some(pred) = predicted {
        for (x, y) in pred.points().filter(|(x, y)| x.is_finite() && y.is_finite()) {
            let col = map_x(x, x_min, x_max, width);
            let row = map_y(y, y_min, y_max, height);
            grid[row][col] = '*';
        }
    }

    for (x, y) in experimental.points() {
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        grid[row][col] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot [{}]: time=[{x_min:.3}, {x_max:.3}] | strain=[{y_min:.5}, {y_max:.5}]\n",
        profile.name
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn x_range(experimental: &Curve, predicted: Option<&Curve>) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let pred_x = predicted.map(|c| c.x.as_slice()).unwrap_or(&[]);
    for &x in experimental.x.iter().chain(pred_x).filter(|x| x.is_finite()) {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn sample_fit(profile: &ExperimentalProfile, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    // Extrapolating a degree-15 fit is meaningless; stay on its own data range.
    let lo = x_min.max(profile.poly.center() - profile.poly.half_range());
    let hi = x_max.min(profile.poly.center() + profile.poly.half_range());
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let u = i as f64 / (n as f64 - 1.0);
            let x = lo + u * (hi - lo);
            (x, profile.poly.eval(x))
        })
        .collect()
}

fn y_range(experimental: &Curve, predicted: Option<&Curve>, fit: &[(f64, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let pred_y = predicted.map(|c| c.y.as_slice()).unwrap_or(&[]);
    let values = experimental
        .y
        .iter()
        .chain(pred_y)
        .copied()
        .chain(fit.iter().map(|&(_, y)| y));
    for y in values.filter(|y| y.is_finite()) {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], x_min: f64, x_max: f64, y_min: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in curve {
        if !y.is_finite() {
            prev = None;
            continue;
        }
        let col = map_x(x, x_min, x_max, width);
        let row = map_y(y, y_min, y_max, height);
        if let Some((c0, r0)) = prev {
            draw_line(grid, c0, r0, col, row, '-');
        } else {
            grid[row][col] = '-';
        }
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MinRateSource, TestCase};
    use crate::objective::build_profile;

    fn linear_profile() -> (Curve, ExperimentalProfile) {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|&t| t * 0.001).collect();
        let case = TestCase {
            name: "lin".to_string(),
            stress: 50.0,
            curve: Curve::new(x, y).unwrap(),
        };
        let profile = build_profile(&case, MinRateSource::Polynomial).unwrap();
        (case.curve, profile)
    }

    #[test]
    fn plot_has_fixed_shape_and_corner_samples() {
        let (curve, profile) = linear_profile();
        let txt = render_profile_plot(&curve, &profile, None, 20, 6);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("Plot [lin]: time=[0.000, 19.000]"));
        assert!(lines[1..].iter().all(|l| l.chars().count() == 20));
        // First sample bottom-left, last sample top-right.
        assert_eq!(lines[6].chars().next(), Some('o'));
        assert_eq!(lines[1].chars().last(), Some('o'));
    }

    #[test]
    fn prediction_is_overlaid() {
        let (curve, profile) = linear_profile();
        let pred = Curve::new(vec![0.0, 19.0], vec![0.019, 0.0]).unwrap();
        let txt = render_profile_plot(&curve, &profile, Some(&pred), 20, 6);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines[1].chars().next(), Some('*'));
        assert_eq!(lines[6].chars().last(), Some('*'));
    }
}
