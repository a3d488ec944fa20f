//! Parameter grid and arc-length equalization
//!
//! The mesher never samples the parameter domain uniformly. Boundary curves
//! are first resampled to equal chord length, then the whole grid is
//! repeatedly redistributed so that grid edges on the deformed surface have
//! roughly equal length in both directions.

use itertools::Itertools;
use std::f64::consts::{FRAC_PI_2, PI};
use superquad_core::Point3d;

/// Longitude domain
pub const U_DOMAIN: (f64, f64) = (-PI, PI);

/// Latitude domain
pub const V_DOMAIN: (f64, f64) = (-FRAC_PI_2, FRAC_PI_2);

/// Total curve length below which spacing falls back to uniform
pub const MIN_TOTAL_LENGTH: f64 = 1e-12;

/// Segment length below which an interpolation fraction is taken as zero
pub const MIN_SEGMENT_LENGTH: f64 = 1e-15;

/// Sorted longitude and latitude samples of one mesh build
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    pub u_values: Vec<f64>,
    pub v_values: Vec<f64>,
}

/// `n` evenly spaced values from `start` to `end` inclusive
pub fn uniform_samples(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n < 2 {
        return vec![start, end];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
        .collect()
}

/// Running sum of chord lengths along a polyline, starting at zero
pub fn cumulative_lengths(points: &[Point3d]) -> Vec<f64> {
    let mut total = 0.0;
    std::iter::once(0.0)
        .chain(points.iter().tuple_windows().map(|(a, b)| {
            total += (b - a).norm();
            total
        }))
        .take(points.len())
        .collect()
}

/// Invert a monotone cumulative-length table.
///
/// Returns `n_out` parameters whose interpolated cumulative lengths are evenly
/// spaced over `[0, total]`. The first and last parameters are kept exactly.
/// The caller guarantees `total >= MIN_TOTAL_LENGTH`.
fn invert_cumulative(params: &[f64], cumulative: &[f64], n_out: usize) -> Vec<f64> {
    let m = params.len();
    let total = cumulative[m - 1];
    let mut result = Vec::with_capacity(n_out);
    result.push(params[0]);

    let mut k = 0;
    for i in 1..n_out.saturating_sub(1) {
        let target = total * i as f64 / (n_out - 1) as f64;
        while k < m - 2 && cumulative[k + 1] < target {
            k += 1;
        }
        let segment = cumulative[k + 1] - cumulative[k];
        let fraction = if segment > MIN_SEGMENT_LENGTH {
            (target - cumulative[k]) / segment
        } else {
            0.0
        };
        result.push(params[k] + fraction * (params[k + 1] - params[k]));
    }

    result.push(params[m - 1]);
    result
}

/// Parameters producing equally spaced points along a 3D curve.
///
/// The curve is sampled densely at `n_dense` parameters, its cumulative chord
/// length is inverted by linear interpolation. A curve shorter than
/// [`MIN_TOTAL_LENGTH`] yields uniform spacing.
pub fn arc_length_sample<F>(
    start: f64,
    end: f64,
    n_out: usize,
    n_dense: usize,
    curve: F,
) -> Vec<f64>
where
    F: Fn(f64) -> Point3d,
{
    let dense_params = uniform_samples(start, end, n_dense.max(2));
    let dense_points: Vec<Point3d> = dense_params.iter().map(|&t| curve(t)).collect();
    let cumulative = cumulative_lengths(&dense_points);

    let total = cumulative.last().copied().unwrap_or(0.0);
    // Comparison is written so that NaN lengths also fall back.
    if !(total >= MIN_TOTAL_LENGTH) {
        return uniform_samples(start, end, n_out);
    }

    invert_cumulative(&dense_params, &cumulative, n_out.max(2))
}

/// Redistribute `params` so that the averaged cumulative lengths become even.
/// Leaves `params` untouched when the averaged curve is degenerate.
fn redistribute(params: &mut Vec<f64>, cumulative: &[f64]) {
    let total = cumulative.last().copied().unwrap_or(0.0);
    if !(total > MIN_TOTAL_LENGTH) || params.len() < 3 {
        return;
    }
    *params = invert_cumulative(params, cumulative, params.len());
}

impl ParameterGrid {
    /// Uniform grid over the full domain
    pub fn uniform(nu: usize, nv: usize) -> Self {
        Self {
            u_values: uniform_samples(U_DOMAIN.0, U_DOMAIN.1, nu),
            v_values: uniform_samples(V_DOMAIN.0, V_DOMAIN.1, nv),
        }
    }

    /// Initial grid from the equator (`v = 0`) and prime meridian (`u = 0`).
    pub fn from_boundary_curves<F>(n: usize, n_dense: usize, surface: F) -> Self
    where
        F: Fn(f64, f64) -> Point3d,
    {
        Self {
            u_values: arc_length_sample(U_DOMAIN.0, U_DOMAIN.1, n, n_dense, |u| surface(u, 0.0)),
            v_values: arc_length_sample(V_DOMAIN.0, V_DOMAIN.1, n, n_dense, |v| surface(0.0, v)),
        }
    }

    pub fn nu(&self) -> usize {
        self.u_values.len()
    }

    pub fn nv(&self) -> usize {
        self.v_values.len()
    }

    /// Number of mesh vertices this grid produces
    pub fn vertex_count(&self) -> usize {
        self.nu() * self.nv()
    }

    /// Strictly increasing, at least two samples, endpoints on the domain bounds
    pub fn is_valid(&self) -> bool {
        fn axis_ok(values: &[f64], domain: (f64, f64)) -> bool {
            values.len() >= 2
                && values[0] == domain.0
                && values[values.len() - 1] == domain.1
                && values.iter().tuple_windows().all(|(a, b)| a < b)
        }
        axis_ok(&self.u_values, U_DOMAIN) && axis_ok(&self.v_values, V_DOMAIN)
    }

    /// One equalization pass: u first, averaged over all rows, then v over all
    /// columns using the updated u samples.
    pub fn equalize<F>(&mut self, surface: F)
    where
        F: Fn(f64, f64) -> Point3d,
    {
        let rows = self.v_values.iter().map(|&v| {
            let row: Vec<Point3d> = self.u_values.iter().map(|&u| surface(u, v)).collect();
            cumulative_lengths(&row)
        });
        let u_cumulative = average_cumulative(rows, self.nu());
        redistribute(&mut self.u_values, &u_cumulative);

        let columns = self.u_values.iter().map(|&u| {
            let column: Vec<Point3d> = self.v_values.iter().map(|&v| surface(u, v)).collect();
            cumulative_lengths(&column)
        });
        let v_cumulative = average_cumulative(columns, self.nv());
        redistribute(&mut self.v_values, &v_cumulative);
    }

    /// Merge extra u samples, keeping the sequence sorted and duplicate free
    pub fn insert_u(&mut self, values: impl IntoIterator<Item = f64>) -> usize {
        merge_sorted(&mut self.u_values, values)
    }

    /// Merge extra v samples, keeping the sequence sorted and duplicate free
    pub fn insert_v(&mut self, values: impl IntoIterator<Item = f64>) -> usize {
        merge_sorted(&mut self.v_values, values)
    }
}

fn average_cumulative(tables: impl Iterator<Item = Vec<f64>>, len: usize) -> Vec<f64> {
    let mut sum = vec![0.0; len];
    let mut count = 0usize;
    for table in tables {
        for (acc, value) in sum.iter_mut().zip(table) {
            *acc += value;
        }
        count += 1;
    }
    if count > 0 {
        for acc in &mut sum {
            *acc /= count as f64;
        }
    }
    sum
}

fn merge_sorted(values: &mut Vec<f64>, extra: impl IntoIterator<Item = f64>) -> usize {
    let before = values.len();
    values.extend(extra.into_iter().filter(|x| x.is_finite()));
    values.sort_by(f64::total_cmp);
    values.dedup();
    values.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_samples_hit_endpoints() {
        let s = uniform_samples(-PI, PI, 5);
        assert_eq!(s.len(), 5);
        assert_eq!(s[0], -PI);
        assert_eq!(s[4], PI);
        assert_relative_eq!(s[2], 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_cumulative_lengths() {
        let points = vec![
            Point3d::new(0.0, 0.0, 0.0),
            Point3d::new(3.0, 4.0, 0.0),
            Point3d::new(3.0, 4.0, 2.0),
        ];
        assert_eq!(cumulative_lengths(&points), vec![0.0, 5.0, 7.0]);
        assert!(cumulative_lengths(&[]).is_empty());
    }

    #[test]
    fn test_arc_length_sample_on_straight_line_is_uniform() {
        let samples = arc_length_sample(0.0, 1.0, 11, 500, |t| Point3d::new(2.0 * t, 0.0, 0.0));
        for (i, s) in samples.iter().enumerate() {
            assert_relative_eq!(*s, i as f64 / 10.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_arc_length_sample_compensates_speed() {
        // x = t^2 moves slowly near 0: equal lengths need sqrt spacing.
        let samples = arc_length_sample(0.0, 1.0, 5, 2000, |t| Point3d::new(t * t, 0.0, 0.0));
        for (i, s) in samples.iter().enumerate() {
            assert_relative_eq!(*s, (i as f64 / 4.0).sqrt(), epsilon = 2e-3);
        }
    }

    #[test]
    fn test_arc_length_sample_degenerate_curve_is_uniform() {
        let samples = arc_length_sample(-1.0, 1.0, 5, 500, |_| Point3d::new(1.0, 1.0, 1.0));
        assert_eq!(samples, uniform_samples(-1.0, 1.0, 5));
        assert!(samples.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_equalize_keeps_uniform_grid_on_cylinder_like_map() {
        // A surface linear in both parameters is already equalized.
        let mut grid = ParameterGrid::uniform(8, 6);
        let before = grid.clone();
        grid.equalize(|u, v| Point3d::new(u, 2.0 * v, 0.0));
        for (a, b) in grid.u_values.iter().zip(&before.u_values) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
        for (a, b) in grid.v_values.iter().zip(&before.v_values) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
        assert!(grid.is_valid());
    }

    #[test]
    fn test_equalize_on_degenerate_surface_changes_nothing() {
        let mut grid = ParameterGrid::uniform(10, 10);
        let before = grid.clone();
        grid.equalize(|_, _| Point3d::origin());
        assert_eq!(grid, before);
    }

    #[test]
    fn test_insert_keeps_order_and_drops_duplicates() {
        let mut grid = ParameterGrid::uniform(3, 3);
        let added = grid.insert_u([0.5, -0.5, 0.0, 0.5, f64::NAN]);
        assert_eq!(added, 2);
        assert_eq!(grid.u_values, vec![-PI, -0.5, 0.0, 0.5, PI]);
        assert!(grid.is_valid());
    }

    #[test]
    fn test_is_valid_rejects_bad_grids() {
        let mut grid = ParameterGrid::uniform(4, 4);
        assert!(grid.is_valid());
        grid.u_values.swap(1, 2);
        assert!(!grid.is_valid());

        let short = ParameterGrid {
            u_values: vec![-PI],
            v_values: vec![-FRAC_PI_2, FRAC_PI_2],
        };
        assert!(!short.is_valid());
    }
}
