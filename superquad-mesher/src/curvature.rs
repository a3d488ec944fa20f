//! Curvature-driven grid subdivision

use crate::grid::ParameterGrid;
use superquad_core::{Point3d, Vector3d};

/// Normals shorter than this carry no direction information
const MIN_NORMAL_LENGTH: f64 = 1e-12;

/// Surface normal at `(u, v)` from central differences with step `eps`.
///
/// Returns `None` where the parameterization pinches (poles of a sphere) and
/// the two tangents are parallel or vanish.
pub fn central_difference_normal<F>(surface: &F, u: f64, v: f64, eps: f64) -> Option<Vector3d>
where
    F: Fn(f64, f64) -> Point3d,
{
    let tu = surface(u + eps, v) - surface(u - eps, v);
    let tv = surface(u, v + eps) - surface(u, v - eps);
    tu.cross(&tv).try_normalize(MIN_NORMAL_LENGTH)
}

/// Midpoints to insert where adjacent node normals turn sharply
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Subdivision {
    pub u_midpoints: Vec<f64>,
    pub v_midpoints: Vec<f64>,
}

impl Subdivision {
    pub fn is_empty(&self) -> bool {
        self.u_midpoints.is_empty() && self.v_midpoints.is_empty()
    }
}

/// Find grid edges whose endpoint normals have a dot product below `threshold`.
///
/// Edges along u (within a row) contribute the midpoint of their two u values,
/// edges along v (within a column) the midpoint of their v values. Edges that
/// touch a node without a defined normal are skipped.
pub fn find_high_curvature_edges<F>(
    grid: &ParameterGrid,
    surface: &F,
    eps: f64,
    threshold: f64,
) -> Subdivision
where
    F: Fn(f64, f64) -> Point3d,
{
    let nu = grid.nu();
    let nv = grid.nv();

    // Row-major, index j * nu + i
    let normals: Vec<Option<Vector3d>> = grid
        .v_values
        .iter()
        .flat_map(|&v| {
            grid.u_values
                .iter()
                .map(move |&u| central_difference_normal(surface, u, v, eps))
        })
        .collect();

    let bends_sharply = |a: usize, b: usize| match (&normals[a], &normals[b]) {
        (Some(n1), Some(n2)) => n1.dot(n2) < threshold,
        _ => false,
    };

    let mut split_u = vec![false; nu.saturating_sub(1)];
    let mut split_v = vec![false; nv.saturating_sub(1)];

    for j in 0..nv {
        for i in 0..nu.saturating_sub(1) {
            if !split_u[i] && bends_sharply(j * nu + i, j * nu + i + 1) {
                split_u[i] = true;
            }
        }
    }

    for i in 0..nu {
        for j in 0..nv.saturating_sub(1) {
            if !split_v[j] && bends_sharply(j * nu + i, (j + 1) * nu + i) {
                split_v[j] = true;
            }
        }
    }

    let midpoints = |values: &[f64], split: &[bool]| -> Vec<f64> {
        split
            .iter()
            .enumerate()
            .filter_map(|(k, split)| split.then(|| (values[k] + values[k + 1]) * 0.5))
            .collect()
    };

    Subdivision {
        u_midpoints: midpoints(&grid.u_values, &split_u),
        v_midpoints: midpoints(&grid.v_values, &split_v),
    }
}

/// Insert midpoints into `grid` wherever the surface turns by more than the
/// angle whose cosine is `threshold`. Returns the number of samples added.
pub fn subdivide_high_curvature<F>(
    grid: &mut ParameterGrid,
    surface: &F,
    eps: f64,
    threshold: f64,
) -> usize
where
    F: Fn(f64, f64) -> Point3d,
{
    let found = find_high_curvature_edges(grid, surface, eps, threshold);
    if found.is_empty() {
        return 0;
    }
    grid.insert_u(found.u_midpoints) + grid.insert_v(found.v_midpoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn plane(u: f64, v: f64) -> Point3d {
        Point3d::new(u, v, 0.0)
    }

    #[test]
    fn test_plane_normal() {
        let n = central_difference_normal(&plane, 0.3, -0.2, 1e-4).unwrap();
        assert_relative_eq!(n, Vector3d::new(0.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_pinched_point_has_no_normal() {
        let cone_tip = |u: f64, v: f64| Point3d::new(0.0 * u, 0.0, v);
        assert!(central_difference_normal(&cone_tip, 0.0, 0.0, 1e-4).is_none());
    }

    #[test]
    fn test_flat_surface_is_not_subdivided() {
        let mut grid = ParameterGrid::uniform(12, 12);
        let added = subdivide_high_curvature(&mut grid, &plane, 1e-4, 0.95);
        assert_eq!(added, 0);
        assert_eq!(grid.nu(), 12);
    }

    #[test]
    fn test_crease_gets_midpoint() {
        // A roof folded 90 degrees along u = 0.
        let roof = |u: f64, v: f64| Point3d::new(u, v, -u.abs());
        let mut grid = ParameterGrid::uniform(4, 5);
        let before = grid.u_values.clone();

        let found = find_high_curvature_edges(&grid, &roof, 1e-4, 0.95);
        assert!(found.v_midpoints.is_empty());
        assert_eq!(found.u_midpoints.len(), 1);
        assert_relative_eq!(found.u_midpoints[0], (before[1] + before[2]) * 0.5);

        let added = subdivide_high_curvature(&mut grid, &roof, 1e-4, 0.95);
        assert_eq!(added, 1);
        assert!(grid.is_valid());
    }

    #[test]
    fn test_threshold_controls_sensitivity() {
        // Unit circle in u swept along v: adjacent normals differ by the u step.
        let cylinder = |u: f64, v: f64| Point3d::new(u.cos(), u.sin(), v);
        let grid = ParameterGrid::uniform(9, 3);
        let step = 2.0 * PI / 8.0;

        let loose = find_high_curvature_edges(&grid, &cylinder, 1e-4, step.cos() - 0.01);
        assert!(loose.is_empty());

        let strict = find_high_curvature_edges(&grid, &cylinder, 1e-4, step.cos() + 0.01);
        assert_eq!(strict.u_midpoints.len(), 8);
        assert!(strict.v_midpoints.is_empty());
    }
}
