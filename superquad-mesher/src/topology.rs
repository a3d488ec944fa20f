//! Triangle topology of a parameter grid
//!
//! Vertices are stored v-major, u-minor: the node `(i, j)` with `i` indexing
//! `u_values` and `j` indexing `v_values` lives at `j * nu + i`. The last u
//! column is stitched back to the first; the v direction is left open since the
//! parameterization already pinches the poles.

use crate::grid::ParameterGrid;
use superquad_core::{to_point3f, Point3d, Point3f};

/// Linear vertex index of grid node `(i, j)`
#[inline]
pub fn grid_index(i: usize, j: usize, nu: usize) -> usize {
    j * nu + i
}

/// Two triangles per cell, plus the seam cells between column `nu - 1` and column `0`.
pub fn grid_faces(nu: usize, nv: usize) -> Vec<[usize; 3]> {
    if nu < 2 || nv < 2 {
        return Vec::new();
    }

    let mut faces = Vec::with_capacity(2 * nu * (nv - 1));
    for j in 0..nv - 1 {
        for i in 0..nu {
            // i == nu - 1 is the seam cell wrapping back to column 0
            let next = (i + 1) % nu;
            let i00 = grid_index(i, j, nu);
            let i10 = grid_index(next, j, nu);
            let i11 = grid_index(next, j + 1, nu);
            let i01 = grid_index(i, j + 1, nu);
            faces.push([i00, i10, i11]);
            faces.push([i00, i11, i01]);
        }
    }
    faces
}

/// Evaluate the surface at every grid node
pub fn grid_positions<F>(grid: &ParameterGrid, surface: F) -> Vec<Point3f>
where
    F: Fn(f64, f64) -> Point3d,
{
    grid.v_values
        .iter()
        .flat_map(|&v| grid.u_values.iter().map(move |&u| (u, v)))
        .map(|(u, v)| to_point3f(&surface(u, v)))
        .collect()
}
