//! Line segment sets, used for wireframe overlays

use crate::mesh::TriangleMesh;
use crate::point::*;
use serde::{Deserialize, Serialize};

/// Indexed line segments sharing one flat color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSet {
    pub vertices: Vec<Point3f>,
    pub segments: Vec<[usize; 2]>,
    /// RGB on the 0-1 scale
    pub color: [f32; 3],
}

impl LineSet {
    /// Wireframe of a triangle mesh: every face edge once, sharing the mesh vertices.
    pub fn wireframe_of(mesh: &TriangleMesh, color: [f32; 3]) -> Self {
        Self {
            vertices: mesh.vertices.clone(),
            segments: mesh.unique_edges(),
            color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wireframe_of_single_triangle() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(3.0, 0.0, 0.0),
                Point3f::new(0.0, 4.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let lines = LineSet::wireframe_of(&mesh, [0.0, 0.0, 0.0]);
        assert_eq!(lines.segments, vec![[0, 1], [0, 2], [1, 2]]);
        assert_eq!(lines.vertices, mesh.vertices);
    }

    #[test]
    fn test_shared_edge_listed_once() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        );
        let lines = LineSet::wireframe_of(&mesh, [1.0, 1.0, 1.0]);
        assert_eq!(lines.segments.len(), 5);
        assert_eq!(lines.color, [1.0, 1.0, 1.0]);
    }
}
