//! Mesh data structures and functionality

use crate::point::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A triangle mesh with vertices and faces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
    /// Per-vertex RGB colors on the 0-1 scale
    pub colors: Option<Vec<[f32; 3]>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
            colors: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
            colors: None,
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Unnormalized face normals; the length of each is twice the triangle area.
    fn weighted_face_normals(&self) -> Vec<Vector3f> {
        self.faces
            .iter()
            .map(|face| {
                let v0 = self.vertices[face[0]];
                let v1 = self.vertices[face[1]];
                let v2 = self.vertices[face[2]];

                (v1 - v0).cross(&(v2 - v0))
            })
            .collect()
    }

    /// Compute area-weighted vertex normals from the current faces and store them.
    ///
    /// Vertices that touch no face with a nonzero area keep a +z normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vector3f::zeros(); self.vertices.len()];

        for (face, face_normal) in self.faces.iter().zip(self.weighted_face_normals()) {
            for &index in face {
                normals[index] += face_normal;
            }
        }

        for normal in &mut normals {
            *normal = normal
                .try_normalize(1e-12)
                .unwrap_or_else(|| Vector3f::new(0.0, 0.0, 1.0));
        }

        self.normals = Some(normals);
    }

    /// Set vertex normals
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }

    /// Set vertex colors
    pub fn set_colors(&mut self, colors: Vec<[f32; 3]>) {
        if colors.len() == self.vertices.len() {
            self.colors = Some(colors);
        }
    }

    /// Give every vertex the same color
    pub fn fill_color(&mut self, color: [f32; 3]) {
        self.colors = Some(vec![color; self.vertices.len()]);
    }

    /// Undirected edges of all faces, each reported once as `[low, high]`.
    pub fn unique_edges(&self) -> Vec<[usize; 2]> {
        let mut edges = BTreeSet::new();
        for face in &self.faces {
            for k in 0..3 {
                let a = face[k];
                let b = face[(k + 1) % 3];
                edges.insert([a.min(b), a.max(b)]);
            }
        }
        edges.into_iter().collect()
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
