//! Superquadric mesh generation
//!
//! The pipeline is: boundary arc-length sampling, a few equalization passes,
//! one curvature-driven subdivision, a few more equalization passes, then
//! topology assembly. Every build starts from scratch; nothing is cached
//! between calls.

use crate::curvature::subdivide_high_curvature;
use crate::grid::ParameterGrid;
use crate::params::ShapeParameters;
use crate::surface::SuperquadricSurface;
use crate::topology::{grid_faces, grid_positions};
use serde::{Deserialize, Serialize};
use superquad_core::{rgb_to_unit, LineSet, Transform3D, Transformable, TriangleMesh, Vector3};

/// Configuration for the superquadric mesher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MesherConfig {
    /// Samples along each boundary curve for the initial arc-length inversion
    pub dense_samples: usize,
    /// Equalization passes before curvature subdivision
    pub initial_iterations: usize,
    /// Equalization passes after curvature subdivision
    pub refine_iterations: usize,
    /// Adjacent normals with a dot product below this get a midpoint
    pub curvature_threshold: f64,
    /// Central difference step for node normals
    pub normal_epsilon: f64,
    /// Lower clamp of the per-axis grid size
    pub min_grid: usize,
    /// Upper clamp of the per-axis grid size
    pub max_grid: usize,
    /// Grid size is `round(resolution * resolution_scale)` before clamping
    pub resolution_scale: f64,
    /// Run the curvature subdivision pass
    pub subdivide: bool,
    /// Compute area-weighted vertex normals
    pub compute_normals: bool,
}

impl Default for MesherConfig {
    fn default() -> Self {
        Self {
            dense_samples: 500,
            initial_iterations: 5,
            refine_iterations: 3,
            curvature_threshold: 0.95,
            normal_epsilon: 1e-4,
            min_grid: 10,
            max_grid: 50,
            resolution_scale: 0.8,
            subdivide: true,
            compute_normals: true,
        }
    }
}

impl MesherConfig {
    pub fn with_dense_samples(mut self, samples: usize) -> Self {
        self.dense_samples = samples;
        self
    }

    pub fn with_iterations(mut self, initial: usize, refine: usize) -> Self {
        self.initial_iterations = initial;
        self.refine_iterations = refine;
        self
    }

    pub fn with_curvature_threshold(mut self, threshold: f64) -> Self {
        self.curvature_threshold = threshold;
        self
    }

    pub fn with_grid_range(mut self, min: usize, max: usize) -> Self {
        self.min_grid = min;
        self.max_grid = max;
        self
    }

    pub fn with_subdivision(mut self, subdivide: bool) -> Self {
        self.subdivide = subdivide;
        self
    }

    pub fn with_normals(mut self, compute_normals: bool) -> Self {
        self.compute_normals = compute_normals;
        self
    }

    /// Per-axis grid size before curvature subdivision
    pub fn grid_size(&self, resolution: u32) -> usize {
        let scaled = (f64::from(resolution) * self.resolution_scale).round() as usize;
        let min = self.min_grid.max(2);
        scaled.clamp(min, self.max_grid.max(min))
    }
}

/// Flat surface material handed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMaterial {
    /// RGB on the 0-1 scale
    pub color: [f32; 3],
    pub alpha: f32,
    pub flat_shading: bool,
}

impl SurfaceMaterial {
    pub fn is_transparent(&self) -> bool {
        self.alpha < 1.0
    }
}

/// Output of one mesher invocation
#[derive(Debug, Clone)]
pub struct SuperquadricMesh {
    /// Surface in the shape's local frame (after tapering, bending and the
    /// optional rotation matrix)
    pub mesh: TriangleMesh,
    /// Final parameter grid the mesh was built from
    pub grid: ParameterGrid,
    pub wireframe: Option<LineSet>,
    pub material: SurfaceMaterial,
    /// Rotation and translation the consumer applies
    pub placement: Transform3D,
    pub visible: bool,
}

impl SuperquadricMesh {
    pub fn triangle_count(&self) -> usize {
        self.mesh.face_count()
    }

    /// Copy of the surface with the placement applied
    pub fn to_world(&self) -> TriangleMesh {
        let mut mesh = self.mesh.clone();
        mesh.transform(&self.placement);
        mesh
    }

    /// Copy of the wireframe with the placement applied
    pub fn wireframe_to_world(&self) -> Option<LineSet> {
        self.wireframe.as_ref().map(|lines| {
            let mut lines = lines.clone();
            lines.transform(&self.placement);
            lines
        })
    }
}

/// Placement of a shape in the scene.
///
/// An explicit rotation matrix is already baked into the vertices, so only the
/// translation remains; otherwise the quaternion rotation is applied first.
pub fn placement_of(params: &ShapeParameters) -> Transform3D {
    let translation = Vector3::from(params.translation);
    if params.rotation_matrix.is_some() {
        return Transform3D::translation(translation);
    }
    let rotation = Transform3D::from_quaternion_xyzw(params.rotation);
    Transform3D::translation(translation) * rotation
}

/// Procedural superquadric mesher
#[derive(Debug, Clone, Default)]
pub struct SuperquadricMesher {
    config: MesherConfig,
}

impl SuperquadricMesher {
    /// Create a new mesher
    pub fn new(config: MesherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MesherConfig {
        &self.config
    }

    /// Build the resampled parameter grid for a surface
    pub fn build_grid(&self, surface: &SuperquadricSurface, resolution: u32) -> ParameterGrid {
        let n = self.config.grid_size(resolution);
        let eval = |u: f64, v: f64| surface.evaluate(u, v);

        let mut grid = ParameterGrid::from_boundary_curves(n, self.config.dense_samples, |u, v| {
            surface.undeformed(u, v)
        });
        log::debug!("initial grid {}x{} (resolution {})", grid.nu(), grid.nv(), resolution);

        for _ in 0..self.config.initial_iterations {
            grid.equalize(eval);
        }

        if self.config.subdivide {
            let added = subdivide_high_curvature(
                &mut grid,
                &eval,
                self.config.normal_epsilon,
                self.config.curvature_threshold,
            );
            log::debug!(
                "curvature pass added {} samples, grid now {}x{}",
                added,
                grid.nu(),
                grid.nv()
            );
        }

        for _ in 0..self.config.refine_iterations {
            grid.equalize(eval);
        }

        grid
    }

    /// Mesh one superquadric
    pub fn mesh(&self, params: &ShapeParameters) -> SuperquadricMesh {
        let surface = SuperquadricSurface::new(params);
        let grid = self.build_grid(&surface, params.resolution);

        let vertices = grid_positions(&grid, |u, v| surface.evaluate(u, v));
        let faces = grid_faces(grid.nu(), grid.nv());
        let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);

        let color = rgb_to_unit(params.color);
        mesh.fill_color(color);
        if self.config.compute_normals {
            mesh.compute_vertex_normals();
        }

        let wireframe = params
            .wireframe
            .then(|| LineSet::wireframe_of(&mesh, color));

        log::debug!(
            "superquadric mesh: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.face_count()
        );

        SuperquadricMesh {
            mesh,
            grid,
            wireframe,
            material: SurfaceMaterial {
                color,
                alpha: params.alpha,
                flat_shading: false,
            },
            placement: placement_of(params),
            visible: params.visible,
        }
    }
}

/// Mesh one superquadric with the default configuration
pub fn mesh_superquadric(params: &ShapeParameters) -> SuperquadricMesh {
    SuperquadricMesher::default().mesh(params)
}
