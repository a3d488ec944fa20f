//! Renderable geometry of a scene element

use crate::mesher::SuperquadricMesh;
use superquad_core::{Drawable, LineSet, Point3f, Transform3D, TriangleMesh};

/// Either a generated superquadric or a mesh loaded from a file
#[derive(Debug, Clone)]
pub enum SceneGeometry {
    Procedural(SuperquadricMesh),
    Loaded(TriangleMesh),
}

impl SceneGeometry {
    /// Triangle surface in the element's local frame
    pub fn triangle_mesh(&self) -> &TriangleMesh {
        match self {
            SceneGeometry::Procedural(sq) => &sq.mesh,
            SceneGeometry::Loaded(mesh) => mesh,
        }
    }

    pub fn into_triangle_mesh(self) -> TriangleMesh {
        match self {
            SceneGeometry::Procedural(sq) => sq.mesh,
            SceneGeometry::Loaded(mesh) => mesh,
        }
    }

    pub fn is_procedural(&self) -> bool {
        matches!(self, SceneGeometry::Procedural(_))
    }

    /// Wireframe overlay, only generated shapes carry one
    pub fn wireframe(&self) -> Option<&LineSet> {
        match self {
            SceneGeometry::Procedural(sq) => sq.wireframe.as_ref(),
            SceneGeometry::Loaded(_) => None,
        }
    }

    /// Placement the consumer applies; loaded meshes are already in place
    pub fn placement(&self) -> Transform3D {
        match self {
            SceneGeometry::Procedural(sq) => sq.placement,
            SceneGeometry::Loaded(_) => Transform3D::identity(),
        }
    }
}

impl From<SuperquadricMesh> for SceneGeometry {
    fn from(mesh: SuperquadricMesh) -> Self {
        SceneGeometry::Procedural(mesh)
    }
}

impl From<TriangleMesh> for SceneGeometry {
    fn from(mesh: TriangleMesh) -> Self {
        SceneGeometry::Loaded(mesh)
    }
}

impl Drawable for SceneGeometry {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        self.triangle_mesh().bounding_box()
    }
}
