//! # superquad
//!
//! Procedural superquadric meshing for Rust.
//!
//! This is the umbrella crate that re-exports the workspace crates. Use it to
//! get everything in one place, or depend on individual crates for tighter
//! control over dependencies.
//!
//! ## Quick Start
//!
//! ```rust
//! use superquad::prelude::*;
//!
//! // A rounded box, tapered towards -z
//! let params = ShapeParameters::new([1.0, 1.0, 2.0], [0.3, 0.3, 1.0])
//!     .with_resolution(30)
//!     .with_tapering([0.5, 0.5]);
//! let result = mesh_superquadric(&params);
//!
//! let grid = &result.grid;
//! assert_eq!(result.triangle_count(), 2 * grid.nu() * (grid.nv() - 1));
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables mesher and io
//! - `mesher`: Superquadric surface evaluation and meshing
//! - `io`: Scene files, PLY and OBJ support (implies `mesher`)
//! - `all`: Enables all features

// Re-export core functionality
pub use superquad_core::*;

// Re-export sub-crates
#[cfg(feature = "mesher")]
pub use superquad_mesher as mesher;

#[cfg(feature = "io")]
pub use superquad_io as io;

/// Convenient imports for common use cases
pub mod prelude {
    pub use superquad_core::{
        Drawable, Error, LineSet, Point3f, Result, Transform3D, Transformable, TriangleMesh,
        Vector3f,
    };

    #[cfg(feature = "mesher")]
    pub use superquad_mesher::{
        mesh_batch, mesh_superquadric, MesherConfig, ParallelConfig, ParameterGrid, SceneGeometry,
        ShapeParameters, SuperquadricMesh, SuperquadricMesher,
    };

    #[cfg(feature = "io")]
    pub use superquad_io::{
        parse_scene, read_mesh, read_scene, write_mesh, MeshFormat, Scene, SceneElement,
        SceneObject,
    };
}
