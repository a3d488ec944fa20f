//! # Superquad Mesher
//!
//! Procedural meshing of deformed superquadrics.
//!
//! A [`ShapeParameters`] record goes in, a [`SuperquadricMesh`] comes out. The
//! surface is tapered, bent and optionally rotated, then sampled on a
//! parameter grid whose edges have roughly equal length on the deformed
//! surface, with extra samples where the surface turns sharply.

pub mod params;
pub mod surface;
pub mod grid;
pub mod curvature;
pub mod topology;
pub mod mesher;
pub mod geometry;
pub mod batch;

// Re-export commonly used items
pub use params::*;
pub use surface::*;
pub use grid::*;
pub use curvature::*;
pub use topology::*;
pub use mesher::*;
pub use geometry::*;
pub use batch::*;
