//! Core data structures and traits for superquad
//!
//! This crate provides the geometric types shared by the mesher, the I/O layer
//! and the command-line front end: points, triangle meshes, line sets,
//! rigid placements and the common error type.

pub mod point;
pub mod mesh;
pub mod lines;
pub mod traits;
pub mod transform;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use lines::*;
pub use traits::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};
