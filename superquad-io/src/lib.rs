//! Scene and mesh I/O for superquad
//!
//! This crate reads the viewer's `nodes.json` scene description, reads PLY and
//! OBJ meshes referenced by it, and writes generated meshes as PLY or OBJ.

pub mod ply;
pub mod obj;
pub mod scene;
pub mod error;

pub use error::*;
pub use scene::*;

use std::path::Path;
use superquad_core::{Result, TriangleMesh};

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh>;
}

/// Trait for writing meshes to files
pub trait MeshWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()>;
}

/// Mesh file formats supported for reading and writing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshFormat {
    Ply,
    Obj,
}

impl MeshFormat {
    /// Detect the format from a file extension, case-insensitively
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("ply") => Ok(MeshFormat::Ply),
            Some("obj") => Ok(MeshFormat::Obj),
            _ => Err(IoError::InvalidFormat {
                format: format!("Unsupported mesh format: {:?}", path.extension()),
            }
            .into()),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            MeshFormat::Ply => "ply",
            MeshFormat::Obj => "obj",
        }
    }
}

/// Auto-detect format and read mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
    let path = path.as_ref();
    match MeshFormat::from_path(path)? {
        MeshFormat::Ply => ply::PlyReader::read_mesh(path),
        MeshFormat::Obj => obj::ObjReader::read_mesh(path),
    }
}

/// Auto-detect format and write mesh
pub fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match MeshFormat::from_path(path)? {
        MeshFormat::Ply => ply::PlyWriter::write_mesh(mesh, path),
        MeshFormat::Obj => obj::ObjWriter::write_mesh(mesh, path),
    }
}
