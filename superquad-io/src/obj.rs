//! OBJ format support
//!
//! Reading goes through `tobj`, triangulated and with a single index per
//! vertex; every object in the file is merged into one mesh. Materials and
//! texture coordinates are ignored. The writer emits `v`, `vn` and
//! `f v//vn` records.

use crate::{IoError, MeshReader, MeshWriter};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use superquad_core::{Point3f, Result, TriangleMesh, Vector3f};

pub struct ObjReader;
pub struct ObjWriter;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

impl ObjReader {
    /// Parse OBJ text
    pub fn parse<R: BufRead>(mut reader: R) -> Result<TriangleMesh> {
        // Material libraries are not followed.
        let (models, _materials) = tobj::load_obj_buf(&mut reader, &load_options(), |_| {
            Err(tobj::LoadError::OpenFileFailed)
        })
        .map_err(IoError::from)?;

        let mut vertices = Vec::new();
        let mut normals = Vec::new();
        let mut faces = Vec::new();
        let mut all_have_normals = true;

        for model in models {
            let mesh = model.mesh;
            let offset = vertices.len();

            vertices.extend(
                mesh.positions
                    .chunks_exact(3)
                    .map(|p| Point3f::new(p[0], p[1], p[2])),
            );

            if mesh.normals.len() == mesh.positions.len() {
                normals.extend(
                    mesh.normals
                        .chunks_exact(3)
                        .map(|n| Vector3f::new(n[0], n[1], n[2])),
                );
            } else {
                all_have_normals = false;
            }

            faces.extend(mesh.indices.chunks_exact(3).map(|f| {
                [
                    offset + f[0] as usize,
                    offset + f[1] as usize,
                    offset + f[2] as usize,
                ]
            }));
        }

        log::debug!("read OBJ with {} vertices and {} faces", vertices.len(), faces.len());

        let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
        if all_have_normals && !normals.is_empty() {
            mesh.set_normals(normals);
        }
        Ok(mesh)
    }
}

impl MeshReader for ObjReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }
}

impl ObjWriter {
    /// Write OBJ text
    pub fn write<W: Write>(mesh: &TriangleMesh, out: &mut W) -> Result<()> {
        writeln!(out, "# generated by superquad")?;
        for v in &mesh.vertices {
            writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
        }

        let normals = mesh
            .normals
            .as_ref()
            .filter(|n| n.len() == mesh.vertices.len());

        match normals {
            Some(normals) => {
                for n in normals {
                    writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
                }
                for [a, b, c] in &mesh.faces {
                    writeln!(out, "f {0}//{0} {1}//{1} {2}//{2}", a + 1, b + 1, c + 1)?;
                }
            }
            None => {
                for [a, b, c] in &mesh.faces {
                    writeln!(out, "f {} {} {}", a + 1, b + 1, c + 1)?;
                }
            }
        }
        Ok(())
    }
}

impl MeshWriter for ObjWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write(mesh, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
