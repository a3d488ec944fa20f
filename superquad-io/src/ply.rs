//! PLY format support
//!
//! Meshes are written as ASCII PLY with float positions, optional float
//! normals and optional `uchar` red/green/blue colors. The reader accepts any
//! encoding ply-rs understands and fan-triangulates polygon faces.

use crate::{MeshReader, MeshWriter};
use ply_rs::{
    parser::Parser,
    ply::{
        Addable, DefaultElement, ElementDef, Ply, Property, PropertyDef, PropertyType, ScalarType,
    },
    writer::Writer,
};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use superquad_core::{unit_to_rgb8, Error, Point3f, Result, TriangleMesh, Vector3f};

pub struct PlyReader;
pub struct PlyWriter;

impl MeshReader for PlyReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<TriangleMesh> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let parser = Parser::<DefaultElement>::new();
        let ply = parser.read_ply(&mut reader)?;

        let empty = Vec::new();
        let vertex_elements = ply.payload.get("vertex").unwrap_or(&empty);

        let vertices = vertex_elements
            .iter()
            .map(|vertex| {
                Ok(Point3f::new(
                    extract_property_value(vertex, "x")?,
                    extract_property_value(vertex, "y")?,
                    extract_property_value(vertex, "z")?,
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        // Normals and colors are only kept when every vertex carries them.
        let normals: Option<Vec<Vector3f>> = vertex_elements
            .iter()
            .map(|vertex| {
                Some(Vector3f::new(
                    extract_property_value(vertex, "nx").ok()?,
                    extract_property_value(vertex, "ny").ok()?,
                    extract_property_value(vertex, "nz").ok()?,
                ))
            })
            .collect();

        let colors: Option<Vec<[f32; 3]>> = vertex_elements
            .iter()
            .map(|vertex| {
                Some([
                    extract_color_channel(vertex, "red")?,
                    extract_color_channel(vertex, "green")?,
                    extract_color_channel(vertex, "blue")?,
                ])
            })
            .collect();

        let mut faces = Vec::new();
        if let Some(face_elements) = ply.payload.get("face") {
            for face in face_elements {
                let indices = extract_face_indices(face)?;
                if let Some(&bad) = indices.iter().find(|&&i| i >= vertices.len()) {
                    return Err(Error::InvalidData(format!(
                        "Face index {} out of range for {} vertices",
                        bad,
                        vertices.len()
                    )));
                }
                for k in 1..indices.len().saturating_sub(1) {
                    faces.push([indices[0], indices[k], indices[k + 1]]);
                }
            }
        }

        let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, faces);
        if let Some(normals) = normals.filter(|n| !n.is_empty()) {
            mesh.set_normals(normals);
        }
        if let Some(colors) = colors.filter(|c| !c.is_empty()) {
            mesh.set_colors(colors);
        }

        Ok(mesh)
    }
}

fn scalar_property(name: &str, scalar: ScalarType) -> PropertyDef {
    PropertyDef::new(name.to_string(), PropertyType::Scalar(scalar))
}

impl MeshWriter for PlyWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &TriangleMesh, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let mut ply = Ply::<DefaultElement>::new();
        ply.header.comments.push("generated by superquad".to_string());

        let normals = mesh
            .normals
            .as_ref()
            .filter(|n| n.len() == mesh.vertices.len());
        let colors = mesh
            .colors
            .as_ref()
            .filter(|c| c.len() == mesh.vertices.len());

        let mut vertex_element = ElementDef::new("vertex".to_string());
        vertex_element.count = mesh.vertices.len();
        for name in ["x", "y", "z"] {
            vertex_element.properties.add(scalar_property(name, ScalarType::Float));
        }
        if normals.is_some() {
            for name in ["nx", "ny", "nz"] {
                vertex_element.properties.add(scalar_property(name, ScalarType::Float));
            }
        }
        if colors.is_some() {
            for name in ["red", "green", "blue"] {
                vertex_element.properties.add(scalar_property(name, ScalarType::UChar));
            }
        }
        ply.header.elements.add(vertex_element);

        let mut face_element = ElementDef::new("face".to_string());
        face_element.count = mesh.faces.len();
        face_element.properties.add(PropertyDef::new(
            "vertex_indices".to_string(),
            PropertyType::List(ScalarType::UChar, ScalarType::Int),
        ));
        ply.header.elements.add(face_element);

        let vertices = mesh
            .vertices
            .iter()
            .enumerate()
            .map(|(i, vertex)| {
                let mut element = DefaultElement::new();
                element.insert("x".to_string(), Property::Float(vertex.x));
                element.insert("y".to_string(), Property::Float(vertex.y));
                element.insert("z".to_string(), Property::Float(vertex.z));

                if let Some(normals) = normals {
                    element.insert("nx".to_string(), Property::Float(normals[i].x));
                    element.insert("ny".to_string(), Property::Float(normals[i].y));
                    element.insert("nz".to_string(), Property::Float(normals[i].z));
                }
                if let Some(colors) = colors {
                    let [r, g, b] = unit_to_rgb8(colors[i]);
                    element.insert("red".to_string(), Property::UChar(r));
                    element.insert("green".to_string(), Property::UChar(g));
                    element.insert("blue".to_string(), Property::UChar(b));
                }
                element
            })
            .collect();
        ply.payload.insert("vertex".to_string(), vertices);

        let faces = mesh
            .faces
            .iter()
            .map(|face| {
                let indices = face
                    .iter()
                    .map(|&i| {
                        i32::try_from(i).map_err(|_| {
                            Error::InvalidData(format!("Vertex index {} does not fit a PLY int", i))
                        })
                    })
                    .collect::<Result<Vec<i32>>>()?;
                let mut element = DefaultElement::new();
                element.insert("vertex_indices".to_string(), Property::ListInt(indices));
                Ok(element)
            })
            .collect::<Result<Vec<_>>>()?;
        ply.payload.insert("face".to_string(), faces);

        Writer::new().write_ply(&mut writer, &mut ply)?;
        writer.flush()?;

        Ok(())
    }
}

/// Extract a property value as f32 from a PLY element
fn extract_property_value(element: &DefaultElement, name: &str) -> Result<f32> {
    match element.get(name) {
        Some(Property::Float(val)) => Ok(*val),
        Some(Property::Double(val)) => Ok(*val as f32),
        Some(Property::Int(val)) => Ok(*val as f32),
        Some(Property::UInt(val)) => Ok(*val as f32),
        Some(Property::Short(val)) => Ok(f32::from(*val)),
        Some(Property::UShort(val)) => Ok(f32::from(*val)),
        _ => Err(Error::InvalidData(format!(
            "Property '{}' not found or invalid type",
            name
        ))),
    }
}

/// Color channel on the 0-1 scale; integer channels are read as 0-255
fn extract_color_channel(element: &DefaultElement, name: &str) -> Option<f32> {
    match element.get(name)? {
        Property::UChar(val) => Some(f32::from(*val) / 255.0),
        Property::UShort(val) => Some(f32::from(*val) / 65535.0),
        Property::Float(val) => Some(*val),
        Property::Double(val) => Some(*val as f32),
        _ => None,
    }
}

/// Extract face indices from a PLY face element
fn extract_face_indices(element: &DefaultElement) -> Result<Vec<usize>> {
    let to_index = |idx: i64| {
        usize::try_from(idx).map_err(|_| Error::InvalidData(format!("Negative face index {}", idx)))
    };
    let widened: Vec<i64> = match element
        .get("vertex_indices")
        .or_else(|| element.get("vertex_index"))
    {
        Some(Property::ListInt(indices)) => indices.iter().map(|&i| i64::from(i)).collect(),
        Some(Property::ListUInt(indices)) => indices.iter().map(|&i| i64::from(i)).collect(),
        Some(Property::ListUChar(indices)) => indices.iter().map(|&i| i64::from(i)).collect(),
        Some(Property::ListShort(indices)) => indices.iter().map(|&i| i64::from(i)).collect(),
        Some(Property::ListUShort(indices)) => indices.iter().map(|&i| i64::from(i)).collect(),
        _ => return Err(Error::InvalidData("Face indices not found".to_string())),
    };
    widened.into_iter().map(to_index).collect()
}
