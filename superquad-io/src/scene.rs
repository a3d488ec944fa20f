//! Scene description (`nodes.json`)
//!
//! A scene file is a JSON object mapping element names to property objects,
//! each tagged with a `type`. Superquadric entries carry their shape
//! parameters inline; mesh entries reference a PLY or OBJ file next to the
//! scene file. Every other element type belongs to the viewer and is kept only
//! as its type name.

use crate::{read_mesh, IoError};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use superquad_core::{rgb_to_unit, Error, Result, Transform3D, Transformable, TriangleMesh};
use superquad_mesher::{
    mesh_batch, ParallelConfig, SceneGeometry, ShapeParameters, SuperquadricMesher,
};

fn default_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_visible() -> bool {
    true
}

/// A mesh asset referenced by the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshReference {
    pub filename: String,
    #[serde(default)]
    pub translation: [f32; 3],
    /// Quaternion `[x, y, z, w]`
    #[serde(default = "default_rotation")]
    pub rotation: [f32; 4],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    /// RGB, 0-255 scale; keeps the file's colors when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 3]>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

impl MeshReference {
    /// Scale, then rotate, then translate
    pub fn placement(&self) -> Transform3D {
        Transform3D::translation(Vector3::from(self.translation))
            * Transform3D::from_quaternion_xyzw(self.rotation)
            * Transform3D::scaling(Vector3::from(self.scale))
    }

    /// Read the referenced file relative to `base_dir`, colored and placed
    pub fn load<P: AsRef<Path>>(&self, base_dir: P) -> Result<TriangleMesh> {
        let mut mesh = read_mesh(base_dir.as_ref().join(&self.filename))?;
        if let Some(color) = self.color {
            mesh.fill_color(rgb_to_unit(color));
        }
        mesh.transform(&self.placement());
        Ok(mesh)
    }
}

/// One element of a scene
#[derive(Debug, Clone, PartialEq)]
pub enum SceneElement {
    Superquadric(ShapeParameters),
    Mesh(MeshReference),
    /// An element type this crate does not build
    Other { kind: String },
}

impl SceneElement {
    pub fn kind(&self) -> &str {
        match self {
            SceneElement::Superquadric(_) => "superquadric",
            SceneElement::Mesh(_) => "mesh",
            SceneElement::Other { kind } => kind,
        }
    }

    pub fn is_visible(&self) -> bool {
        match self {
            SceneElement::Superquadric(params) => params.visible,
            SceneElement::Mesh(mesh) => mesh.visible,
            SceneElement::Other { .. } => false,
        }
    }
}

/// A named scene element
#[derive(Debug, Clone, PartialEq)]
pub struct NamedElement {
    pub name: String,
    pub element: SceneElement,
}

/// Built geometry of one element
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub geometry: SceneGeometry,
}

/// Parsed scene, elements in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub elements: Vec<NamedElement>,
}

/// Parse a scene from JSON text
pub fn parse_scene(json: &str) -> Result<Scene> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(entries) = value else {
        return Err(Error::InvalidData("Scene must be a JSON object".to_string()));
    };

    let mut elements = Vec::with_capacity(entries.len());
    for (name, properties) in entries {
        let kind = properties
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::InvalidData(format!("Element '{}' has no type", name)))?
            .to_string();

        let element = match kind.as_str() {
            "superquadric" => SceneElement::Superquadric(
                serde_json::from_value(properties)
                    .map_err(|e| Error::Serialization(format!("Element '{}': {}", name, e)))?,
            ),
            "mesh" => SceneElement::Mesh(
                serde_json::from_value(properties)
                    .map_err(|e| Error::Serialization(format!("Element '{}': {}", name, e)))?,
            ),
            _ => {
                log::debug!("skipping element '{}' of type '{}'", name, kind);
                SceneElement::Other { kind }
            }
        };
        elements.push(NamedElement { name, element });
    }

    Ok(Scene { elements })
}

/// Read and parse a scene file
pub fn read_scene<P: AsRef<Path>>(path: P) -> Result<Scene> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let text = fs::read_to_string(path)?;
    let scene = parse_scene(&text)?;
    log::info!("loaded {} elements from {}", scene.len(), path.display());
    Ok(scene)
}

impl Scene {
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&SceneElement> {
        self.elements
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.element)
    }

    /// Superquadric elements in file order
    pub fn superquadrics(&self) -> impl Iterator<Item = (&str, &ShapeParameters)> {
        self.elements.iter().filter_map(|e| match &e.element {
            SceneElement::Superquadric(params) => Some((e.name.as_str(), params)),
            _ => None,
        })
    }

    /// Mesh elements in file order
    pub fn meshes(&self) -> impl Iterator<Item = (&str, &MeshReference)> {
        self.elements.iter().filter_map(|e| match &e.element {
            SceneElement::Mesh(mesh) => Some((e.name.as_str(), mesh)),
            _ => None,
        })
    }

    /// Serialize back to the viewer's JSON layout. `Other` elements are dropped.
    pub fn to_json(&self) -> Result<String> {
        let mut entries = serde_json::Map::new();
        for NamedElement { name, element } in &self.elements {
            let mut value = match element {
                SceneElement::Superquadric(params) => serde_json::to_value(params)?,
                SceneElement::Mesh(mesh) => serde_json::to_value(mesh)?,
                SceneElement::Other { .. } => continue,
            };
            if let Value::Object(map) = &mut value {
                map.insert("type".to_string(), Value::String(element.kind().to_string()));
            }
            entries.insert(name.clone(), value);
        }
        Ok(serde_json::to_string_pretty(&Value::Object(entries))?)
    }

    /// Build geometry for every element.
    ///
    /// Superquadrics are meshed as one batch; meshes are read relative to
    /// `base_dir`. Hidden elements are skipped unless `include_hidden` is set,
    /// and a mesh whose file is missing is skipped with a warning.
    pub fn build<P: AsRef<Path>>(
        &self,
        mesher: &SuperquadricMesher,
        parallel: &ParallelConfig,
        base_dir: P,
        include_hidden: bool,
    ) -> Result<Vec<SceneObject>> {
        let base_dir = base_dir.as_ref();
        let wanted = |e: &SceneElement| include_hidden || e.is_visible();

        let parameters: Vec<ShapeParameters> = self
            .superquadrics()
            .filter(|(_, params)| include_hidden || params.visible)
            .map(|(_, params)| params.clone())
            .collect();
        let mut meshed = mesh_batch(&parameters, mesher, parallel)?.into_iter();

        let mut objects = Vec::new();
        for NamedElement { name, element } in &self.elements {
            if !wanted(element) {
                continue;
            }
            let geometry = match element {
                SceneElement::Superquadric(_) => match meshed.next() {
                    Some(mesh) => SceneGeometry::Procedural(mesh),
                    None => {
                        return Err(Error::Algorithm("Batch returned too few meshes".to_string()))
                    }
                },
                SceneElement::Mesh(reference) => {
                    let path = base_dir.join(&reference.filename);
                    if !path.exists() {
                        log::warn!("mesh '{}': file {} not found, skipping", name, path.display());
                        continue;
                    }
                    SceneGeometry::Loaded(reference.load(base_dir)?)
                }
                SceneElement::Other { .. } => continue,
            };
            objects.push(SceneObject {
                name: name.clone(),
                geometry,
            });
        }

        Ok(objects)
    }
}
