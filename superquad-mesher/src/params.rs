//! Shape parameters of a superquadric element
//!
//! Field names follow the scene description written by the viewer, so a
//! `superquadric` entry of `nodes.json` deserializes directly into
//! [`ShapeParameters`].

use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

/// Taper factors below this magnitude are ignored
pub const TAPER_EPSILON: f64 = 1e-6;

/// Bends whose curvature magnitude is below this are no-ops
pub const BEND_EPSILON: f64 = 1e-3;

/// Axis a single bend rotates about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BendAxis {
    X,
    Y,
    Z,
}

/// One single-axis bend: curvature `k` and bend-direction angle `alpha`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bend {
    pub axis: BendAxis,
    pub curvature: f64,
    pub angle: f64,
}

/// Input of one mesher invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeParameters {
    /// Principal semi-axis lengths (A, B, C)
    pub scalings: [f64; 3],
    /// Shape exponents (r, s, t)
    pub exponents: [f64; 3],
    /// Sampling density hint
    #[serde(default = "default_resolution")]
    pub resolution: u32,
    /// Linear taper factors along x and y as a function of z / C
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tapering: Option<[f64; 2]>,
    /// `[k_z, alpha_z, k_x, alpha_x, k_y, alpha_y]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bending: Option<[f64; 6]>,
    /// Row-major 3x3 matrix applied after tapering and bending
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_matrix: Option<[[f64; 3]; 3]>,
    /// RGB, 0-255 scale
    #[serde(default = "default_color")]
    pub color: [f32; 3],
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    #[serde(default)]
    pub wireframe: bool,
    /// Orientation quaternion `[x, y, z, w]`, applied by the consumer
    #[serde(default = "default_rotation")]
    pub rotation: [f32; 4],
    /// Offset applied by the consumer
    #[serde(default)]
    pub translation: [f32; 3],
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_resolution() -> u32 {
    100
}

fn default_color() -> [f32; 3] {
    [255.0, 255.0, 255.0]
}

fn default_alpha() -> f32 {
    1.0
}

fn default_rotation() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn default_visible() -> bool {
    true
}

impl Default for ShapeParameters {
    fn default() -> Self {
        Self::new([1.0, 1.0, 1.0], [1.0, 1.0, 1.0])
    }
}

impl ShapeParameters {
    /// Create parameters for an undeformed superquadric with viewer defaults
    pub fn new(scalings: [f64; 3], exponents: [f64; 3]) -> Self {
        Self {
            scalings,
            exponents,
            resolution: default_resolution(),
            tapering: None,
            bending: None,
            rotation_matrix: None,
            color: default_color(),
            alpha: default_alpha(),
            wireframe: false,
            rotation: default_rotation(),
            translation: [0.0; 3],
            visible: default_visible(),
        }
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_tapering(mut self, tapering: [f64; 2]) -> Self {
        self.tapering = Some(tapering);
        self
    }

    pub fn with_bending(mut self, bending: [f64; 6]) -> Self {
        self.bending = Some(bending);
        self
    }

    pub fn with_rotation_matrix(mut self, rows: [[f64; 3]; 3]) -> Self {
        self.rotation_matrix = Some(rows);
        self
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_wireframe(mut self, wireframe: bool) -> Self {
        self.wireframe = wireframe;
        self
    }

    pub fn with_rotation(mut self, quaternion_xyzw: [f32; 4]) -> Self {
        self.rotation = quaternion_xyzw;
        self
    }

    pub fn with_translation(mut self, translation: [f32; 3]) -> Self {
        self.translation = translation;
        self
    }

    /// Taper factors, or `None` when both are negligible
    pub fn active_tapering(&self) -> Option<[f64; 2]> {
        self.tapering
            .filter(|t| t[0].abs() > TAPER_EPSILON || t[1].abs() > TAPER_EPSILON)
    }

    /// Bends in application order (y, then x, then z), skipping no-op bends
    pub fn active_bends(&self) -> Vec<Bend> {
        let Some(b) = self.bending else {
            return Vec::new();
        };

        [
            Bend { axis: BendAxis::Y, curvature: b[4], angle: b[5] },
            Bend { axis: BendAxis::X, curvature: b[2], angle: b[3] },
            Bend { axis: BendAxis::Z, curvature: b[0], angle: b[1] },
        ]
        .into_iter()
        .filter(|bend| bend.curvature.abs() >= BEND_EPSILON)
        .collect()
    }

    /// Rotation matrix as an nalgebra matrix
    pub fn rotation_matrix3(&self) -> Option<Matrix3<f64>> {
        self.rotation_matrix
            .map(|rows| Matrix3::from_fn(|r, c| rows[r][c]))
    }
}
