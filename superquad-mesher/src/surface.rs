//! Superquadric surface evaluation and shape deformation
//!
//! A point at parameter `(u, v)`, `u` in [-pi, pi] and `v` in [-pi/2, pi/2], is
//!
//! ```text
//! x = A * g(v, r) * g(u, s)
//! y = B * g(v, r) * f(u, s)
//! z = C * f(v, t)
//! ```
//!
//! with the signed powers `f(θ, m) = sign(sin θ)|sin θ|^m` and
//! `g(θ, m) = sign(cos θ)|cos θ|^m`. Evaluated points are then tapered, bent
//! and rotated, in that order.

use crate::params::{Bend, BendAxis, ShapeParameters, BEND_EPSILON};
use nalgebra::Matrix3;
use superquad_core::Point3d;

fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// `sign(sin θ) * |sin θ|^m`
pub fn signed_sin_power(theta: f64, m: f64) -> f64 {
    let s = theta.sin();
    sign(s) * s.abs().powf(m)
}

/// `sign(cos θ) * |cos θ|^m`
pub fn signed_cos_power(theta: f64, m: f64) -> f64 {
    let c = theta.cos();
    sign(c) * c.abs().powf(m)
}

/// Scale x and y linearly along z: factor `taper * z / c + 1`.
pub fn apply_tapering(p: Point3d, tapering: [f64; 2], c: f64) -> Point3d {
    let z_norm = p.z / c;
    Point3d::new(
        p.x * (tapering[0] * z_norm + 1.0),
        p.y * (tapering[1] * z_norm + 1.0),
        p.z,
    )
}

/// Bend a point about one coordinate axis.
///
/// The two axes orthogonal to `axis` form the local `(u, v)` plane and the
/// bend axis is `w`. The point is projected onto the bend direction `angle`,
/// mapped onto the circle of radius `1 / curvature` and rotated back. With
/// `|curvature| < 1e-3` the point is returned unchanged.
pub fn apply_bending_axis(p: Point3d, curvature: f64, angle: f64, axis: BendAxis) -> Point3d {
    if curvature.abs() < BEND_EPSILON {
        return p;
    }

    let (u, v, w) = match axis {
        BendAxis::Z => (p.x, p.y, p.z),
        BendAxis::X => (p.y, p.z, p.x),
        BendAxis::Y => (p.z, p.x, p.y),
    };

    let (sin_a, cos_a) = angle.sin_cos();
    // |(u, v)| * cos(angle - atan2(v, u))
    let r = u * cos_a + v * sin_a;
    let inv_k = 1.0 / curvature;
    let gamma = w * curvature;
    let rho = inv_k - r;
    let big_r = inv_k - rho * gamma.cos();
    let shift = big_r - r;

    let u = u + shift * cos_a;
    let v = v + shift * sin_a;
    let w = rho * gamma.sin();

    match axis {
        BendAxis::Z => Point3d::new(u, v, w),
        BendAxis::X => Point3d::new(w, u, v),
        BendAxis::Y => Point3d::new(v, w, u),
    }
}

/// Evaluator for one deformed superquadric
#[derive(Debug, Clone)]
pub struct SuperquadricSurface {
    scalings: [f64; 3],
    exponents: [f64; 3],
    tapering: Option<[f64; 2]>,
    bends: Vec<Bend>,
    rotation: Option<Matrix3<f64>>,
}

impl SuperquadricSurface {
    pub fn new(params: &ShapeParameters) -> Self {
        Self {
            scalings: params.scalings,
            exponents: params.exponents,
            tapering: params.active_tapering(),
            bends: params.active_bends(),
            rotation: params.rotation_matrix3(),
        }
    }

    /// Point on the undeformed surface
    pub fn undeformed(&self, u: f64, v: f64) -> Point3d {
        let [a, b, c] = self.scalings;
        let [r, s, t] = self.exponents;
        let gv = signed_cos_power(v, r);
        Point3d::new(
            a * gv * signed_cos_power(u, s),
            b * gv * signed_sin_power(u, s),
            c * signed_sin_power(v, t),
        )
    }

    /// Taper, bend and rotate an undeformed point
    pub fn deform(&self, p: Point3d) -> Point3d {
        let mut p = p;
        if let Some(tapering) = self.tapering {
            p = apply_tapering(p, tapering, self.scalings[2]);
        }
        for bend in &self.bends {
            p = apply_bending_axis(p, bend.curvature, bend.angle, bend.axis);
        }
        match &self.rotation {
            Some(m) => Point3d::from(m * p.coords),
            None => p,
        }
    }

    /// Point on the deformed surface
    pub fn evaluate(&self, u: f64, v: f64) -> Point3d {
        self.deform(self.undeformed(u, v))
    }
}
