//! Rigid placement of generated geometry

use nalgebra::{Matrix3, Matrix4, Point3, Quaternion, UnitQuaternion, Vector3};

/// Homogeneous placement applied to meshes after construction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform3D {
    pub matrix: Matrix4<f32>,
}

impl Transform3D {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn translation(translation: Vector3<f32>) -> Self {
        Self {
            matrix: Matrix4::new_translation(&translation),
        }
    }

    /// Per-axis scaling about the origin
    pub fn scaling(scale: Vector3<f32>) -> Self {
        Self {
            matrix: Matrix4::new_nonuniform_scaling(&scale),
        }
    }

    /// Rotation from an `[x, y, z, w]` quaternion, the order scene files use.
    ///
    /// The quaternion is normalized; a zero quaternion yields the identity.
    pub fn from_quaternion_xyzw(q: [f32; 4]) -> Self {
        let raw = Quaternion::new(q[3], q[0], q[1], q[2]);
        if raw.norm() < f32::EPSILON {
            return Self::identity();
        }
        Self {
            matrix: UnitQuaternion::from_quaternion(raw).to_homogeneous(),
        }
    }

    pub fn transform_point(&self, point: &Point3<f32>) -> Point3<f32> {
        let homogeneous = self.matrix * point.to_homogeneous();
        Point3::from_homogeneous(homogeneous).unwrap_or(*point)
    }

    /// Transform a surface normal with the inverse transpose of the linear part.
    ///
    /// Falls back to the linear part itself when it is singular.
    pub fn transform_normal(&self, normal: &Vector3<f32>) -> Vector3<f32> {
        let linear: Matrix3<f32> = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
        let mapped = match linear.try_inverse() {
            Some(inv) => inv.transpose() * normal,
            None => linear * normal,
        };
        mapped.try_normalize(1e-12).unwrap_or(*normal)
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

/// `a * b` applies `b` first
impl std::ops::Mul for Transform3D {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            matrix: self.matrix * rhs.matrix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_quaternion_xyzw_order() {
        // 90 degrees about z
        let t = Transform3D::from_quaternion_xyzw([0.0, 0.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2]);
        let p = t.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_unnormalized_quaternion() {
        let t = Transform3D::from_quaternion_xyzw([0.0, 0.0, 3.0, 3.0]);
        let p = t.transform_point(&Point3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(0.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_zero_quaternion_is_identity() {
        assert_eq!(Transform3D::from_quaternion_xyzw([0.0; 4]), Transform3D::identity());
    }

    #[test]
    fn test_scale_rotate_translate_order() {
        let t = Transform3D::translation(Vector3::new(1.0, 0.0, 0.0))
            * Transform3D::from_quaternion_xyzw([0.0, 0.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2])
            * Transform3D::scaling(Vector3::new(3.0, 1.0, 1.0));
        let p = t.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(1.0, 3.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_normal_under_nonuniform_scale() {
        let t = Transform3D::scaling(Vector3::new(2.0, 1.0, 1.0));
        // Plane x + y = const has normal (1,1,0)/sqrt2; scaling x by 2 turns it
        // into (1,2,0)/sqrt5.
        let n = t.transform_normal(&Vector3::new(1.0, 1.0, 0.0).normalize());
        assert_relative_eq!(n, Vector3::new(1.0, 2.0, 0.0).normalize(), epsilon = 1e-6);
    }

    #[test]
    fn test_singular_scale_keeps_unit_normals() {
        let t = Transform3D::scaling(Vector3::new(1.0, 1.0, 0.0));
        let n = t.transform_normal(&Vector3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-6);
    }
}
