//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// Narrow a double precision point to the mesh precision.
pub fn to_point3f(p: &Point3d) -> Point3f {
    Point3f::new(p.x as f32, p.y as f32, p.z as f32)
}

/// Convert an RGB triple on the 0-255 scale to the 0-1 scale.
pub fn rgb_to_unit(color: [f32; 3]) -> [f32; 3] {
    [color[0] / 255.0, color[1] / 255.0, color[2] / 255.0]
}

/// Convert an RGB triple on the 0-1 scale to bytes, clamping out of range values.
pub fn unit_to_rgb8(color: [f32; 3]) -> [u8; 3] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_color_scale_conversions() {
        let unit = rgb_to_unit([255.0, 0.0, 51.0]);
        assert_relative_eq!(unit[0], 1.0);
        assert_relative_eq!(unit[1], 0.0);
        assert_relative_eq!(unit[2], 0.2);
        assert_eq!(unit_to_rgb8(unit), [255, 0, 51]);
        assert_eq!(unit_to_rgb8([2.0, -1.0, 0.5]), [255, 0, 128]);
    }
}
