//! Core traits for superquad

use crate::{lines::LineSet, mesh::*, point::*, transform::Transform3D};

/// Trait for drawable/renderable objects
pub trait Drawable {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> (Point3f, Point3f);

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        let (min, max) = self.bounding_box();
        nalgebra::center(&min, &max)
    }

    /// Edge lengths of the bounding box
    fn extent(&self) -> Vector3f {
        let (min, max) = self.bounding_box();
        max - min
    }
}

/// Trait for objects that can be transformed
pub trait Transformable {
    /// Apply a transformation to the object
    fn transform(&mut self, transform: &Transform3D);
}

fn bounds_of(points: &[Point3f]) -> (Point3f, Point3f) {
    let Some(first) = points.first() else {
        return (Point3f::origin(), Point3f::origin());
    };

    let mut min = *first;
    let mut max = *first;

    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        min.z = min.z.min(p.z);

        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
        max.z = max.z.max(p.z);
    }

    (min, max)
}

impl Drawable for TriangleMesh {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        bounds_of(&self.vertices)
    }
}

impl Drawable for LineSet {
    fn bounding_box(&self) -> (Point3f, Point3f) {
        bounds_of(&self.vertices)
    }
}

impl Transformable for TriangleMesh {
    fn transform(&mut self, transform: &Transform3D) {
        for vertex in &mut self.vertices {
            *vertex = transform.transform_point(vertex);
        }
        if let Some(normals) = &mut self.normals {
            for normal in normals.iter_mut() {
                *normal = transform.transform_normal(normal);
            }
        }
    }
}

impl Transformable for LineSet {
    fn transform(&mut self, transform: &Transform3D) {
        for vertex in &mut self.vertices {
            *vertex = transform.transform_point(vertex);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bounding_box_and_center() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(-1.0, 0.0, 2.0),
                Point3f::new(3.0, -2.0, 0.0),
                Point3f::new(0.0, 4.0, 1.0),
            ],
            vec![[0, 1, 2]],
        );
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, Point3f::new(-1.0, -2.0, 0.0));
        assert_eq!(max, Point3f::new(3.0, 4.0, 2.0));
        assert_eq!(mesh.center(), Point3f::new(1.0, 1.0, 1.0));
        assert_eq!(mesh.extent(), Vector3f::new(4.0, 6.0, 2.0));
    }

    #[test]
    fn test_empty_bounding_box() {
        let mesh = TriangleMesh::new();
        assert_eq!(mesh.bounding_box(), (Point3f::origin(), Point3f::origin()));
    }

    #[test]
    fn test_transform_moves_vertices_and_normals() {
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        mesh.compute_vertex_normals();

        // A quarter turn about x, then up by 5.
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let t = Transform3D::translation(Vector3f::new(0.0, 0.0, 5.0))
            * Transform3D::from_quaternion_xyzw([half, 0.0, 0.0, half]);
        mesh.transform(&t);

        assert_relative_eq!(mesh.vertices[2], Point3f::new(0.0, 0.0, 6.0), epsilon = 1e-6);
        let n = mesh.normals.as_ref().unwrap()[0];
        assert_relative_eq!(n, Vector3f::new(0.0, -1.0, 0.0), epsilon = 1e-6);
    }
}
