use crate::{Mat4, Vec3, Vec4, EPSILON};

/// A ray in homogeneous coordinates.
///
/// The origin is a point (`w = 1`) and the direction a vector (`w = 0`), so
/// applying a 4x4 transform moves the origin but only rotates and scales the
/// direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec4,
    pub direction: Vec4,
}

/// Result of a ray-triangle test.
///
/// `distance` is measured in units of the ray's direction vector; it is a
/// world-space length only when the direction is normalized. `u` and `v` are
/// the barycentric weights of the second and third vertex, the first vertex
/// gets `1 - u - v`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriangleHit {
    pub distance: f32,
    pub u: f32,
    pub v: f32,
}

impl Ray {
    /// Create a ray from a 3D origin point and direction vector.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin: origin.extend(1.0),
            direction: direction.extend(0.0),
        }
    }

    /// Get the origin point of the ray.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin.truncate()
    }

    /// Get the direction vector of the ray.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction.truncate()
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin() + self.direction() * t
    }

    /// Apply a homogeneous transform to both origin and direction.
    #[inline]
    pub fn transformed(&self, matrix: &Mat4) -> Ray {
        Ray {
            origin: *matrix * self.origin,
            direction: *matrix * self.direction,
        }
    }

    /// Same ray with a unit-length direction.
    #[inline]
    pub fn normalized(&self) -> Ray {
        Ray::new(self.origin(), self.direction().normalize_or_zero())
    }

    /// Möller-Trumbore ray-triangle intersection.
    ///
    /// Both faces are accepted. Rays parallel to the triangle plane,
    /// degenerate triangles and hits at or behind the origin report `None`.
    pub fn intersect_triangle(&self, [v0, v1, v2]: [Vec3; 3]) -> Option<TriangleHit> {
        let direction = self.direction();
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let h = direction.cross(edge2);
        let a = edge1.dot(h);

        // Ray is parallel to triangle (or the triangle has no area)
        if a.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / a;
        let s = self.origin() - v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let distance = f * edge2.dot(q);
        if distance <= EPSILON {
            return None;
        }

        Some(TriangleHit { distance, u, v })
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::NEG_Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: [Vec3; 3] = [
        Vec3::new(-1.0, -1.0, -5.0),
        Vec3::new(1.0, -1.0, -5.0),
        Vec3::new(0.0, 1.0, -5.0),
    ];

    fn reconstruct(hit: &TriangleHit, [v0, v1, v2]: [Vec3; 3]) -> Vec3 {
        v0 * (1.0 - hit.u - hit.v) + v1 * hit.u + v2 * hit.v
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_homogeneous_components() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Y);
        assert_eq!(ray.origin.w, 1.0);
        assert_eq!(ray.direction.w, 0.0);
    }

    #[test]
    fn test_transform_ignores_translation_for_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let matrix = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0))
            * Mat4::from_rotation_y(std::f32::consts::FRAC_PI_2);
        let moved = ray.transformed(&matrix);

        assert!((moved.origin() - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-5);
        // -Z rotated 90 degrees about Y is -X
        assert!((moved.direction() - Vec3::NEG_X).length() < 1e-5);
        assert_eq!(moved.direction.w, 0.0);
    }

    #[test]
    fn test_hit_reconstructs_point() {
        let target = Vec3::new(0.25, -0.2, -5.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), target - Vec3::new(0.0, 0.0, 1.0)).normalized();

        let hit = ray.intersect_triangle(TRIANGLE).expect("ray aimed inside the triangle");

        assert!((ray.at(hit.distance) - target).length() < 1e-4);
        assert!((reconstruct(&hit, TRIANGLE) - target).length() < 1e-4);
    }

    #[test]
    fn test_hit_distance_in_direction_units() {
        // Unnormalized direction of length 2 halves the reported distance
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -2.0));
        let hit = ray.intersect_triangle(TRIANGLE).unwrap();
        assert!((hit.distance - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_barycentric_partition() {
        for (x, y) in [(0.0, 0.0), (-0.9, -0.95), (0.9, -0.95), (0.0, 0.95), (0.3, 0.1)] {
            let ray = Ray::new(Vec3::new(x, y, 0.0), Vec3::NEG_Z);
            let hit = ray.intersect_triangle(TRIANGLE).unwrap();

            assert!(hit.u >= -1e-6);
            assert!(hit.v >= -1e-6);
            assert!(hit.u + hit.v <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_miss_cases() {
        // Outside the triangle
        let beside = Ray::new(Vec3::new(2.0, 0.0, 0.0), Vec3::NEG_Z);
        assert!(beside.intersect_triangle(TRIANGLE).is_none());

        // Triangle is behind the origin
        let away = Ray::new(Vec3::ZERO, Vec3::Z);
        assert!(away.intersect_triangle(TRIANGLE).is_none());

        // Parallel to the triangle plane
        let parallel = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::X);
        assert!(parallel.intersect_triangle(TRIANGLE).is_none());

        // Zero-area triangle
        let degenerate = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), Vec3::NEG_Z);
        assert!(ray.intersect_triangle(degenerate).is_none());
    }

    #[test]
    fn test_back_face_is_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Z);
        let hit = ray.intersect_triangle(TRIANGLE).unwrap();
        assert!((hit.distance - 5.0).abs() < 1e-5);
    }
}
