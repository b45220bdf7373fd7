// Re-export glam for convenience
pub use glam::*;

// noeuc math types
mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::{Ray, TriangleHit};

/// Tolerance used by intersection tests to reject parallel and grazing cases.
pub const EPSILON: f32 = 1e-8;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec4_homogeneous_translation() {
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));

        // Points pick up translation, directions do not
        assert_eq!(m * Vec4::new(0.0, 0.0, 0.0, 1.0), Vec4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(m * Vec4::new(0.0, 0.0, -1.0, 0.0), Vec4::new(0.0, 0.0, -1.0, 0.0));
    }
}
