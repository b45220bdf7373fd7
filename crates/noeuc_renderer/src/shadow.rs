//! Light visibility (shadow) queries.

use noeuc_core::{Light, LightKind};
use noeuc_math::{Ray, Vec3, EPSILON};

use crate::scene::Scene;

/// Offset along the surface normal applied to shadow ray origins so a
/// surface does not shadow itself.
pub const SHADOW_BIAS: f32 = 1e-3;

/// Visibility queries on rays.
pub trait Occlusion {
    /// Whether the light is visible from this ray's origin.
    ///
    /// Only the origin is used; the query aims at the light itself. Point
    /// lights are blocked by hits strictly closer than the light, distant
    /// lights by any hit in front of the origin.
    fn sees_light(&self, light: &Light, scene: &Scene) -> bool;
}

impl Occlusion for Ray {
    fn sees_light(&self, light: &Light, scene: &Scene) -> bool {
        let origin = self.origin();
        let to_light = light.direction_from(origin);
        let length = to_light.length();

        // Standing on a point light, or a distant light without direction
        if length <= EPSILON {
            return true;
        }

        let shadow_ray = Ray::new(origin, to_light / length);
        let max_distance = match light.kind {
            LightKind::Distant => f32::INFINITY,
            LightKind::Point => length,
        };

        !scene.occluded(&shadow_ray, max_distance)
    }
}

/// Shadow ray leaving `point` towards `light`, lifted off the surface by
/// `SHADOW_BIAS` along `normal`.
pub fn shadow_ray(point: Vec3, normal: Vec3, light: &Light) -> Ray {
    let origin = point + normal * SHADOW_BIAS;
    Ray::new(origin, light.direction_from(origin).normalize_or_zero())
}
