//! The traced scene: prepared models plus lights.

use noeuc_core::{Light, LoadedModel};
use noeuc_math::{Interval, Ray};

use crate::model::Model;

/// Models and lights, composed once at startup and read-only while a frame
/// is rendered.
#[derive(Debug, Default)]
pub struct Scene {
    pub models: Vec<Model>,
    pub lights: Vec<Light>,
}

/// The nearest intersection of a ray with the scene.
#[derive(Debug, Clone, Copy)]
pub struct SceneHit<'a> {
    pub model: &'a Model,
    pub model_index: usize,
    pub triangle: u32,
    /// Ray parameter in units of the ray's direction vector
    pub distance: f32,
    pub u: f32,
    pub v: f32,
}

impl Scene {
    pub fn new(models: Vec<Model>, lights: Vec<Light>) -> Self {
        Self { models, lights }
    }

    /// Prepare every loaded model and collect them with `lights`.
    pub fn from_loaded(models: &[LoadedModel], lights: Vec<Light>) -> Self {
        let models: Vec<Model> = models.iter().map(Model::from_loaded).collect();
        let scene = Self::new(models, lights);

        log::info!(
            "Scene ready: {} models, {} triangles, {} lights",
            scene.models.len(),
            scene.triangle_count(),
            scene.lights.len()
        );

        scene
    }

    pub fn triangle_count(&self) -> usize {
        self.models.iter().map(|m| m.bvh().triangle_count()).sum()
    }

    /// Nearest triangle in front of the ray origin across all models.
    ///
    /// A later model only replaces the current hit when it is strictly
    /// closer, so ties resolve to the first minimum found in model order.
    pub fn closest_hit(&self, ray: &Ray) -> Option<SceneHit<'_>> {
        let mut closest: Option<SceneHit<'_>> = None;

        for (model_index, model) in self.models.iter().enumerate() {
            let limit = closest.map_or(f32::INFINITY, |hit| hit.distance);
            let Some((triangle, hit)) = model.closest_hit(ray, Interval::new(0.0, limit)) else {
                continue;
            };

            if hit.distance < limit {
                closest = Some(SceneHit {
                    model,
                    model_index,
                    triangle,
                    distance: hit.distance,
                    u: hit.u,
                    v: hit.v,
                });
            }
        }

        closest
    }

    /// True if any model blocks the ray strictly before `max_distance`.
    pub fn occluded(&self, ray: &Ray, max_distance: f32) -> bool {
        let ray_t = Interval::new(0.0, max_distance);
        self.models.iter().any(|model| model.occluded(ray, ray_t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use noeuc_core::{Material, Mesh};
    use noeuc_math::{Mat4, Vec3};

    fn quad_at(z: f32) -> Model {
        Model::new(
            &Mesh::quad(),
            Mat4::from_translation(Vec3::new(0.0, 0.0, z)) * Mat4::from_scale(Vec3::splat(2.0)),
            Material::default(),
        )
    }

    #[test]
    fn test_nearest_model_wins() {
        let scene = Scene::new(vec![quad_at(-8.0), quad_at(-3.0), quad_at(-6.0)], Vec::new());
        let ray = Ray::new(Vec3::new(0.1, 0.2, 0.0), Vec3::NEG_Z);

        let hit = scene.closest_hit(&ray).unwrap();
        assert_eq!(hit.model_index, 1);
        assert!((hit.distance - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_tie_keeps_first_model() {
        let scene = Scene::new(vec![quad_at(-4.0), quad_at(-4.0)], Vec::new());
        let ray = Ray::new(Vec3::new(0.1, 0.2, 0.0), Vec3::NEG_Z);

        assert_eq!(scene.closest_hit(&ray).unwrap().model_index, 0);
    }

    #[test]
    fn test_empty_scene_has_no_hit() {
        let scene = Scene::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        assert!(scene.closest_hit(&ray).is_none());
        assert!(!scene.occluded(&ray, f32::INFINITY));
    }

    #[test]
    fn test_occluded_before_max_distance_only() {
        let scene = Scene::new(vec![quad_at(-4.0)], Vec::new());
        let ray = Ray::new(Vec3::new(0.1, 0.2, 0.0), Vec3::NEG_Z);

        assert!(scene.occluded(&ray, 10.0));
        assert!(!scene.occluded(&ray, 3.5));
    }
}
