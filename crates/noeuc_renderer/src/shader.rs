//! Shading variants.
//!
//! The set of shaders is closed, so the active one is a plain enum value
//! that the renderer matches on for every hit. Switching shaders changes
//! nothing else in the pipeline.

use std::fmt;
use std::str::FromStr;

use noeuc_core::{Color, Light, Material};
use noeuc_math::{Ray, Vec3};
use thiserror::Error;

use crate::lighting::{accumulate, LightSample, PhongTerms, PBR_POINT_FALLOFF, POINT_FALLOFF};
use crate::scene::{Scene, SceneHit};
use crate::shadow::{shadow_ray, Occlusion};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown shader '{0}', expected one of: lambertian, phong, gouraud, pbr")]
pub struct UnknownShader(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Shader {
    /// Diffuse only
    #[default]
    Lambertian,
    /// Ambient, diffuse and specular evaluated at the hit point
    Phong,
    /// Phong terms evaluated at the triangle corners and interpolated
    Gouraud,
    /// Diffuse with a dimmer point-light falloff and flat albedo
    Pbr,
}

/// Everything the shaders need to know about the surface at a hit.
struct Surface {
    point: Vec3,
    normal: Vec3,
    albedo: Color,
    material: Material,
}

impl Shader {
    pub const ALL: [Shader; 4] = [Shader::Lambertian, Shader::Phong, Shader::Gouraud, Shader::Pbr];

    /// The variant after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Shader::Lambertian => Shader::Phong,
            Shader::Phong => Shader::Gouraud,
            Shader::Gouraud => Shader::Pbr,
            Shader::Pbr => Shader::Lambertian,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Shader::Lambertian => "lambertian",
            Shader::Phong => "phong",
            Shader::Gouraud => "gouraud",
            Shader::Pbr => "pbr",
        }
    }

    /// Color of the surface hit by `ray`, each channel clamped to `[0, 1]`.
    ///
    /// `ray` must be the ray that produced `hit`, so `hit.distance` is in
    /// units of its direction. `parallel_lights` lets the light loop fan out
    /// on the rayon pool.
    pub fn color(self, ray: &Ray, scene: &Scene, hit: &SceneHit<'_>, parallel_lights: bool) -> Color {
        let model = hit.model;
        let material = *model.material();
        let albedo = match self {
            Shader::Pbr => material.albedo,
            _ => model.albedo_at(hit.triangle, hit.u, hit.v),
        };

        let surface = Surface {
            point: ray.at(hit.distance),
            normal: model.triangle_normal(hit.triangle),
            albedo,
            material,
        };

        let color = match self {
            Shader::Lambertian => diffuse(&surface, scene, POINT_FALLOFF, parallel_lights),
            Shader::Pbr => diffuse(&surface, scene, PBR_POINT_FALLOFF, parallel_lights),
            Shader::Phong => phong(&surface, ray.origin(), scene, parallel_lights),
            Shader::Gouraud => {
                let corners = model.triangle_positions(hit.triangle);
                gouraud(&surface, ray.origin(), corners, hit, scene, parallel_lights)
            }
        };

        color.clamp(Color::ZERO, Color::ONE)
    }
}

fn visible(surface: &Surface, light: &Light, scene: &Scene) -> bool {
    shadow_ray(surface.point, surface.normal, light).sees_light(light, scene)
}

fn diffuse(surface: &Surface, scene: &Scene, falloff: f32, parallel: bool) -> Color {
    accumulate(&scene.lights, parallel, |light| {
        let Some(sample) = LightSample::new(light, surface.point, surface.normal, falloff) else {
            return Color::ZERO;
        };
        if !sample.faces_surface() || !visible(surface, light, scene) {
            return Color::ZERO;
        }
        surface.albedo * sample.radiance * sample.cosine
    })
}

fn phong(surface: &Surface, eye: Vec3, scene: &Scene, parallel: bool) -> Color {
    let view = (eye - surface.point).normalize_or_zero();
    let material = &surface.material;

    let terms: PhongTerms = accumulate(&scene.lights, parallel, |light| {
        let Some(sample) = LightSample::new(light, surface.point, surface.normal, POINT_FALLOFF) else {
            return PhongTerms::default();
        };
        if !sample.faces_surface() || !visible(surface, light, scene) {
            return PhongTerms::default();
        }
        PhongTerms::evaluate(&sample, surface.normal, view, material.shininess)
    });

    combine(surface, terms)
}

fn gouraud(
    surface: &Surface,
    eye: Vec3,
    corners: [Vec3; 3],
    hit: &SceneHit<'_>,
    scene: &Scene,
    parallel: bool,
) -> Color {
    let weights = [1.0 - hit.u - hit.v, hit.u, hit.v];
    let material = &surface.material;

    let terms: PhongTerms = accumulate(&scene.lights, parallel, |light| {
        let interpolated = corners
            .iter()
            .zip(weights)
            .filter_map(|(&corner, weight)| {
                let sample = LightSample::new(light, corner, surface.normal, POINT_FALLOFF)?;
                let view = (eye - corner).normalize_or_zero();
                Some(PhongTerms::evaluate(&sample, surface.normal, view, material.shininess).scaled(weight))
            })
            .fold(PhongTerms::default(), |a, b| a + b);

        if interpolated.is_zero() || !visible(surface, light, scene) {
            return PhongTerms::default();
        }
        interpolated
    });

    combine(surface, terms)
}

/// Ambient plus weighted diffuse and specular.
fn combine(surface: &Surface, terms: PhongTerms) -> Color {
    let material = &surface.material;
    surface.albedo * material.ka
        + surface.albedo * terms.diffuse * material.kd
        + terms.specular * material.ks
}

impl fmt::Display for Shader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shader {
    type Err = UnknownShader;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shader::ALL
            .into_iter()
            .find(|shader| shader.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownShader(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Model;
    use noeuc_core::{Mesh, Texture};
    use noeuc_math::{Mat4, Vec2};
    use std::sync::Arc;

    fn facing_triangle(material: Material) -> Model {
        let mesh = Mesh::triangle(
            Vec3::new(-1.0, -1.0, -5.0),
            Vec3::new(1.0, -1.0, -5.0),
            Vec3::new(0.0, 1.0, -5.0),
        );
        Model::new(&mesh, Mat4::IDENTITY, material)
    }

    fn shade(shader: Shader, scene: &Scene) -> Color {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let hit = scene.closest_hit(&ray).unwrap();
        shader.color(&ray, scene, &hit, false)
    }

    fn head_on() -> Light {
        Light::distant(Vec3::NEG_Z, Color::ONE, 1.0)
    }

    #[test]
    fn test_lambertian_head_on() {
        let scene = Scene::new(vec![facing_triangle(Material::new(Color::ONE))], vec![head_on()]);
        let color = shade(Shader::Lambertian, &scene);

        assert!((color - Color::ONE).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_no_lights_is_black() {
        let scene = Scene::new(vec![facing_triangle(Material::new(Color::ONE))], Vec::new());

        assert_eq!(shade(Shader::Lambertian, &scene), Color::ZERO);
        assert_eq!(shade(Shader::Pbr, &scene), Color::ZERO);
    }

    #[test]
    fn test_phong_ambient_without_lights() {
        let material = Material::new(Color::splat(0.4));
        let scene = Scene::new(vec![facing_triangle(material)], Vec::new());

        let expected = 0.4 * material.ka;
        assert!((shade(Shader::Phong, &scene) - Color::splat(expected)).abs().max_element() < 1e-6);
        assert!((shade(Shader::Gouraud, &scene) - Color::splat(expected)).abs().max_element() < 1e-6);
    }

    #[test]
    fn test_output_is_clamped() {
        let lights: Vec<Light> = (0..64)
            .map(|i| Light::point(Vec3::new(0.0, 0.0, -4.0 + i as f32 * 0.01), Color::ONE, 1e6))
            .chain(std::iter::once(Light::distant(Vec3::NEG_Z, Color::ONE, 1e9)))
            .collect();
        let scene = Scene::new(vec![facing_triangle(Material::new(Color::ONE))], lights);

        for shader in Shader::ALL {
            let color = shade(shader, &scene);
            assert!(color.min_element() >= 0.0, "{shader}: {color}");
            assert!(color.max_element() <= 1.0, "{shader}: {color}");
        }
    }

    #[test]
    fn test_phong_highlight_brightens() {
        let scene = Scene::new(vec![facing_triangle(Material::new(Color::splat(0.4)))], vec![head_on()]);

        let lambertian = shade(Shader::Lambertian, &scene);
        let phong = shade(Shader::Phong, &scene);

        // Ambient 0.02, diffuse 0.4, specular 0.5 straight back at the eye
        assert!((phong.x - 0.92).abs() < 1e-4);
        assert!(phong.x > lambertian.x);
    }

    #[test]
    fn test_gouraud_close_to_phong_on_flat_triangle() {
        let scene = Scene::new(vec![facing_triangle(Material::new(Color::splat(0.4)))], vec![head_on()]);

        let phong = shade(Shader::Phong, &scene);
        let gouraud = shade(Shader::Gouraud, &scene);

        // Same diffuse everywhere, the corner highlights are weaker
        assert!(gouraud.x >= 0.4 * 0.05 + 0.4 - 1e-5);
        assert!(gouraud.x <= phong.x + 1e-5);
    }

    #[test]
    fn test_shadowed_light_contributes_nothing() {
        // Quad behind the camera, between the triangle and the light
        let blocker = Model::new(
            &Mesh::quad(),
            Mat4::from_translation(Vec3::new(0.3, 0.2, 2.0)) * Mat4::from_scale(Vec3::splat(4.0)),
            Material::default(),
        );
        let material = Material::new(Color::splat(0.4));
        let scene = Scene::new(vec![facing_triangle(material), blocker], vec![head_on()]);

        assert_eq!(shade(Shader::Lambertian, &scene), Color::ZERO);
        let phong = shade(Shader::Phong, &scene);
        assert!((phong.x - 0.4 * material.ka).abs() < 1e-6);
    }

    #[test]
    fn test_pbr_point_falloff_halves_lambertian() {
        let light = Light::point(Vec3::ZERO, Color::ONE, 1.0);
        let scene = Scene::new(vec![facing_triangle(Material::new(Color::splat(0.5)))], vec![light]);

        let lambertian = shade(Shader::Lambertian, &scene);
        let pbr = shade(Shader::Pbr, &scene);

        assert!(lambertian.x > 0.0 && lambertian.x < 1.0);
        assert!((lambertian.x / pbr.x - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_pbr_ignores_texture() {
        let material = Material::new(Color::new(0.2, 0.4, 0.6));
        let model = facing_triangle(material)
            .with_tex_coords(vec![Vec2::ZERO, Vec2::X, Vec2::Y])
            .with_texture(Arc::new(Texture::solid_color(Color::new(1.0, 0.0, 0.0))));
        let scene = Scene::new(vec![model], vec![head_on()]);

        let lambertian = shade(Shader::Lambertian, &scene);
        let pbr = shade(Shader::Pbr, &scene);

        assert!((lambertian - Color::new(1.0, 0.0, 0.0)).abs().max_element() < 1e-5);
        assert!((pbr - material.albedo).abs().max_element() < 1e-5);
    }

    #[test]
    fn test_next_cycles_all_variants() {
        let mut shader = Shader::default();
        for expected in Shader::ALL.iter().cycle().skip(1).take(8) {
            shader = shader.next();
            assert_eq!(shader, *expected);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("phong".parse::<Shader>(), Ok(Shader::Phong));
        assert_eq!("PBR".parse::<Shader>(), Ok(Shader::Pbr));
        assert!("toon".parse::<Shader>().is_err());
    }
}
