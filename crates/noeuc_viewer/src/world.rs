//! Scene setup: from a description file or the built-in demo.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use noeuc_core::{load_scene_description, Camera, Color, Light, Material, Mesh, Texture, Transform};
use noeuc_math::{EulerRot, Mat4, Quat, Vec3};
use noeuc_renderer::{Model, Scene, Skybox};

/// Everything the render loop needs, composed once at startup.
pub struct World {
    pub scene: Scene,
    pub camera: Camera,
    pub skybox: Skybox,
}

impl World {
    /// Load a JSON scene description and every asset it references.
    pub fn load(path: &Path) -> Result<Self> {
        let description = load_scene_description(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        let models = description.load_models(base_dir)?;
        let scene = Scene::from_loaded(&models, description.lights.clone());

        let skybox = match description.load_skybox(base_dir)? {
            Some(cube_map) => Skybox::new(cube_map).context("invalid skybox image")?,
            None => gradient_skybox(32)?,
        };

        Ok(Self {
            scene,
            camera: description.camera(),
            skybox,
        })
    }

    /// A checkered floor, a few lit shapes and a gradient sky.
    pub fn demo() -> Result<Self> {
        let floor = Model::new(
            &Mesh::quad(),
            Transform {
                translation: Vec3::new(0.0, -1.0, -6.0),
                rotation: Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
                scale: Vec3::splat(24.0),
            }
            .to_matrix(),
            Material::new(Color::ONE),
        )
        .with_texture(Arc::new(Texture::checker(
            256,
            16,
            Color::splat(0.85),
            Color::splat(0.25),
        )));

        let red_cube = Model::new(
            &Mesh::cube(),
            Transform {
                translation: Vec3::new(-1.2, -0.25, -6.0),
                rotation: Quat::from_rotation_y(0.6),
                scale: Vec3::splat(1.5),
            }
            .to_matrix(),
            Material::phong(Color::new(0.8, 0.15, 0.1), 48.0, 0.6, 0.9, 0.05),
        );

        let blue_cube = Model::new(
            &Mesh::cube(),
            Transform {
                translation: Vec3::new(1.6, -0.5, -8.0),
                rotation: Quat::from_euler(EulerRot::XYZ, 0.3, 0.8, 0.0),
                scale: Vec3::splat(1.0),
            }
            .to_matrix(),
            Material::phong(Color::new(0.15, 0.3, 0.85), 16.0, 0.3, 1.0, 0.05),
        );

        let sail = Model::new(
            &Mesh::triangle(
                Vec3::new(0.5, -1.0, -10.0),
                Vec3::new(3.5, -1.0, -10.0),
                Vec3::new(2.0, 2.0, -10.5),
            ),
            Mat4::IDENTITY,
            Material::new(Color::new(0.9, 0.8, 0.3)),
        );

        let lights = vec![
            Light::distant(Vec3::new(-0.4, -1.0, -0.6), Color::new(1.0, 0.95, 0.85), 0.8),
            Light::point(Vec3::new(2.0, 2.5, -4.0), Color::new(1.0, 0.8, 0.6), 2.0),
        ];

        let scene = Scene::new(vec![floor, red_cube, blue_cube, sail], lights);
        log::info!(
            "Demo scene: {} models, {} triangles",
            scene.models.len(),
            scene.triangle_count()
        );

        Ok(Self {
            scene,
            camera: Camera::look_at(Vec3::new(0.0, 0.5, 2.0), Vec3::new(0.0, -0.5, -6.0), 70.0),
            skybox: gradient_skybox(64)?,
        })
    }
}

/// Procedural sky cross: light blue horizon fading to deep blue overhead,
/// dark ground below.
pub fn gradient_skybox(face_size: u32) -> Result<Skybox> {
    let zenith = Color::new(0.15, 0.3, 0.7);
    let horizon = Color::new(0.75, 0.85, 0.95);
    let ground = Color::new(0.2, 0.18, 0.15);

    let (width, height) = (face_size * 4, face_size * 3);
    let pixels = (0..width * height)
        .map(|i| {
            let y = i / width;
            let color = match y / face_size {
                0 => zenith,
                1 => {
                    // 0 at the top edge of the side faces, 1 at the bottom
                    let t = (y % face_size) as f32 / (face_size.max(2) - 1) as f32;
                    if t < 0.5 {
                        zenith.lerp(horizon, t * 2.0)
                    } else {
                        horizon.lerp(ground, (t - 0.5) * 2.0)
                    }
                }
                _ => ground,
            };
            [color.x, color.y, color.z, 1.0]
        })
        .collect();

    Ok(Skybox::new(Texture::new(width, height, pixels, "<gradient>"))?)
}
