//! Frame renderer.
//!
//! Camera-space primary rays depend only on the resolution and field of
//! view, so they are computed once and reused. Each frame then:
//! - moves every ray into world space with the camera transform
//! - finds the nearest hit per pixel and shades it, or samples the skybox
//! - writes the pixel as 8-bit RGBA
//!
//! Both passes are parallel over pixels with rayon; every pixel only writes
//! its own slot.

use noeuc_core::{Camera, Color};
use noeuc_math::{Mat4, Ray, Vec3};
use rayon::prelude::*;

use crate::scene::Scene;
use crate::shader::Shader;
use crate::skybox::Skybox;

/// Render configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Run the pixel and light loops on the rayon pool
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

pub struct Renderer {
    width: u32,
    height: u32,
    /// Field of view the camera rays were computed for, in degrees
    fov: f32,
    config: RenderConfig,
    camera_rays: Vec<Ray>,
    world_rays: Vec<Ray>,
    pixels: Vec<[u8; 4]>,
}

impl Renderer {
    pub fn new(width: u32, height: u32, fov: f32, config: RenderConfig) -> Self {
        let count = (width as usize) * (height as usize);
        let mut renderer = Self {
            width,
            height,
            fov,
            config,
            camera_rays: Vec::with_capacity(count),
            world_rays: vec![Ray::default(); count],
            pixels: vec![[0, 0, 0, 255]; count],
        };
        renderer.precompute_rays();
        renderer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn config(&self) -> RenderConfig {
        self.config
    }

    /// The last rendered frame: `width * height` RGBA pixels, row 0 at the
    /// top, alpha always 255.
    pub fn pixels(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// World-space primary rays of the last frame, row-major.
    pub fn world_rays(&self) -> &[Ray] {
        &self.world_rays
    }

    fn precompute_rays(&mut self) {
        let scale = (self.fov * 0.5).to_radians().tan();
        let (width, height) = (self.width, self.height);

        self.camera_rays.clear();
        self.camera_rays.extend(
            (0..height).flat_map(|y| (0..width).map(move |x| camera_ray(x, y, width, height, scale))),
        );

        log::debug!(
            "Precomputed {} camera rays ({}x{}, fov {})",
            self.camera_rays.len(),
            width,
            height,
            self.fov
        );
    }

    /// Render one frame of `scene` seen from `camera`.
    ///
    /// Camera rays are recomputed first if the camera's field of view
    /// changed since the last frame.
    pub fn render(&mut self, scene: &Scene, camera: &Camera, shader: Shader, skybox: &Skybox) -> &[u8] {
        if camera.fov != self.fov {
            self.fov = camera.fov;
            self.precompute_rays();
        }

        self.transform_rays(&camera.to_world);
        self.shade(scene, shader, skybox);

        self.pixels()
    }

    fn transform_rays(&mut self, to_world: &Mat4) {
        let transform = |(world, camera): (&mut Ray, &Ray)| *world = camera.transformed(to_world);

        if self.config.parallel {
            self.world_rays
                .par_iter_mut()
                .zip(self.camera_rays.par_iter())
                .for_each(transform);
        } else {
            self.world_rays
                .iter_mut()
                .zip(self.camera_rays.iter())
                .for_each(transform);
        }
    }

    fn shade(&mut self, scene: &Scene, shader: Shader, skybox: &Skybox) {
        let parallel = self.config.parallel;
        let shade_pixel = |(pixel, ray): (&mut [u8; 4], &Ray)| {
            *pixel = color_to_rgba(shade_ray(ray, scene, shader, skybox, parallel));
        };

        if parallel {
            self.pixels
                .par_iter_mut()
                .zip(self.world_rays.par_iter())
                .for_each(shade_pixel);
        } else {
            self.pixels
                .iter_mut()
                .zip(self.world_rays.iter())
                .for_each(shade_pixel);
        }
    }
}

/// Camera-space primary ray through the center of pixel `(x, y)`.
///
/// The camera sits at the origin looking down -Z. `scale` is
/// `tan(fov / 2)`; the direction is left unnormalized with `z = -1`.
pub fn camera_ray(x: u32, y: u32, width: u32, height: u32, scale: f32) -> Ray {
    let aspect = width as f32 / height as f32;
    let ndc_x = 2.0 * (x as f32 + 0.5) / width as f32 - 1.0;
    let ndc_y = 1.0 - 2.0 * (y as f32 + 0.5) / height as f32;

    Ray::new(Vec3::ZERO, Vec3::new(ndc_x * scale * aspect, ndc_y * scale, -1.0))
}

/// Color seen along one world-space ray: the shaded nearest hit, or the
/// skybox when nothing is hit.
pub fn shade_ray(ray: &Ray, scene: &Scene, shader: Shader, skybox: &Skybox, parallel_lights: bool) -> Color {
    match scene.closest_hit(ray) {
        Some(hit) => shader.color(ray, scene, &hit, parallel_lights),
        None => skybox.color(ray.direction().normalize_or_zero()),
    }
}

/// Convert a color to 8-bit RGBA, clamping each channel to [0, 1].
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let c = color.clamp(Color::ZERO, Color::ONE) * 255.0;
    [c.x as u8, c.y as u8, c.z as u8, 255]
}
