//! Per-light radiance and light-loop accumulation.

use std::ops::Add;

use noeuc_core::{Color, Light, LightKind};
use noeuc_math::{Vec3, EPSILON};
use rayon::prelude::*;

/// Point-light falloff scale for the Lambertian, Phong and Gouraud shaders.
pub const POINT_FALLOFF: f32 = 2e4 / 255.0;

/// Point-light falloff scale for the PBR shader.
pub const PBR_POINT_FALLOFF: f32 = 1e4 / 255.0;

/// Below this many lights the loop always runs sequentially.
pub const PARALLEL_LIGHT_THRESHOLD: usize = 8;

/// Light arriving at a surface point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSample {
    /// Unit vector from the surface towards the light
    pub direction: Vec3,
    /// Incoming radiance before the cosine term
    pub radiance: Color,
    /// `max(0, n · l)`
    pub cosine: f32,
}

impl LightSample {
    /// Sample `light` at `point` with surface normal `normal`.
    ///
    /// Distant lights have no falloff. Point lights scale by
    /// `falloff / (4π d²)`. Returns `None` when the direction to the light
    /// is undefined.
    pub fn new(light: &Light, point: Vec3, normal: Vec3, falloff: f32) -> Option<Self> {
        let to_light = light.direction_from(point);
        let distance_squared = to_light.length_squared();
        if distance_squared <= EPSILON * EPSILON {
            return None;
        }

        let direction = to_light / distance_squared.sqrt();
        let base = light.color * light.intensity;
        let radiance = match light.kind {
            LightKind::Distant => base,
            LightKind::Point => {
                base * falloff / (4.0 * std::f32::consts::PI * distance_squared)
            }
        };

        Some(Self {
            direction,
            radiance,
            cosine: normal.dot(direction).max(0.0),
        })
    }

    /// True if the light reaches the front of the surface.
    #[inline]
    pub fn faces_surface(&self) -> bool {
        self.cosine > 0.0
    }
}

/// Diffuse and specular light, kept apart so each can be weighted by its
/// own material coefficient.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhongTerms {
    pub diffuse: Color,
    pub specular: Color,
}

impl PhongTerms {
    /// Phong terms for one light sample seen from `view` (unit vector
    /// towards the viewer).
    pub fn evaluate(sample: &LightSample, normal: Vec3, view: Vec3, shininess: f32) -> Self {
        if !sample.faces_surface() {
            return Self::default();
        }

        let reflected = 2.0 * normal.dot(sample.direction) * normal - sample.direction;
        let highlight = reflected.dot(view).max(0.0).powf(shininess);

        Self {
            diffuse: sample.radiance * sample.cosine,
            specular: sample.radiance * highlight,
        }
    }

    pub fn scaled(self, weight: f32) -> Self {
        Self {
            diffuse: self.diffuse * weight,
            specular: self.specular * weight,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.diffuse == Color::ZERO && self.specular == Color::ZERO
    }
}

impl Add for PhongTerms {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            diffuse: self.diffuse + other.diffuse,
            specular: self.specular + other.specular,
        }
    }
}

/// Sum `contribution` over every light.
///
/// Contributions are independent, so with `parallel` set and enough lights
/// they are evaluated on the rayon pool and reduced in any order.
pub fn accumulate<T, F>(lights: &[Light], parallel: bool, contribution: F) -> T
where
    T: Add<Output = T> + Default + Send,
    F: Fn(&Light) -> T + Sync + Send,
{
    if parallel && lights.len() >= PARALLEL_LIGHT_THRESHOLD {
        lights
            .par_iter()
            .map(&contribution)
            .reduce(T::default, |a, b| a + b)
    } else {
        lights
            .iter()
            .map(contribution)
            .fold(T::default(), |a, b| a + b)
    }
}
