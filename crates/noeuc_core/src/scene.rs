//! Scene attribute types for noeuc.
//!
//! Materials, lights, camera and placement transforms. These are plain data
//! consumed by the ray caster; none of them know how to render themselves.

use noeuc_math::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Color type alias (linear RGB, typically 0-1)
pub type Color = Vec3;

/// Surface description with Phong coefficients.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Diffuse/albedo color (RGB, 0-1)
    pub albedo: Color,

    /// Specular exponent
    pub shininess: f32,

    /// Specular weight
    pub ks: f32,

    /// Diffuse weight
    pub kd: f32,

    /// Ambient weight
    pub ka: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            albedo: Color::new(0.5, 0.5, 0.5), // Grey default
            shininess: 32.0,
            ks: 0.5,
            kd: 1.0,
            ka: 0.05,
        }
    }
}

impl Material {
    /// Create a material with just an albedo color.
    pub fn new(albedo: Color) -> Self {
        Self {
            albedo,
            ..Default::default()
        }
    }

    /// Create a material with explicit Phong coefficients.
    pub fn phong(albedo: Color, shininess: f32, ks: f32, kd: f32, ka: f32) -> Self {
        Self {
            albedo,
            shininess,
            ks,
            kd,
            ka,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    /// Infinitely far away, `vector` is the direction the light travels
    Distant,
    /// Finite position with inverse-square falloff, `vector` is the position
    Point,
}

/// A light source.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    /// Direction for distant lights, world position for point lights
    pub vector: Vec3,
    pub color: Color,
    pub intensity: f32,
}

impl Light {
    /// A distant light shining along `direction`.
    pub fn distant(direction: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Distant,
            vector: direction,
            color,
            intensity,
        }
    }

    /// A point light at `position`.
    pub fn point(position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Point,
            vector: position,
            color,
            intensity,
        }
    }

    /// Vector from `point` towards the light (not normalized).
    ///
    /// For point lights the length is the distance to the light.
    pub fn direction_from(&self, point: Vec3) -> Vec3 {
        match self.kind {
            LightKind::Distant => -self.vector,
            LightKind::Point => self.vector - point,
        }
    }
}

/// The viewer's camera.
///
/// `to_world` maps camera space (looking down -Z, +Y up) into world space.
/// The input-handling side mutates it between frames; the renderer only
/// reads it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub to_world: Mat4,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Movement speed in world units per second
    pub speed: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            to_world: Mat4::IDENTITY,
            fov: 90.0,
            speed: 2.0,
        }
    }
}

impl Camera {
    pub fn new(to_world: Mat4, fov: f32, speed: f32) -> Self {
        Self {
            to_world,
            fov,
            speed,
        }
    }

    /// Camera at `position` looking at `target` with +Y up.
    ///
    /// Looking straight up or down uses +Z as up instead. A target equal to
    /// the position keeps the default orientation.
    pub fn look_at(position: Vec3, target: Vec3, fov: f32) -> Self {
        let forward = (target - position).normalize_or_zero();
        if forward == Vec3::ZERO {
            log::warn!(
                "Camera target {} coincides with its position, looking down -Z",
                target
            );
            return Self {
                to_world: Mat4::from_translation(position),
                fov,
                ..Default::default()
            };
        }

        let up = if forward.dot(Vec3::Y).abs() > 0.999 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let to_world = Mat4::look_at_rh(position, target, up).inverse();
        Self {
            to_world,
            fov,
            ..Default::default()
        }
    }

    /// World-space camera position.
    pub fn position(&self) -> Vec3 {
        self.to_world.w_axis.truncate()
    }

    /// World-space viewing direction.
    pub fn forward(&self) -> Vec3 {
        self.to_world.transform_vector3(Vec3::NEG_Z).normalize_or_zero()
    }

    /// Move along the camera's own axes.
    pub fn translate_local(&mut self, offset: Vec3) {
        self.to_world *= Mat4::from_translation(offset);
    }

    /// Turn left/right around the camera's own Y axis.
    pub fn rotate_local_y(&mut self, radians: f32) {
        self.to_world *= Mat4::from_rotation_y(radians);
    }

    /// Tilt up/down around the camera's own X axis.
    pub fn rotate_local_x(&mut self, radians: f32) {
        self.to_world *= Mat4::from_rotation_x(radians);
    }
}

/// Transform components that can be composed into a matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: Vec3,

    /// Rotation (as quaternion)
    pub rotation: Quat,

    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform with only translation.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Convert to a 4x4 transformation matrix.
    ///
    /// Order: Scale -> Rotate -> Translate (SRT)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}
