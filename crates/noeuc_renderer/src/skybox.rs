//! Cube-map background for rays that hit nothing.
//!
//! The cube map is a single image laid out as a horizontal cross, four
//! faces wide and three faces tall:
//!
//! ```text
//!         [top  ]
//! [left ] [front] [right] [back ]
//!         [bot  ]
//! ```

use noeuc_core::{Color, Texture};
use noeuc_math::Vec3;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkyboxError {
    #[error("cube map must be a 4x3 cross of square faces, got {width}x{height}")]
    Layout { width: u32, height: u32 },
}

pub type SkyboxResult<T> = Result<T, SkyboxError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Right,
    Left,
    Top,
    Bottom,
    Front,
    Back,
}

impl Face {
    /// Pixel in the cross where the face's `(u, v) = (0, 0)` corner lands.
    ///
    /// `v` grows upwards, so the origin is the bottom-left pixel of the face.
    fn origin(self, face_size: u32) -> (u32, u32) {
        let f = face_size;
        match self {
            Face::Right => (2 * f, 2 * f - 1),
            Face::Left => (0, 2 * f - 1),
            Face::Top => (f, f - 1),
            Face::Bottom => (f, 3 * f - 1),
            Face::Front => (f, 2 * f - 1),
            Face::Back => (3 * f, 2 * f - 1),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Skybox {
    cube_map: Texture,
    face_size: u32,
}

impl Skybox {
    /// Wrap a horizontal-cross cube map.
    pub fn new(cube_map: Texture) -> SkyboxResult<Self> {
        let (width, height) = (cube_map.width, cube_map.height);
        let face_size = width / 4;

        if face_size == 0 || width != face_size * 4 || height != face_size * 3 {
            return Err(SkyboxError::Layout { width, height });
        }

        log::debug!("Skybox {}: {}px faces", cube_map.path, face_size);

        Ok(Self {
            cube_map,
            face_size,
        })
    }

    /// A skybox that is `color` in every direction.
    pub fn solid(color: Color) -> Self {
        Self {
            cube_map: Texture::filled(4, 3, color),
            face_size: 1,
        }
    }

    pub fn face_size(&self) -> u32 {
        self.face_size
    }

    /// Face and pixel hit by `direction`.
    ///
    /// The face is picked by the largest-magnitude component; the other two
    /// are divided by it and remapped from `[-1, 1]` to `[0, 1]`. `None` for
    /// a zero or non-finite direction.
    pub fn lookup(&self, direction: Vec3) -> Option<(Face, u32, u32)> {
        let Vec3 { x, y, z } = direction;
        let (ax, ay, az) = (x.abs(), y.abs(), z.abs());

        // Front is the camera's default view direction, -Z
        let (face, major, u, v) = if ax >= ay && ax >= az {
            if x > 0.0 {
                (Face::Right, ax, z, y)
            } else {
                (Face::Left, ax, -z, y)
            }
        } else if ay >= ax && ay >= az {
            if y > 0.0 {
                (Face::Top, ay, x, z)
            } else {
                (Face::Bottom, ay, x, -z)
            }
        } else if -z > 0.0 {
            (Face::Front, az, x, y)
        } else {
            (Face::Back, az, -x, y)
        };

        if major <= 0.0 || !major.is_finite() {
            return None;
        }

        let u = 0.5 * (u / major + 1.0);
        let v = 0.5 * (v / major + 1.0);

        let span = (self.face_size - 1) as f32;
        let (ox, oy) = face.origin(self.face_size);
        let px = (ox as f32 + u * span) as u32;
        let py = (oy as f32 - v * span).max(0.0) as u32;

        Some((
            face,
            px.min(self.cube_map.width - 1),
            py.min(self.cube_map.height - 1),
        ))
    }

    /// Background color along `direction`, as stored in the cube map.
    pub fn color(&self, direction: Vec3) -> Color {
        match self.lookup(direction) {
            Some((_, x, y)) => self.cube_map.pixel(x, y),
            None => Color::ZERO,
        }
    }
}
