//! Texture images for materials and the skybox cube map.
//!
//! Textures are decoded once by the loading side and then only sampled.
//! Pixels are kept as normalized float RGBA, row 0 at the top of the image.

use std::path::Path;

use noeuc_math::Vec3;
use thiserror::Error;

use crate::scene::Color;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture: {0}")]
    LoadError(String),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Pixel buffer of {len} bytes does not match {width}x{height} RGBA")]
    SizeMismatch { width: u32, height: u32, len: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A loaded texture with pixel data.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data in RGBA format (0-1 range)
    /// Stored as [R, G, B, A] per pixel, row-major order
    pub pixels: Vec<[f32; 4]>,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a new texture from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>, path: impl Into<String>) -> Self {
        Self {
            width,
            height,
            pixels,
            path: path.into(),
        }
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Color) -> Self {
        Self::filled(1, 1, color)
    }

    /// Create a `width` x `height` texture of one color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![[color.x, color.y, color.z, 1.0]; width as usize * height as usize],
            path: "<solid>".to_string(),
        }
    }

    /// Wrap 8-bit RGBA bytes, as produced by an image decoder.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> TextureResult<Self> {
        if bytes.len() != width as usize * height as usize * 4 {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                len: bytes.len(),
            });
        }

        let pixels = bytes
            .chunks_exact(4)
            .map(|p| {
                [
                    p[0] as f32 / 255.0,
                    p[1] as f32 / 255.0,
                    p[2] as f32 / 255.0,
                    p[3] as f32 / 255.0,
                ]
            })
            .collect();

        Ok(Self::new(width, height, pixels, "<memory>"))
    }

    /// Checkerboard of `cells` x `cells` squares alternating `a` and `b`.
    pub fn checker(size: u32, cells: u32, a: Color, b: Color) -> Self {
        let cell = (size / cells.max(1)).max(1);
        let pixels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                let c = if (x / cell + y / cell) % 2 == 0 { a } else { b };
                [c.x, c.y, c.z, 1.0]
            })
            .collect();

        Self::new(size, size, pixels, "<checker>")
    }

    /// Nearest-pixel lookup at texture coordinates in [0, 1].
    ///
    /// (0, 0) is the top-left pixel and (1, 1) the bottom-right one.
    /// Coordinates outside the range are clamped to the border.
    pub fn sample(&self, u: f32, v: f32) -> Color {
        let x = u.clamp(0.0, 1.0) * (self.width.saturating_sub(1)) as f32;
        let y = v.clamp(0.0, 1.0) * (self.height.saturating_sub(1)) as f32;
        self.pixel(x as u32, y as u32)
    }

    /// RGB of the pixel at integer coordinates, black when out of range.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        if x >= self.width || y >= self.height {
            return Vec3::ZERO;
        }

        let idx = y as usize * self.width as usize + x as usize;
        self.pixels
            .get(idx)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[f32; 4]>()
    }
}

/// Load a texture from a file path.
pub fn load_texture(path: impl AsRef<Path>) -> TextureResult<Texture> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| {
        TextureError::LoadError(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut texture = Texture::from_rgba8(width, height, rgba.as_raw())?;
    texture.path = path.to_string_lossy().to_string();

    log::debug!(
        "Loaded texture: {} ({}x{}, {:.1} KB)",
        texture.path,
        width,
        height,
        texture.size_bytes() as f32 / 1024.0
    );

    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_texture() {
        let tex = Texture::solid_color(Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(tex.width, 1);
        assert_eq!(tex.height, 1);

        let sample = tex.sample(0.5, 0.5);
        assert!((sample - Vec3::new(1.0, 0.5, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_from_rgba8() {
        let bytes = [255, 0, 0, 255, 0, 255, 0, 255];
        let tex = Texture::from_rgba8(2, 1, &bytes).unwrap();

        assert_eq!(tex.pixel(0, 0), Vec3::X);
        assert_eq!(tex.pixel(1, 0), Vec3::Y);
        assert!(Texture::from_rgba8(2, 2, &bytes).is_err());
    }

    #[test]
    fn test_from_rgba8_huge_dimensions() {
        // 65536 * 65536 * 4 does not fit in a u32
        let err = Texture::from_rgba8(65536, 65536, &[0; 16]).unwrap_err();
        assert!(matches!(
            err,
            TextureError::SizeMismatch { width: 65536, height: 65536, len: 16 }
        ));
    }

    #[test]
    fn test_sample_corners() {
        let tex = Texture::checker(4, 2, Vec3::ONE, Vec3::ZERO);

        // Top-left cell is `a`, the cell to its right is `b`
        assert_eq!(tex.sample(0.0, 0.0), Vec3::ONE);
        assert_eq!(tex.sample(1.0, 0.0), Vec3::ZERO);
        assert_eq!(tex.sample(1.0, 1.0), Vec3::ONE);
    }

    #[test]
    fn test_sample_clamps_out_of_range() {
        let tex = Texture::checker(4, 2, Vec3::ONE, Vec3::ZERO);
        assert_eq!(tex.sample(-3.0, -1.0), tex.sample(0.0, 0.0));
        assert_eq!(tex.sample(7.0, 2.0), tex.sample(1.0, 1.0));
    }

    #[test]
    fn test_pixel_out_of_range_is_black() {
        let tex = Texture::solid_color(Vec3::ONE);
        assert_eq!(tex.pixel(5, 0), Vec3::ZERO);
    }
}
