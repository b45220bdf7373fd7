//! PNG frame sink.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;

/// Writes rendered frames to `<dir>/frame_NNNN.png`.
pub struct FrameSink {
    dir: PathBuf,
}

impl FrameSink {
    /// Create the output directory if needed.
    pub fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn frame_path(&self, index: u32) -> PathBuf {
        self.dir.join(format!("frame_{index:04}.png"))
    }

    /// Save one RGBA frame, row 0 at the top.
    pub fn write(&self, index: u32, width: u32, height: u32, pixels: &[u8]) -> Result<PathBuf> {
        let image = RgbaImage::from_raw(width, height, pixels.to_vec()).with_context(|| {
            format!(
                "frame buffer holds {} bytes, expected {} for {}x{}",
                pixels.len(),
                width as usize * height as usize * 4,
                width,
                height
            )
        })?;

        let path = self.frame_path(index);
        image
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;

        log::debug!("Wrote {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_names_are_zero_padded() {
        let sink = FrameSink {
            dir: PathBuf::from("out"),
        };

        assert_eq!(sink.frame_path(7), Path::new("out").join("frame_0007.png"));
        assert_eq!(sink.frame_path(12345), Path::new("out").join("frame_12345.png"));
    }

    #[test]
    fn test_rejects_short_buffer() {
        let sink = FrameSink {
            dir: PathBuf::from("out"),
        };

        assert!(sink.write(0, 4, 4, &[0; 10]).is_err());
    }
}
