//! Pixel sources backing image textures.

use crate::error::ImageLoadError;
use std::path::Path;

/// Read-only access to 8-bit RGB pixels.
///
/// An empty source (zero width or height) is valid; image textures render
/// it as a placeholder color.
pub trait ImageSource: Send + Sync {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Pixel at column `col`, row `row` (row 0 is the top of the image).
    fn pixel(&self, col: u32, row: u32) -> [u8; 3];

    fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Decoded image held in memory, row-major, 3 bytes per pixel.
#[derive(Clone, Debug, Default)]
pub struct RgbImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RgbImage {
    /// Load and decode an image file, converting to 8-bit RGB.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ImageLoadError> {
        let img = image::open(path.as_ref()).map_err(|e| match e {
            image::ImageError::IoError(io) => ImageLoadError::Io(io),
            other => ImageLoadError::Decode(other),
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();

        log::debug!("Loaded image {} ({}x{})", path.as_ref().display(), width, height);

        Ok(Self {
            width,
            height,
            data: rgb.into_raw(),
        })
    }

    /// Load an image, or fall back to an empty one if it can't be read.
    pub fn open_or_placeholder(path: impl AsRef<Path>) -> Self {
        match Self::open(path.as_ref()) {
            Ok(img) => img,
            Err(e) => {
                log::warn!(
                    "Could not load image {}: {}. Using placeholder",
                    path.as_ref().display(),
                    e
                );
                Self::empty()
            }
        }
    }

    /// Wrap raw RGB bytes. Returns `None` if `data` doesn't hold
    /// `width * height` pixels.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize * 3 {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl ImageSource for RgbImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel(&self, col: u32, row: u32) -> [u8; 3] {
        let col = col.min(self.width.saturating_sub(1)) as usize;
        let row = row.min(self.height.saturating_sub(1)) as usize;
        let index = (row * self.width as usize + col) * 3;

        match self.data.get(index..index + 3) {
            Some(p) => [p[0], p[1], p[2]],
            None => [0, 0, 0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_checks_length() {
        assert!(RgbImage::from_raw(2, 2, vec![0; 12]).is_some());
        assert!(RgbImage::from_raw(2, 2, vec![0; 11]).is_none());
    }

    #[test]
    fn test_pixel_lookup_row_major() {
        let data = vec![
            1, 2, 3, 4, 5, 6, //
            7, 8, 9, 10, 11, 12,
        ];
        let img = RgbImage::from_raw(2, 2, data).unwrap();
        assert_eq!(img.pixel(1, 0), [4, 5, 6]);
        assert_eq!(img.pixel(0, 1), [7, 8, 9]);
        // Out-of-range coordinates clamp to the edge
        assert_eq!(img.pixel(5, 5), [10, 11, 12]);
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let img = RgbImage::open_or_placeholder("does/not/exist.png");
        assert!(img.is_empty());
        assert!(matches!(
            RgbImage::open("does/not/exist.png"),
            Err(ImageLoadError::Io(_))
        ));
    }
}
