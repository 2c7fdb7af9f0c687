//! Texture image decoding and caching.
//!
//! Decodes image files into 8-bit RGB pixel grids for image-sampled
//! textures. A cache makes sure a file referenced by several materials is
//! decoded once per scene.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Bytes per decoded pixel (RGB).
pub const BYTES_PER_PIXEL: usize = 3;

/// Failures while decoding or validating image pixels.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to decode texture {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A decoded image: `width * height` RGB pixels, row-major, top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageData {
    /// Wrap raw RGB8 pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(TextureError::SizeMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Decode an image file, converting to 8-bit RGB.
    pub fn from_file(path: &Path) -> TextureResult<Self> {
        let img = image::open(path).map_err(|source| TextureError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self::new(width, height, rgb.into_raw())
    }

    /// Texture width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Texture height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB bytes of the pixel at column `x`, row `y` (row 0 is the top).
    /// Coordinates are clamped to the image.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let idx = (y * self.width as usize + x) * BYTES_PER_PIXEL;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.pixels.len()
    }
}

/// Cache for decoded images.
///
/// Images are loaded on demand and cached for reuse.
pub struct TextureCache {
    /// Cached images by resolved path
    images: HashMap<PathBuf, Arc<ImageData>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Cache resolving relative paths against the working directory.
    pub fn new() -> Self {
        Self {
            images: HashMap::new(),
            base_dir: None,
        }
    }

    /// Cache resolving relative paths against `base_dir`, normally the
    /// directory of the scene file.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            images: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load an image from file, using cache if available.
    pub fn load(&mut self, path: &Path) -> TextureResult<Arc<ImageData>> {
        let full_path = self.resolve_path(path);

        if let Some(image) = self.images.get(&full_path) {
            return Ok(image.clone());
        }

        let image = Arc::new(ImageData::from_file(&full_path)?);
        self.images.insert(full_path.clone(), image.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            full_path.display(),
            image.width,
            image.height,
            image.size_bytes() as f32 / 1024.0
        );

        Ok(image)
    }

    /// Get the number of cached images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Default for TextureCache {
    fn default() -> Self {
        Self::new()
    }
}
