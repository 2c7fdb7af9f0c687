//! Surface textures: "color at surface coordinate".

use std::path::Path;
use std::sync::Arc;

use orb_core::{ImageData, TextureCache};
use orb_math::{Interval, Vec3};

use crate::material::Color;

/// Color returned by an image texture whose pixels could not be loaded.
pub const MISSING_IMAGE_COLOR: Color = Color::new(0.0, 1.0, 1.0);

/// A texture evaluated at surface coordinates `(u, v)` and hit point `p`.
#[derive(Debug, Clone)]
pub enum Texture {
    /// Constant color.
    Solid(Color),

    /// 3-D checker pattern; `scale` is the spatial frequency.
    Checker {
        even: Arc<Texture>,
        odd: Arc<Texture>,
        scale: f64,
    },

    /// Nearest-pixel lookup into a decoded image.
    Image(ImageTexture),
}

impl Texture {
    /// Checker with the default frequency of 10.
    pub fn checker(even: Arc<Texture>, odd: Arc<Texture>) -> Self {
        Self::Checker {
            even,
            odd,
            scale: orb_core::scene::DEFAULT_CHECKER_SCALE,
        }
    }

    /// Evaluate the texture.
    pub fn value(&self, u: f64, v: f64, p: Vec3) -> Color {
        match self {
            Texture::Solid(color) => *color,
            Texture::Checker { even, odd, scale } => {
                let sines = (scale * p.x).sin() * (scale * p.y).sin() * (scale * p.z).sin();
                // Exactly zero falls to the even side
                if sines < 0.0 {
                    odd.value(u, v, p)
                } else {
                    even.value(u, v, p)
                }
            }
            Texture::Image(image) => image.value(u, v),
        }
    }
}

/// Image-backed texture. Holds no pixels when decoding failed, in which
/// case it evaluates to [`MISSING_IMAGE_COLOR`].
#[derive(Debug, Clone, Default)]
pub struct ImageTexture {
    data: Option<Arc<ImageData>>,
}

impl ImageTexture {
    pub fn new(data: Arc<ImageData>) -> Self {
        Self { data: Some(data) }
    }

    /// A texture with no pixel data.
    pub fn missing() -> Self {
        Self { data: None }
    }

    /// Load through `cache`. Decode failures are logged and produce a
    /// texture that renders the fallback color; they never abort.
    pub fn load(cache: &mut TextureCache, path: &Path) -> Self {
        match cache.load(path) {
            Ok(data) => Self::new(data),
            Err(err) => {
                log::warn!("Could not load texture image '{}': {}", path.display(), err);
                Self::missing()
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    fn value(&self, u: f64, v: f64) -> Color {
        let Some(data) = &self.data else {
            return MISSING_IMAGE_COLOR;
        };

        let u = Interval::UNIT.clamp(u);
        // Flip V to image coordinates
        let v = 1.0 - Interval::UNIT.clamp(v);

        let width = data.width();
        let height = data.height();
        let i = ((u * width as f64) as u32).min(width - 1);
        let j = ((v * height as f64) as u32).min(height - 1);

        let [r, g, b] = data.pixel(i, j);
        Color::new(r as f64, g as f64, b as f64) / 255.0
    }
}
