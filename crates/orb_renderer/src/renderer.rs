//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative bounce loop with an enforced depth budget
//! - Jittered multi-sampling per pixel
//! - Gamma correction
//! - Parallel bucket rendering with per-bucket generators

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use orb_core::{BackgroundDescription, Palette, RenderDescription};
use orb_math::{Interval, Ray, Vec3Ext};
use rand::RngCore;
use rayon::prelude::*;

use crate::bucket::{bucket_rng, generate_buckets, render_bucket, BucketResult};
use crate::error::{RenderError, RenderResult};
use crate::material::Color;
use crate::{Camera, Scene};

/// Secondary rays start this far along the ray to avoid self-intersection.
pub const HIT_EPSILON: f64 = 0.001;

/// Color seen by rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// The same color in every direction.
    Solid(Color),
    /// Vertical blend from `horizon` (looking down) to `zenith` (looking up).
    Gradient { horizon: Color, zenith: Color },
}

impl Background {
    /// Background color for a ray that hit nothing.
    pub fn color(&self, ray: &Ray) -> Color {
        match *self {
            Background::Solid(color) => color,
            Background::Gradient { horizon, zenith } => {
                let a = 0.5 * (ray.direction().unit().y + 1.0);
                horizon * (1.0 - a) + zenith * a
            }
        }
    }

    /// White-to-sky-blue gradient.
    pub fn sky() -> Self {
        Background::Gradient {
            horizon: Color::ONE,
            zenith: Color::new(0.5, 0.7, 1.0),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Seed for the per-bucket generators
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
    /// Color for rays that miss every sphere
    pub background: Background,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
            bucket_size: crate::bucket::DEFAULT_BUCKET_SIZE,
            background: Background::default(),
        }
    }
}

impl RenderConfig {
    /// Build from a scene description's render block.
    pub fn from_description(desc: &RenderDescription, palette: &Palette) -> RenderResult<Self> {
        let background = match &desc.background {
            BackgroundDescription::Solid { color } => Background::Solid(palette.resolve(color)?),
            BackgroundDescription::Gradient { horizon, zenith } => Background::Gradient {
                horizon: palette.resolve(horizon)?,
                zenith: palette.resolve(zenith)?,
            },
        };

        Ok(Self {
            width: desc.width,
            height: desc.height,
            samples_per_pixel: desc.samples_per_pixel,
            max_depth: desc.max_depth,
            seed: desc.seed,
            bucket_size: desc.bucket_size,
            background,
        })
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidSettings(format!(
                "image size {}x{} is empty",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidSettings(
                "samples per pixel must be at least 1".to_string(),
            ));
        }
        if self.bucket_size == 0 {
            return Err(RenderError::InvalidSettings(
                "bucket size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Compute the color seen by a ray.
///
/// Follows the ray through at most `depth` surface interactions, carrying
/// the running product of attenuations. Returns black once the budget is
/// spent or the ray is absorbed; a sphere without a material ends the
/// path with its flat color.
pub fn ray_color(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    let mut ray = *ray;
    let mut throughput = Color::ONE;

    for _ in 0..depth {
        let Some(hit) = scene.hit(&ray, Interval::new(HIT_EPSILON, f64::INFINITY)) else {
            return throughput * background.color(&ray);
        };

        let Some(material) = hit.sphere.material() else {
            return throughput * hit.sphere.color();
        };

        match material.scatter(&ray, &hit.record, rng) {
            Some(result) => {
                throughput *= result.attenuation * hit.sphere.color();
                ray = result.scattered;
            }
            None => return Color::ZERO,
        }
    }

    Color::ZERO
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Quantize a gamma-encoded channel to 8 bits by truncation.
#[inline]
pub fn quantize(channel: f64) -> u8 {
    (255.999 * Interval::UNIT.clamp(channel)) as u8
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    [
        quantize(linear_to_gamma(color.x)),
        quantize(linear_to_gamma(color.y)),
        quantize(linear_to_gamma(color.z)),
    ]
}

/// Render a single pixel with multi-sampling.
///
/// `(i, j)` are screen coordinates with `j = 0` on the bottom scanline.
/// Returns the average linear color of the samples.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    i: u32,
    j: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;
    let width = config.width as f64;
    let height = config.height as f64;

    for _ in 0..config.samples_per_pixel {
        let s = (i as f64 + crate::sampling::gen_f64(rng)) / width;
        let t = (j as f64 + crate::sampling::gen_f64(rng)) / height;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, scene, config.max_depth, &config.background, rng);
    }

    pixel_color / config.samples_per_pixel as f64
}

/// Linear-color image, stored top row first.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y), y = 0 being the top row.
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for (local, color) in result.pixels.iter().enumerate() {
            let local = local as u32;
            let x = bucket.x + local % bucket.width;
            let y = bucket.y + local / bucket.width;
            self.set(x, y, *color);
        }
    }

    /// Gamma-corrected 8-bit RGB bytes, top row first.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|color| color_to_rgb8(*color))
            .collect()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Progress snapshot reported after each finished bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderProgress {
    pub completed: usize,
    pub total: usize,
}

impl RenderProgress {
    /// Completion in percent.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            100.0 * self.completed as f64 / self.total as f64
        }
    }
}

/// Shared flag for best-effort cancellation between buckets.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; buckets already in flight finish.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Optional side channels for a render.
#[derive(Default)]
pub struct RenderHooks<'a> {
    /// Called from worker threads after each bucket completes
    pub progress: Option<&'a (dyn Fn(RenderProgress) + Sync)>,
    /// Checked before each bucket starts
    pub cancel: CancelFlag,
}

/// Render the entire scene to an image buffer.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> RenderResult<ImageBuffer> {
    render_with_hooks(camera, scene, config, &RenderHooks::default())
}

/// Render the entire scene, reporting progress and honoring cancellation.
///
/// Buckets are rendered in parallel on the current rayon pool. Each bucket
/// draws from its own generator seeded by `config.seed` and the bucket's
/// position, so the image depends only on the seed and bucket size.
pub fn render_with_hooks(
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    hooks: &RenderHooks<'_>,
) -> RenderResult<ImageBuffer> {
    config.validate()?;

    let buckets = generate_buckets(config.width, config.height, config.bucket_size);
    let total = buckets.len();
    let completed = AtomicUsize::new(0);

    log::debug!(
        "Rendering {}x{} in {} buckets of {} px",
        config.width,
        config.height,
        total,
        config.bucket_size
    );

    let results = buckets
        .par_iter()
        .map(|bucket| {
            if hooks.cancel.is_cancelled() {
                return Err(RenderError::Cancelled);
            }

            let mut rng = bucket_rng(config.seed, bucket);
            let pixels = render_bucket(bucket, camera, scene, config, &mut rng);

            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(progress) = hooks.progress {
                progress(RenderProgress {
                    completed: done,
                    total,
                });
            }

            Ok(BucketResult::new(*bucket, pixels))
        })
        .collect::<RenderResult<Vec<_>>>()?;

    let mut image = ImageBuffer::new(config.width, config.height);
    for result in &results {
        image.write_bucket(result);
    }

    Ok(image)
}
