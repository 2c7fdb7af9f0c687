//! Image tiling for parallel rendering.
//!
//! Each bucket is traced on its own rayon task with its own generator.
//! Coordinates are buffer pixels: `y = 0` is the top row of the output.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::material::Color;
use crate::renderer::render_pixel;
use crate::{Camera, RenderConfig, Scene};

/// Tile of the output image, in buffer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// Left column
    pub x: u32,
    /// Top row
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Number of pixels covered.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Squared distance from the tile's midpoint to `(cx, cy)`.
    fn distance_squared(&self, cx: f64, cy: f64) -> f64 {
        let mx = self.x as f64 + self.width as f64 / 2.0;
        let my = self.y as f64 + self.height as f64 / 2.0;
        (mx - cx).powi(2) + (my - cy).powi(2)
    }
}

/// Default bucket edge length in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 32;

/// Cover a `width` x `height` image with tiles of at most `bucket_size`
/// pixels a side, ordered from the center of the frame outward.
///
/// Edge tiles are clipped to the image. A cancelled render therefore
/// still has the middle of the frame.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let step = bucket_size.max(1) as usize;
    let mut buckets: Vec<Bucket> = (0..height)
        .step_by(step)
        .flat_map(|y| {
            (0..width).step_by(step).map(move |x| {
                let w = bucket_size.min(width - x);
                let h = bucket_size.min(height - y);
                Bucket::new(x, y, w, h, 0)
            })
        })
        .collect();

    // Stable: equidistant tiles keep row-major order
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
    buckets.sort_by(|a, b| {
        a.distance_squared(cx, cy)
            .total_cmp(&b.distance_squared(cx, cy))
    });

    for (index, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = index;
    }
    buckets
}

/// Generator for one bucket, derived from the render seed and the
/// bucket's position so results do not depend on scheduling.
pub fn bucket_rng(seed: u64, bucket: &Bucket) -> StdRng {
    let position = ((bucket.y as u64) << 32) | bucket.x as u64;
    StdRng::seed_from_u64(seed ^ position.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

/// Trace every pixel of `bucket`, top row first, left to right.
pub fn render_bucket(
    bucket: &Bucket,
    camera: &Camera,
    scene: &Scene,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Vec<Color> {
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for local_y in 0..bucket.height {
        // Screen rows count up from the bottom scanline
        let j = config.height - 1 - (bucket.y + local_y);
        for local_x in 0..bucket.width {
            let i = bucket.x + local_x;
            pixels.push(render_pixel(camera, scene, i, j, config, rng));
        }
    }

    pixels
}

/// Linear colors for one finished bucket, row-major.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub pixels: Vec<Color>,
}

impl BucketResult {
    pub fn new(bucket: Bucket, pixels: Vec<Color>) -> Self {
        Self { bucket, pixels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn covered(buckets: &[Bucket]) -> u32 {
        buckets.iter().map(Bucket::pixel_count).sum()
    }

    #[test]
    fn test_tiles_cover_image() {
        let even = generate_buckets(128, 64, 32);
        assert_eq!(even.len(), 4 * 2);
        assert_eq!(covered(&even), 128 * 64);

        // Clipped edge tiles
        let ragged = generate_buckets(100, 70, 32);
        assert_eq!(ragged.len(), 4 * 3);
        assert_eq!(covered(&ragged), 100 * 70);
        assert!(ragged.iter().all(|b| b.x + b.width <= 100 && b.y + b.height <= 70));
    }

    #[test]
    fn test_center_first() {
        let buckets = generate_buckets(96, 96, 32);

        assert_eq!((buckets[0].x, buckets[0].y), (32, 32));
        assert!(buckets.iter().enumerate().all(|(i, b)| b.index == i));
        // Corners come last
        assert!(buckets[5..].iter().all(|b| b.x != 32 && b.y != 32));
    }

    #[test]
    fn test_bucket_rng_depends_on_position_and_seed() {
        let a = Bucket::new(0, 0, 8, 8, 0);
        let b = Bucket::new(8, 0, 8, 8, 0);

        let draw = |seed, bucket: &Bucket| bucket_rng(seed, bucket).gen::<u64>();
        assert_eq!(draw(1, &a), draw(1, &a));
        assert_ne!(draw(1, &a), draw(1, &b));
        assert_ne!(draw(1, &a), draw(2, &a));
    }
}
