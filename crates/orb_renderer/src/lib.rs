//! Orb Renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for scenes made of spheres.
//!
//! Scenes are built from an `orb_core::SceneDescription`, rendered in
//! parallel buckets with a deterministic per-bucket generator, and written
//! as PPM or any format the `image` crate encodes.

mod bucket;
mod camera;
mod error;
mod hittable;
mod material;
mod output;
mod renderer;
pub mod sampling;
mod scene;
mod sphere;
mod texture;

pub use bucket::{
    bucket_rng, generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use camera::{Camera, CameraBuilder, CameraError};
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable};
pub use material::{
    reflect, refract, Color, Dielectric, Lambertian, Material, MaterialError, Metal, ScatterResult,
};
pub use output::{save, write_ppm};
pub use renderer::{
    color_to_rgb8, linear_to_gamma, quantize, ray_color, render, render_pixel, render_with_hooks,
    Background, CancelFlag, ImageBuffer, RenderConfig, RenderHooks, RenderProgress, HIT_EPSILON,
};
pub use scene::{Scene, SceneHit};
pub use sphere::{GeometryError, Sphere};
pub use texture::{ImageTexture, Texture, MISSING_IMAGE_COLOR};

/// Re-export Vec3 and common math types from orb_math
pub use orb_math::{Interval, Ray, Vec3};
