//! Orb Core - scene description, color palette and image decoding.
//!
//! This crate provides:
//!
//! - **Scene description types**: `SceneDescription` and friends, loadable
//!   from JSON and independent of the renderer
//! - **Palette**: named color table used by scene construction
//! - **Texture images**: RGB8 image decoding and caching
//! - **Showcase**: the built-in demo scene
//!
//! # Example
//!
//! ```ignore
//! use orb_core::SceneDescription;
//!
//! let scene = SceneDescription::from_json_file("scene.json")?;
//! println!("Loaded {} spheres, {} materials",
//!     scene.spheres.len(),
//!     scene.materials.len());
//! ```

pub mod palette;
pub mod scene;
pub mod showcase;
pub mod texture;

// Re-export commonly used types
pub use palette::{ColorRef, Palette};
pub use scene::{
    BackgroundDescription, CameraDescription, MaterialDescription, RenderDescription,
    SceneDescription, SceneError, SceneResult, SphereDescription, TextureDescription,
};
pub use showcase::showcase;
pub use texture::{ImageData, TextureCache, TextureError, TextureResult};
