//! Renderer error type.

use std::path::PathBuf;

use orb_core::SceneError;
use thiserror::Error;

use crate::camera::CameraError;
use crate::material::MaterialError;
use crate::sphere::GeometryError;

/// Errors that can occur while building or rendering a scene.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error("Invalid sphere {sphere}: {source}")]
    Geometry {
        sphere: usize,
        #[source]
        source: GeometryError,
    },

    #[error("Invalid material {material}: {source}")]
    Material {
        material: String,
        #[source]
        source: MaterialError,
    },

    #[error("Invalid camera: {0}")]
    Camera(#[from] CameraError),

    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("Render cancelled")]
    Cancelled,

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type RenderResult<T> = Result<T, RenderError>;
