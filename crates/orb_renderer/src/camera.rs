//! Camera for ray generation.

use orb_core::CameraDescription;
use orb_math::{Ray, Vec3, Vec3Ext};
use rand::RngCore;
use thiserror::Error;

use crate::sampling::random_in_unit_disk;

/// Reasons a camera cannot be built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CameraError {
    #[error("Camera eye and look-at point coincide")]
    DegenerateView,

    #[error("Camera up vector is parallel to the view direction")]
    UpParallelToView,

    #[error("Vertical field of view must be in (0, 180) degrees, got {0}")]
    InvalidFov(f64),

    #[error("Aspect ratio must be positive, got {0}")]
    InvalidAspect(f64),

    #[error("Focus distance must be positive, got {0}")]
    InvalidFocusDistance(f64),

    #[error("Aperture must be non-negative, got {0}")]
    InvalidAperture(f64),
}

/// Builder collecting camera placement and lens settings.
#[derive(Debug, Clone)]
pub struct CameraBuilder {
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,
    vfov: f64,
    aspect: f64,
    aperture: f64,
    focus_dist: f64,
}

impl CameraBuilder {
    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings. `vfov` is in degrees.
    pub fn with_lens(mut self, vfov: f64, aperture: f64, focus_dist: f64) -> Self {
        self.vfov = vfov;
        self.aperture = aperture;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the viewport aspect ratio (width / height).
    pub fn with_aspect(mut self, aspect: f64) -> Self {
        self.aspect = aspect;
        self
    }

    /// Validate the settings and derive the camera frame.
    pub fn build(self) -> Result<Camera, CameraError> {
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(CameraError::InvalidFov(self.vfov));
        }
        if !(self.aspect > 0.0 && self.aspect.is_finite()) {
            return Err(CameraError::InvalidAspect(self.aspect));
        }
        if !(self.focus_dist > 0.0 && self.focus_dist.is_finite()) {
            return Err(CameraError::InvalidFocusDistance(self.focus_dist));
        }
        if !(self.aperture >= 0.0 && self.aperture.is_finite()) {
            return Err(CameraError::InvalidAperture(self.aperture));
        }

        // Camera basis vectors
        let w = (self.look_from - self.look_at)
            .try_unit()
            .ok_or(CameraError::DegenerateView)?;
        let u = self
            .vup
            .cross(w)
            .try_unit()
            .ok_or(CameraError::UpParallelToView)?;
        let v = w.cross(u);

        // Viewport dimensions
        let theta = self.vfov.to_radians();
        let half_height = (theta / 2.0).tan();
        let half_width = self.aspect * half_height;

        let origin = self.look_from;
        let horizontal = 2.0 * half_width * self.focus_dist * u;
        let vertical = 2.0 * half_height * self.focus_dist * v;
        let lower_left_corner = origin
            - half_width * self.focus_dist * u
            - half_height * self.focus_dist * v
            - self.focus_dist * w;

        Ok(Camera {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            w,
            lens_radius: self.aperture / 2.0,
        })
    }
}

impl Default for CameraBuilder {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect: 1.0,
            aperture: 0.0,
            focus_dist: 1.0,
        }
    }
}

/// Thin-lens camera. Immutable once built.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    lens_radius: f64,
}

impl Camera {
    /// Start building a camera from the default settings.
    pub fn builder() -> CameraBuilder {
        CameraBuilder::default()
    }

    /// Build a camera from a scene description.
    pub fn from_description(desc: &CameraDescription, aspect: f64) -> Result<Self, CameraError> {
        Self::builder()
            .with_position(
                Vec3::from_array(desc.eye),
                Vec3::from_array(desc.look_at),
                Vec3::from_array(desc.up),
            )
            .with_lens(desc.vfov, desc.aperture, desc.focus_distance)
            .with_aspect(aspect)
            .build()
    }

    /// Generate a ray through normalized screen coordinates `(s, t)`,
    /// `(0, 0)` being the bottom-left corner of the viewport.
    ///
    /// The origin is jittered across the lens disk, so points off the focus
    /// plane blur in proportion to the aperture.
    pub fn get_ray(&self, s: f64, t: f64, rng: &mut dyn RngCore) -> Ray {
        let rd = self.lens_radius * random_in_unit_disk(rng);
        let offset = self.u * rd.x + self.v * rd.y;

        let origin = self.origin + offset;
        let target = self.lower_left_corner + s * self.horizontal + t * self.vertical;
        Ray::new(origin, target - origin)
    }

    /// Camera position (center of the lens).
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Orthonormal camera frame `(u, v, w)`; `-w` is the view direction.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        (self.u, self.v, self.w)
    }

    pub fn lens_radius(&self) -> f64 {
        self.lens_radius
    }
}
