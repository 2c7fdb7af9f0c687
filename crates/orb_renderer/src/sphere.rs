//! Sphere primitive for ray tracing.

use std::f64::consts::PI;
use std::sync::Arc;

use orb_math::{Interval, Ray, Vec3};
use thiserror::Error;

use crate::hittable::{HitRecord, Hittable};
use crate::material::{Color, Material};

/// Reasons a sphere cannot be constructed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f64),

    #[error("Sphere center must be finite, got {0:?}")]
    NonFiniteCenter(Vec3),
}

/// A sphere primitive.
///
/// Spheres without a material are flat-colored terminal surfaces: a ray
/// that reaches one returns `color` directly.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f64,
    color: Color,
    material: Option<Arc<dyn Material>>,
}

impl Sphere {
    /// Create a new sphere. The radius must be positive.
    pub fn new(
        center: Vec3,
        radius: f64,
        color: Color,
        material: Option<Arc<dyn Material>>,
    ) -> Result<Self, GeometryError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(GeometryError::InvalidRadius(radius));
        }
        if !center.is_finite() {
            return Err(GeometryError::NonFiniteCenter(center));
        }

        Ok(Self {
            center,
            radius,
            color,
            material,
        })
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Base color, multiplied into every bounce off this sphere.
    pub fn color(&self) -> Color {
        self.color
    }

    pub fn material(&self) -> Option<&dyn Material> {
        self.material.as_deref()
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f64, f64) {
        // phi: angle around Y from -X, theta: latitude
        let phi = p.z.atan2(p.x);
        // Rounding can push |y| slightly past 1
        let theta = p.y.clamp(-1.0, 1.0).asin();

        let u = 1.0 - (phi + PI) / (2.0 * PI);
        let v = (theta + PI / 2.0) / PI;
        (u, v)
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        if a == 0.0 {
            return None;
        }
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            Self::get_sphere_uv(outward_normal),
        ))
    }
}
