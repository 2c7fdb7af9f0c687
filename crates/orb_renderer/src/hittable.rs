//! Hittable trait and HitRecord for ray-object intersection.

use orb_math::{Interval, Ray, Vec3};

/// Record of a ray-object intersection.
///
/// Rebuilt for every intersection test; owns no references to the
/// primitive that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Vec3,
    /// Unit surface normal, always pointing against the incident ray
    pub normal: Vec3,
    /// Surface coordinates in [0, 1]
    pub u: f64,
    pub v: f64,
    /// Ray parameter where the intersection occurs
    pub t: f64,
    /// Whether the ray approached from outside the surface
    pub front_face: bool,
}

impl HitRecord {
    /// Build a record at ray parameter `t`, orienting `outward_normal`
    /// against the ray.
    pub fn new(ray: &Ray, t: f64, outward_normal: Vec3, (u, v): (f64, f64)) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Test if a ray hits this object strictly inside the given interval.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord>;
}
