use crate::Vec3;

/// A ray in 3D space with an origin and a (not necessarily unit) direction.
///
/// Rays are created per camera sample and per bounce; `at(t)` evaluates
/// `origin + t * direction` without validating `t`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Point at parameter `t`. Negative `t` lies behind the origin.
    #[inline]
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + t * self.direction
    }
}
