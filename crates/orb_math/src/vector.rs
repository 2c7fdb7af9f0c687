//! Normalization and small vector helpers with explicit degenerate-case
//! contracts.

use crate::Vec3;

/// Vectors no longer than this normalize to the zero vector.
pub const UNIT_EPSILON: f64 = 1e-12;

/// Threshold used by [`Vec3Ext::near_zero`] on every component.
const NEAR_ZERO: f64 = 1e-8;

/// Extension methods for [`Vec3`].
pub trait Vec3Ext: Sized {
    /// Unit vector in the same direction, or `Vec3::ZERO` when the length is
    /// at most [`UNIT_EPSILON`] (or not finite). Never produces NaN.
    fn unit(self) -> Self;

    /// Unit vector in the same direction, or `None` for a degenerate vector.
    fn try_unit(self) -> Option<Self>;

    /// True if every component is within `1e-8` of zero.
    fn near_zero(self) -> bool;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn unit(self) -> Vec3 {
        self.try_unit().unwrap_or(Vec3::ZERO)
    }

    #[inline]
    fn try_unit(self) -> Option<Vec3> {
        let len = self.length();
        if len.is_finite() && len > UNIT_EPSILON {
            Some(self / len)
        } else {
            None
        }
    }

    #[inline]
    fn near_zero(self) -> bool {
        self.abs().max_element() < NEAR_ZERO
    }
}
