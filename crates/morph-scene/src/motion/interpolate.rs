//! Interpolation between animatable values.

use crate::geometry::{Rect, Vec2};
use crate::motion::transform::Transform2D;

/// Types that can be interpolated between two values.
///
/// `t = 0.0` returns `self`, `t = 1.0` returns `to`. Spring timings feed
/// values of `t` outside `[0, 1]`, so implementations must extrapolate
/// rather than clamp.
pub trait Interpolate: Sized {
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

/// Linear interpolation helper.
#[inline]
pub(crate) fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

impl Interpolate for f32 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for Vec2 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
        }
    }
}

impl Interpolate for Rect {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            w: lerp(self.w, to.w, t),
            h: lerp(self.h, to.h, t),
        }
    }
}

impl Interpolate for Transform2D {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        Self {
            sx: lerp(self.sx, to.sx, t),
            sy: lerp(self.sy, to.sy, t),
            tx: lerp(self.tx, to.tx, t),
            ty: lerp(self.ty, to.ty, t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(0.0f32.interpolate(&10.0, 0.0), 0.0);
        assert_eq!(0.0f32.interpolate(&10.0, 1.0), 10.0);
        assert_eq!(0.0f32.interpolate(&10.0, 0.5), 5.0);
    }

    #[test]
    fn test_rect_interpolation_is_componentwise() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 20.0, 30.0, 10.0);
        let mid = a.interpolate(&b, 0.5);
        assert_eq!(mid, Rect::new(5.0, 10.0, 20.0, 10.0));
    }

    #[test]
    fn test_overshoot_extrapolates() {
        // Springs overshoot; interpolation must follow them past the target.
        assert!(0.0f32.interpolate(&10.0, 1.1) > 10.0);
    }
}
