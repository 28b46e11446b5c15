//! Minimal 2D affine transform: scale and translation.
//!
//! The transition styles only ever combine a uniform shrink with a drift
//! offset, so the full matrix form (rotation, skew, origin handling) is not
//! carried. Scale applies about the view's own center; translation is in the
//! shared coordinate space.

use serde::{Deserialize, Serialize};

/// A decomposed scale + translate transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Scale X.
    pub sx: f32,
    /// Scale Y.
    pub sy: f32,
    /// Translate X.
    pub tx: f32,
    /// Translate Y.
    pub ty: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    /// The identity transform (no change).
    pub const IDENTITY: Self = Self {
        sx: 1.0,
        sy: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// Pure translation.
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self {
            tx,
            ty,
            ..Self::IDENTITY
        }
    }

    /// Uniform scale.
    pub fn scale(s: f32) -> Self {
        Self {
            sx: s,
            sy: s,
            ..Self::IDENTITY
        }
    }

    /// This transform with a uniform scale folded in.
    pub fn scaled(self, s: f32) -> Self {
        Self {
            sx: self.sx * s,
            sy: self.sy * s,
            ..self
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_default() {
        assert!(Transform2D::default().is_identity());
    }

    #[test]
    fn test_translate_then_scale() {
        let t = Transform2D::translate(0.0, -10.0).scaled(0.82);
        assert_eq!(t.tx, 0.0);
        assert_eq!(t.ty, -10.0);
        assert_eq!(t.sx, 0.82);
        assert_eq!(t.sy, 0.82);
    }
}
