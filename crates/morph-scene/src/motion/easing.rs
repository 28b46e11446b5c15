//! Easing curves for fixed-duration motions.
//!
//! Fades use the standard CSS `ease-in` / `ease-out` cubic beziers; frame
//! and transform motions use spring timing instead (see
//! [`spring`](crate::motion::spring)).

use serde::{Deserialize, Serialize};

/// Easing curve mapping linear progress to eased progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingCurve {
    /// No easing.
    #[default]
    Linear,
    /// Slow start, accelerating — `cubic-bezier(0.42, 0, 1, 1)`.
    EaseIn,
    /// Fast start, decelerating — `cubic-bezier(0, 0, 0.58, 1)`.
    EaseOut,
}

impl EasingCurve {
    /// Evaluate the curve at progress `t` (clamped to `[0, 1]`).
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Self::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
        }
    }
}

/// Evaluate a cubic bezier timing curve at progress `t`: solve the x
/// polynomial for the curve parameter with Newton-Raphson, then evaluate y.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, progress: f32) -> f32 {
    if progress <= 0.0 {
        return 0.0;
    }
    if progress >= 1.0 {
        return 1.0;
    }

    let t = solve_bezier_x(x1, x2, progress);
    bezier_axis(y1, y2, t)
}

fn solve_bezier_x(x1: f32, x2: f32, target_x: f32) -> f32 {
    let mut t = target_x;
    for _ in 0..8 {
        let x = bezier_axis(x1, x2, t) - target_x;
        if x.abs() < 1e-6 {
            break;
        }
        let dx = bezier_derivative(x1, x2, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }
    t
}

/// One coordinate of the bezier at parameter t:
/// `3(1-t)²t·c1 + 3(1-t)t²·c2 + t³`.
#[inline]
fn bezier_axis(c1: f32, c2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * c1 + 3.0 * mt * t * t * c2 + t * t * t
}

#[inline]
fn bezier_derivative(c1: f32, c2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * c1 + 6.0 * mt * t * (c2 - c1) + 3.0 * t * t * (1.0 - c2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        for curve in [EasingCurve::Linear, EasingCurve::EaseIn, EasingCurve::EaseOut] {
            assert_eq!(curve.evaluate(0.0), 0.0);
            assert_eq!(curve.evaluate(1.0), 1.0);
        }
    }

    #[test]
    fn test_linear_is_identity() {
        assert!((EasingCurve::Linear.evaluate(0.37) - 0.37).abs() < 1e-6);
    }

    #[test]
    fn test_ease_in_starts_slow() {
        assert!(EasingCurve::EaseIn.evaluate(0.25) < 0.25);
    }

    #[test]
    fn test_ease_out_starts_fast() {
        assert!(EasingCurve::EaseOut.evaluate(0.25) > 0.25);
    }

    #[test]
    fn test_monotone_nondecreasing() {
        for curve in [EasingCurve::EaseIn, EasingCurve::EaseOut] {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = curve.evaluate(i as f32 / 100.0);
                assert!(v >= prev - 1e-4);
                prev = v;
            }
        }
    }

    #[test]
    fn test_out_of_range_input_clamps() {
        assert_eq!(EasingCurve::EaseIn.evaluate(-1.0), 0.0);
        assert_eq!(EasingCurve::EaseOut.evaluate(2.0), 1.0);
    }
}
