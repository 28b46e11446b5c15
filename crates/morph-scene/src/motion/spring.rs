//! Spring timing: the normalized response of a damped harmonic oscillator.
//!
//! Frame moves and transform springs are timed by physical parameters
//! rather than a fixed duration. The response is evaluated in closed form
//! (no per-tick integration state), starting at 0 and settling at 1,
//! overshooting when underdamped. The settling time bounds the motion's
//! lifetime; nothing else does.

use serde::{Deserialize, Serialize};

/// Settling threshold: the motion is considered done once the response
/// envelope decays below this fraction of the initial displacement.
const SETTLE_EPSILON: f32 = 1e-3;

/// Fallback duration when the parameters are degenerate (non-positive mass,
/// stiffness, or damping).
const FALLBACK_MS: f32 = 300.0;

/// Physical spring parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringTiming {
    pub mass: f32,
    pub stiffness: f32,
    pub damping: f32,
    /// Initial velocity, normalized against the total travel distance
    /// (per second).
    pub initial_velocity: f32,
}

impl Default for SpringTiming {
    fn default() -> Self {
        Self {
            mass: 1.0,
            stiffness: 350.0,
            damping: 30.0,
            initial_velocity: 0.0,
        }
    }
}

impl SpringTiming {
    pub fn new(mass: f32, stiffness: f32, damping: f32, initial_velocity: f32) -> Self {
        Self {
            mass,
            stiffness,
            damping,
            initial_velocity,
        }
    }

    fn is_degenerate(&self) -> bool {
        self.mass <= 0.0 || self.stiffness <= 0.0 || self.damping <= 0.0
    }

    /// Undamped angular frequency `sqrt(k/m)`.
    fn omega(&self) -> f32 {
        (self.stiffness / self.mass).sqrt()
    }

    /// Damping ratio `c / (2·sqrt(k·m))`.
    fn zeta(&self) -> f32 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Normalized position at `elapsed_ms`, from 0 toward 1.
    pub fn value_at(&self, elapsed_ms: f32) -> f32 {
        if elapsed_ms <= 0.0 {
            return 0.0;
        }
        if self.is_degenerate() {
            return (elapsed_ms / FALLBACK_MS).clamp(0.0, 1.0);
        }

        let t = elapsed_ms / 1000.0;
        let omega = self.omega();
        let zeta = self.zeta();
        let v0 = self.initial_velocity;

        // Deviation y(t) from the target, with y(0) = 1, y'(0) = -v0.
        let deviation = if zeta < 1.0 {
            let omega_d = omega * (1.0 - zeta * zeta).sqrt();
            let b = (zeta * omega - v0) / omega_d;
            (-zeta * omega * t).exp() * ((omega_d * t).cos() + b * (omega_d * t).sin())
        } else if (zeta - 1.0).abs() < 1e-4 {
            (-omega * t).exp() * (1.0 + (omega - v0) * t)
        } else {
            let root = omega * (zeta * zeta - 1.0).sqrt();
            let r1 = -zeta * omega + root;
            let r2 = -zeta * omega - root;
            let a = (-v0 - r2) / (r1 - r2);
            a * (r1 * t).exp() + (1.0 - a) * (r2 * t).exp()
        };

        1.0 - deviation
    }

    /// Time in milliseconds until the response envelope has settled.
    pub fn settling_ms(&self) -> f32 {
        if self.is_degenerate() {
            return FALLBACK_MS;
        }
        let zeta = self.zeta();
        let omega = self.omega();
        // Slowest decay rate of the envelope.
        let decay = if zeta < 1.0 {
            zeta * omega
        } else {
            omega * (zeta - (zeta * zeta - 1.0).sqrt())
        };
        (1.0 / SETTLE_EPSILON).ln() / decay * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        let spring = SpringTiming::default();
        assert_eq!(spring.value_at(0.0), 0.0);
    }

    #[test]
    fn test_settles_at_one() {
        let spring = SpringTiming::default();
        let settled = spring.value_at(spring.settling_ms());
        assert!((settled - 1.0).abs() < 2.0 * 1e-3, "settled at {settled}");
    }

    #[test]
    fn test_underdamped_overshoots() {
        // Low damping must swing past the target at some point.
        let spring = SpringTiming::new(1.0, 300.0, 10.0, 0.0);
        let overshoot = (0..400)
            .map(|i| spring.value_at(i as f32 * 2.0))
            .fold(0.0f32, f32::max);
        assert!(overshoot > 1.0);
    }

    #[test]
    fn test_overdamped_never_overshoots() {
        let spring = SpringTiming::new(1.0, 100.0, 50.0, 0.0);
        for i in 0..400 {
            assert!(spring.value_at(i as f32 * 5.0) <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn test_progress_is_forward() {
        let spring = SpringTiming::default();
        assert!(spring.value_at(50.0) > 0.0);
        assert!(spring.value_at(50.0) < spring.value_at(100.0) + 1.0);
    }

    #[test]
    fn test_degenerate_parameters_fall_back() {
        let spring = SpringTiming::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(spring.settling_ms(), FALLBACK_MS);
        assert_eq!(spring.value_at(FALLBACK_MS), 1.0);
        assert_eq!(spring.value_at(FALLBACK_MS * 2.0), 1.0);
    }

    #[test]
    fn test_initial_velocity_speeds_launch() {
        let still = SpringTiming::default();
        let launched = SpringTiming::new(1.0, 350.0, 30.0, 8.0);
        assert!(launched.value_at(20.0) > still.value_at(20.0));
    }
}
