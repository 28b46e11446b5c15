//! The motion runtime: timing, interpolation, and frame-driven scheduling.
//!
//! ```text
//! MotionScheduler
//!   └── ActiveMotion (per view channel: frame / opacity / transform)
//!         ├── MotionTiming (spring or eased duration)
//!         └── writes interpolated values into the Stage each tick
//! ```

pub mod easing;
pub mod interpolate;
pub mod scheduler;
pub mod spring;
pub mod transform;

pub use easing::EasingCurve;
pub use interpolate::Interpolate;
pub use scheduler::{
    Completion, MotionChannel, MotionEvent, MotionId, MotionScheduler, MotionState, MotionTiming,
    ScheduledMotion, Scheduler,
};
pub use spring::SpringTiming;
pub use transform::Transform2D;
