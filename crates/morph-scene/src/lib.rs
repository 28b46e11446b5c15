//! Animated text-transition runtime.
//!
//! `morph-core` decides *what* changed between two renditions of a text;
//! this crate decides *how it looks*: it keeps one mutable visual record
//! per on-screen token, schedules spring and eased motions against those
//! records, and survives rapid overlapping updates by capturing live
//! geometry before force-completing the previous transition.
//!
//! # Architecture
//!
//! ```text
//! MorphLabel (driver)
//!   ├── tokenize + diff (morph-core)
//!   ├── TextLayout (layout collaborator: token frames + total size)
//!   ├── Stage (rendering surface: frame / value / opacity / transform)
//!   └── Choreographer
//!         └── MotionScheduler (frame-driven spring/eased motions)
//! ```
//!
//! Hosts call [`MorphLabel::set_text`] when the text changes, forward
//! elapsed time into [`MorphLabel::tick`], and paint whatever the stage
//! holds.

pub mod choreographer;
pub mod config;
pub mod geometry;
pub mod label;
pub mod layout;
pub mod motion;
pub mod stage;

pub use choreographer::{Choreographer, detect_direction};
pub use config::{ConfigError, Mode, MorphConfig, MotionStyle, ReduceMotion, Transition};
pub use geometry::{Rect, Size, Vec2};
pub use label::MorphLabel;
pub use layout::{FixedAdvanceLayout, Measurement, TextLayout, TextMetrics, TokenFrame};
pub use motion::{
    EasingCurve, MotionChannel, MotionEvent, MotionId, MotionScheduler, MotionTiming,
    ScheduledMotion, Scheduler, SpringTiming, Transform2D,
};
pub use stage::{Stage, TokenView};

// The runtime is single-threaded by design, but its state must still be
// free to move across threads with its owner.
static_assertions::assert_impl_all!(Stage: Send);
static_assertions::assert_impl_all!(MotionScheduler: Send);
static_assertions::assert_impl_all!(MorphConfig: Send, Sync);
