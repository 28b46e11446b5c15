//! Frame-driven motion scheduling.
//!
//! A [`ScheduledMotion`] animates one channel (frame, opacity, or
//! transform) of one staged view. The [`MotionScheduler`] owns every
//! in-flight motion, advances them all on each tick, and writes the
//! interpolated values straight into the stage. Finishing a motion —
//! naturally or by force — always lands it on its end value; a motion is
//! never abandoned mid-flight.
//!
//! Every transition runs under an epoch. Completion events carry the epoch
//! they were scheduled in, and draining filters out events from earlier
//! epochs, so a preempted transition cannot leak completions into its
//! successor.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::geometry::Rect;
use crate::motion::easing::EasingCurve;
use crate::motion::interpolate::Interpolate;
use crate::motion::spring::SpringTiming;
use crate::motion::transform::Transform2D;
use crate::stage::Stage;

/// Unique identifier for a scheduled motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MotionId(pub u64);

impl MotionId {
    /// Generate a new unique motion ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for MotionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle state of a motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// Waiting out its start delay.
    Pending,
    /// Actively interpolating.
    Running,
    /// Landed on its end value.
    Finished,
}

/// Which visual property a motion drives, with its endpoints.
#[derive(Debug, Clone, PartialEq)]
pub enum MotionChannel {
    Frame { from: Rect, to: Rect },
    Opacity { from: f32, to: f32 },
    Transform { from: Transform2D, to: Transform2D },
}

/// How a motion maps elapsed time to progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionTiming {
    /// Physically timed; the settling time is the duration.
    Spring(SpringTiming),
    /// Fixed duration with an easing curve.
    Eased { duration_ms: f32, curve: EasingCurve },
}

impl MotionTiming {
    fn duration_ms(&self) -> f32 {
        match self {
            Self::Spring(spring) => spring.settling_ms(),
            Self::Eased { duration_ms, .. } => *duration_ms,
        }
    }

    fn fraction_at(&self, elapsed_ms: f32) -> f32 {
        match self {
            Self::Spring(spring) => spring.value_at(elapsed_ms),
            Self::Eased { duration_ms, curve } => {
                if *duration_ms <= 0.0 {
                    1.0
                } else {
                    curve.evaluate(elapsed_ms / duration_ms)
                }
            }
        }
    }
}

/// What to do with the target view once the motion lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    None,
    /// Remove the view from the stage (end of an exit).
    RemoveView,
}

/// A request to animate one channel of one view.
#[derive(Debug, Clone)]
pub struct ScheduledMotion {
    /// Stage instance key of the target view.
    pub view_key: String,
    pub channel: MotionChannel,
    pub timing: MotionTiming,
    /// Delay before the motion starts, in milliseconds.
    pub delay_ms: f32,
    pub completion: Completion,
}

/// Completion notice for one motion.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionEvent {
    pub id: MotionId,
    pub view_key: String,
    pub epoch: u64,
    /// True when the motion was force-completed rather than running out.
    pub forced: bool,
}

/// Runtime state of one in-flight motion.
#[derive(Debug, Clone)]
struct ActiveMotion {
    id: MotionId,
    epoch: u64,
    motion: ScheduledMotion,
    duration_ms: f32,
    elapsed_ms: f32,
    state: MotionState,
}

impl ActiveMotion {
    fn new(motion: ScheduledMotion, epoch: u64) -> Self {
        let duration_ms = motion.timing.duration_ms();
        let state = if motion.delay_ms > 0.0 {
            MotionState::Pending
        } else {
            MotionState::Running
        };
        Self {
            id: MotionId::new(),
            epoch,
            motion,
            duration_ms,
            elapsed_ms: 0.0,
            state,
        }
    }

    /// Advance by `delta_ms`. Returns `false` once the motion has run out.
    fn update(&mut self, delta_ms: f32) -> bool {
        match self.state {
            MotionState::Finished => false,
            MotionState::Pending => {
                self.elapsed_ms += delta_ms;
                if self.elapsed_ms >= self.motion.delay_ms {
                    self.state = MotionState::Running;
                    self.check_elapsed()
                } else {
                    true
                }
            }
            MotionState::Running => {
                self.elapsed_ms += delta_ms;
                self.check_elapsed()
            }
        }
    }

    fn check_elapsed(&mut self) -> bool {
        if self.elapsed_ms - self.motion.delay_ms >= self.duration_ms {
            self.state = MotionState::Finished;
            false
        } else {
            true
        }
    }

    fn fraction(&self) -> f32 {
        match self.state {
            MotionState::Pending => 0.0,
            MotionState::Finished => 1.0,
            MotionState::Running => {
                let active = (self.elapsed_ms - self.motion.delay_ms).max(0.0);
                self.motion.timing.fraction_at(active)
            }
        }
    }

    /// Write the current interpolated value into the stage. A missing view
    /// (already removed) is a quiet no-op.
    fn apply(&self, stage: &mut Stage) {
        let Some(view) = stage.get_mut(&self.motion.view_key) else {
            return;
        };
        let t = self.fraction();
        match &self.motion.channel {
            MotionChannel::Frame { from, to } => view.frame = from.interpolate(to, t),
            MotionChannel::Opacity { from, to } => view.opacity = from.interpolate(to, t),
            MotionChannel::Transform { from, to } => view.transform = from.interpolate(to, t),
        }
    }

    /// Land on the end value and perform the completion action.
    fn finish(&mut self, stage: &mut Stage) {
        self.state = MotionState::Finished;
        self.apply(stage);
        if self.motion.completion == Completion::RemoveView {
            stage.remove(&self.motion.view_key);
        }
    }
}

/// The scheduling-collaborator contract: run motions with timing and
/// optional delay, deliver completions, and be able to stop everything by
/// snapping to end states.
pub trait Scheduler {
    /// Queue a motion under the current epoch.
    fn schedule(&mut self, motion: ScheduledMotion) -> MotionId;

    /// Advance all motions by `delta_ms`, writing values into the stage.
    fn advance(&mut self, delta_ms: f32, stage: &mut Stage);

    /// Force-complete one motion: snap it to its end value. Returns
    /// `false` when the id is unknown (already completed).
    fn finish(&mut self, id: MotionId, stage: &mut Stage) -> bool;

    /// Force-complete every motion: snap to end values, never freeze
    /// mid-flight.
    fn finish_all(&mut self, stage: &mut Stage);

    /// Open a new epoch and return it. Events from earlier epochs become
    /// stale.
    fn begin_epoch(&mut self) -> u64;

    /// Take the pending completion events for the current epoch.
    fn drain_events(&mut self) -> Vec<MotionEvent>;

    /// True when nothing is pending or running.
    fn is_idle(&self) -> bool;
}

/// The crate's frame-driven [`Scheduler`]: a single registry advanced by
/// `tick`, no threads, no timers.
#[derive(Debug, Default)]
pub struct MotionScheduler {
    motions: Vec<ActiveMotion>,
    events: VecDeque<MotionEvent>,
    epoch: u64,
}

impl MotionScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

fn completion_event(motion: &ActiveMotion, forced: bool) -> MotionEvent {
    MotionEvent {
        id: motion.id,
        view_key: motion.motion.view_key.clone(),
        epoch: motion.epoch,
        forced,
    }
}

impl Scheduler for MotionScheduler {
    fn schedule(&mut self, motion: ScheduledMotion) -> MotionId {
        let active = ActiveMotion::new(motion, self.epoch);
        let id = active.id;
        self.motions.push(active);
        id
    }

    fn advance(&mut self, delta_ms: f32, stage: &mut Stage) {
        if self.motions.is_empty() {
            return;
        }
        for motion in &mut self.motions {
            if motion.update(delta_ms) {
                motion.apply(stage);
            } else {
                motion.finish(stage);
                self.events.push_back(completion_event(motion, false));
            }
        }
        self.motions.retain(|m| m.state != MotionState::Finished);
    }

    fn finish(&mut self, id: MotionId, stage: &mut Stage) -> bool {
        let Some(position) = self.motions.iter().position(|m| m.id == id) else {
            return false;
        };
        let mut motion = self.motions.remove(position);
        motion.finish(stage);
        self.events.push_back(completion_event(&motion, true));
        true
    }

    fn finish_all(&mut self, stage: &mut Stage) {
        for motion in &mut self.motions {
            motion.finish(stage);
            self.events.push_back(completion_event(motion, true));
        }
        self.motions.clear();
    }

    fn begin_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    fn drain_events(&mut self) -> Vec<MotionEvent> {
        let epoch = self.epoch;
        let mut fresh = Vec::new();
        for event in self.events.drain(..) {
            if event.epoch == epoch {
                fresh.push(event);
            }
        }
        fresh
    }

    fn is_idle(&self) -> bool {
        self.motions.is_empty()
    }
}
