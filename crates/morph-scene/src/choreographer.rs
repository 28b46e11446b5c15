//! Turns a diff classification plus geometry into running per-token
//! motions, and manages their lifetime across rapid overlapping updates.
//!
//! The ordering inside [`Choreographer::begin_transition`] is load-bearing:
//! live geometry is captured *before* the previous transition is
//! force-completed, and every previous motion is force-completed before any
//! new motion is scheduled. That order is what lets back-to-back updates
//! compose visually instead of jumping.

use std::collections::HashMap;

use morph_core::DiffOutcome;
use tracing::{debug, warn};

use crate::config::{Mode, MorphConfig, Transition};
use crate::geometry::{Rect, Vec2};
use crate::motion::{
    Completion, EasingCurve, MotionChannel, MotionEvent, MotionScheduler, MotionTiming,
    ScheduledMotion, Scheduler, Transform2D,
};
use crate::stage::Stage;

/// Shrink factor applied to scaling enters and exits.
const EXIT_SCALE: f32 = 0.82;

/// Floor for the change-magnitude scaling of drift and stagger, so small
/// edits stay visible.
const MIN_MAGNITUDE_SCALE: f32 = 0.3;

/// Schedules and owns every motion of the current transition.
#[derive(Debug, Default)]
pub struct Choreographer {
    scheduler: MotionScheduler,
}

impl Choreographer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transition from the currently staged views to the new
    /// rendition described by `outcome` and `new_geometry`.
    ///
    /// `old_geometry` supplies measured fallback frames for tokens that
    /// have no live view to capture from. A call while a previous
    /// transition is still in flight preempts it: prior motions snap to
    /// their end states first, and only the new transition keeps running.
    pub fn begin_transition(
        &mut self,
        stage: &mut Stage,
        outcome: &DiffOutcome,
        old_geometry: &HashMap<String, Rect>,
        new_geometry: &HashMap<String, Rect>,
        direction: f32,
        config: &MorphConfig,
    ) {
        // Live interpolated frames, read before anything is canceled; a
        // rapid second update must continue from the true mid-flight
        // position, not the stale target.
        let mut captured = stage.capture_frames();
        for (id, rect) in old_geometry {
            captured.entry(id.clone()).or_insert(*rect);
        }

        self.scheduler.finish_all(stage);
        self.scheduler.begin_epoch();

        let morph = config.mode == Mode::Morph;
        let magnitude_scale = if morph {
            outcome.change_magnitude.max(MIN_MAGNITUDE_SCALE)
        } else {
            1.0
        };
        let drift = config.drift * magnitude_scale;
        let stagger_ms = config.style.stagger_ms * magnitude_scale;

        debug!(
            persisted = outcome.persisted.len(),
            entering = outcome.entering.len(),
            exiting = outcome.exiting.len(),
            change = outcome.change_magnitude,
            "beginning transition"
        );

        // Positional delta of each persisted token, keyed by its old index.
        // Exits and enters borrow the nearest one as an anchor.
        let mut deltas: HashMap<usize, Vec2> = HashMap::new();
        let mut enter_slot = 0usize;

        for pair in &outcome.persisted {
            let id = pair.new.id.as_str();
            let Some(&target) = new_geometry.get(id) else {
                warn!(id, "persisted token has no target geometry, skipping");
                continue;
            };
            let Some(&start) = captured.get(id).or_else(|| old_geometry.get(id)) else {
                warn!(id, "persisted token has no source geometry, skipping");
                continue;
            };

            if morph || pair.old.value == pair.new.value {
                // Retarget the live view in place: new value, frame pinned
                // to where it visually is right now, spring to the target.
                let Some(view) = stage.get_mut(id) else {
                    continue;
                };
                view.value = pair.new.value.clone();
                view.frame = start;
                view.opacity = 1.0;
                view.transform = Transform2D::IDENTITY;

                self.scheduler.schedule(ScheduledMotion {
                    view_key: id.to_string(),
                    channel: MotionChannel::Frame {
                        from: start,
                        to: target,
                    },
                    timing: MotionTiming::Spring(config.style.spring()),
                    delay_ms: 0.0,
                    completion: Completion::None,
                });

                if morph {
                    let (old_center, new_center) = (start.center(), target.center());
                    deltas.insert(
                        pair.old.index,
                        Vec2::new(new_center.x - old_center.x, new_center.y - old_center.y),
                    );
                }
            } else {
                // Swap sub-mode: the slot persists but the value changed,
                // so the old visual exits and a fresh one enters under the
                // shared id.
                if let Some(exit_key) = stage.retire(id) {
                    if let Some(view) = stage.get_mut(&exit_key) {
                        view.frame = start;
                    }
                    self.schedule_exit(&exit_key, start, Vec2::ZERO, direction, drift, config);
                }
                self.mount_entering(stage, id, &pair.new.value, target, Vec2::ZERO, direction, drift, config);
                self.schedule_enter(id, None, enter_slot, stagger_ms, direction, drift, config);
                enter_slot += 1;
            }
        }

        for token in &outcome.exiting {
            let Some(exit_key) = stage.retire(&token.id) else {
                continue;
            };
            let anchor = nearest_delta(token.index, &deltas);
            let start = captured.get(&token.id).copied();
            let frame = match stage.get_mut(&exit_key) {
                Some(view) => {
                    if let Some(start) = start {
                        view.frame = start;
                    }
                    view.frame
                }
                None => continue,
            };
            self.schedule_exit(&exit_key, frame, anchor, direction, drift, config);
        }

        for token in &outcome.entering {
            let id = token.id.as_str();
            let Some(&target) = new_geometry.get(id) else {
                warn!(id, "entering token has no target geometry, skipping");
                continue;
            };
            let anchor = nearest_delta(token.index, &deltas);
            self.mount_entering(stage, id, &token.value, target, anchor, direction, drift, config);
            let reposition = (!anchor.is_zero()).then(|| {
                (target.offset(-anchor.x, -anchor.y), target)
            });
            self.schedule_enter(id, reposition, enter_slot, stagger_ms, direction, drift, config);
            enter_slot += 1;
        }
    }

    /// Force-complete everything immediately (teardown).
    pub fn cancel_all(&mut self, stage: &mut Stage) {
        self.scheduler.finish_all(stage);
    }

    /// Advance the transition clock and collect completion events for the
    /// current transition.
    pub fn advance(&mut self, delta_ms: f32, stage: &mut Stage) -> Vec<MotionEvent> {
        self.scheduler.advance(delta_ms, stage);
        self.scheduler.drain_events()
    }

    /// True while any motion is pending or running.
    pub fn is_in_flight(&self) -> bool {
        !self.scheduler.is_idle()
    }

    /// Mount a fresh view in its pre-entrance state: transparent,
    /// transformed out, offset against its anchor.
    #[allow(clippy::too_many_arguments)]
    fn mount_entering(
        &mut self,
        stage: &mut Stage,
        id: &str,
        value: &str,
        target: Rect,
        anchor: Vec2,
        direction: f32,
        drift: f32,
        config: &MorphConfig,
    ) {
        let start = if anchor.is_zero() {
            target
        } else {
            target.offset(-anchor.x, -anchor.y)
        };
        let view = stage.mount(id, value);
        view.frame = start;
        view.opacity = 0.0;
        view.transform = enter_transform(config.transition, direction, drift);
    }

    /// Schedule the entrance motions for a mounted view: an unstaggered
    /// spring reposition (when anchored), plus the staggered transform
    /// spring-in and fade-in.
    #[allow(clippy::too_many_arguments)]
    fn schedule_enter(
        &mut self,
        view_key: &str,
        reposition: Option<(Rect, Rect)>,
        slot: usize,
        stagger_ms: f32,
        direction: f32,
        drift: f32,
        config: &MorphConfig,
    ) {
        let delay_ms = slot as f32 * stagger_ms;

        if let Some((from, to)) = reposition {
            self.scheduler.schedule(ScheduledMotion {
                view_key: view_key.to_string(),
                channel: MotionChannel::Frame { from, to },
                timing: MotionTiming::Spring(config.style.spring()),
                delay_ms: 0.0,
                completion: Completion::None,
            });
        }

        self.scheduler.schedule(ScheduledMotion {
            view_key: view_key.to_string(),
            channel: MotionChannel::Transform {
                from: enter_transform(config.transition, direction, drift),
                to: Transform2D::IDENTITY,
            },
            timing: MotionTiming::Spring(config.style.spring()),
            delay_ms,
            completion: Completion::None,
        });

        self.scheduler.schedule(ScheduledMotion {
            view_key: view_key.to_string(),
            channel: MotionChannel::Opacity { from: 0.0, to: 1.0 },
            timing: MotionTiming::Eased {
                duration_ms: config.style.fade_ms,
                curve: EasingCurve::EaseOut,
            },
            delay_ms,
            completion: Completion::None,
        });
    }

    /// Schedule the exit motions for a retired view: fade and transform
    /// out, with removal on completion, plus a spring drift along the
    /// anchor delta so it is swept along with surviving neighbors.
    fn schedule_exit(
        &mut self,
        view_key: &str,
        frame: Rect,
        anchor: Vec2,
        direction: f32,
        drift: f32,
        config: &MorphConfig,
    ) {
        self.scheduler.schedule(ScheduledMotion {
            view_key: view_key.to_string(),
            channel: MotionChannel::Transform {
                from: Transform2D::IDENTITY,
                to: exit_transform(config.transition, direction, drift),
            },
            timing: MotionTiming::Eased {
                duration_ms: config.style.fade_ms,
                curve: EasingCurve::EaseIn,
            },
            delay_ms: 0.0,
            completion: Completion::None,
        });

        self.scheduler.schedule(ScheduledMotion {
            view_key: view_key.to_string(),
            channel: MotionChannel::Opacity { from: 1.0, to: 0.0 },
            timing: MotionTiming::Eased {
                duration_ms: config.style.fade_ms,
                curve: EasingCurve::EaseIn,
            },
            delay_ms: 0.0,
            completion: Completion::RemoveView,
        });

        if !anchor.is_zero() {
            self.scheduler.schedule(ScheduledMotion {
                view_key: view_key.to_string(),
                channel: MotionChannel::Frame {
                    from: frame,
                    to: frame.offset(anchor.x, anchor.y),
                },
                timing: MotionTiming::Spring(config.style.spring()),
                delay_ms: 0.0,
                completion: Completion::None,
            });
        }
    }
}

/// The delta of the nearest persisted token by old-sequence distance.
/// Ties resolve to the lowest index; no persisted tokens means no anchor.
fn nearest_delta(index: usize, deltas: &HashMap<usize, Vec2>) -> Vec2 {
    let mut best: Option<(usize, usize)> = None;
    for &candidate in deltas.keys() {
        let distance = index.abs_diff(candidate);
        let better = match best {
            None => true,
            Some((best_distance, best_index)) => {
                distance < best_distance || (distance == best_distance && candidate < best_index)
            }
        };
        if better {
            best = Some((distance, candidate));
        }
    }
    best.and_then(|(_, index)| deltas.get(&index).copied())
        .unwrap_or(Vec2::ZERO)
}

/// Sign of a text change for directional transitions: compare the first
/// signed decimal embedded in each string; growth (or no parse on either
/// side) is positive.
pub fn detect_direction(old: &str, new: &str) -> f32 {
    if extract_number(new) >= extract_number(old) {
        1.0
    } else {
        -1.0
    }
}

fn extract_number(text: &str) -> f64 {
    let filtered: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    filtered.parse().unwrap_or(0.0)
}

fn exit_transform(transition: Transition, direction: f32, drift: f32) -> Transform2D {
    match transition {
        Transition::Scale => Transform2D::scale(EXIT_SCALE),
        Transition::Roll => Transform2D::translate(0.0, -direction * drift).scaled(EXIT_SCALE),
        Transition::Slide => Transform2D::translate(-direction * drift, 0.0),
    }
}

fn enter_transform(transition: Transition, direction: f32, drift: f32) -> Transform2D {
    match transition {
        Transition::Scale => Transform2D::scale(EXIT_SCALE),
        Transition::Roll => Transform2D::translate(0.0, direction * drift).scaled(EXIT_SCALE),
        Transition::Slide => Transform2D::translate(direction * drift, 0.0),
    }
}
