//! The label driver: owns the current text, tokens, and stage, and turns
//! `set_text` calls into choreographed transitions.
//!
//! This is the widget shell minus any toolkit: a host embeds it, forwards
//! elapsed time into [`MorphLabel::tick`], and paints from
//! [`MorphLabel::stage`].

use std::mem;

use morph_core::{Token, diff, morph_diff, segment, segment_by_position};
use tracing::{debug, trace};

use crate::choreographer::{Choreographer, detect_direction};
use crate::config::{Mode, MorphConfig, ReduceMotion, Transition};
use crate::geometry::Size;
use crate::layout::{FixedAdvanceLayout, Measurement, TextLayout, TextMetrics};
use crate::stage::Stage;

/// An animated text label, driven by a layout collaborator and painted by
/// the host from its stage.
pub struct MorphLabel {
    config: MorphConfig,
    layout: Box<dyn TextLayout>,
    stage: Stage,
    choreographer: Choreographer,
    text: String,
    tokens: Vec<Token>,
    size: Size,
    system_reduce_motion: bool,
}

impl MorphLabel {
    /// Create a label with the reference fixed-advance layout.
    pub fn new(config: MorphConfig) -> Self {
        Self::with_layout(config, Box::new(FixedAdvanceLayout::new()))
    }

    /// Create a label measuring through a custom layout collaborator.
    pub fn with_layout(config: MorphConfig, layout: Box<dyn TextLayout>) -> Self {
        Self {
            config,
            layout,
            stage: Stage::new(),
            choreographer: Choreographer::new(),
            text: String::new(),
            tokens: Vec::new(),
            size: Size::default(),
            system_reduce_motion: false,
        }
    }

    /// Display `text`, transitioning from whatever is currently shown.
    /// Setting the already-displayed text is a no-op.
    pub fn set_text(&mut self, text: &str) {
        if text == self.text {
            return;
        }

        let first_text = self.text.is_empty() && self.tokens.is_empty();

        let (new_tokens, outcome) = match self.config.mode {
            Mode::Replace => {
                let new_tokens = segment_by_position(text);
                let outcome = diff(&self.tokens, &new_tokens);
                (new_tokens, outcome)
            }
            Mode::Morph if first_text => {
                let new_tokens = segment(text);
                let outcome = diff(&self.tokens, &new_tokens);
                (new_tokens, outcome)
            }
            Mode::Morph => morph_diff(&self.tokens, text),
        };

        let old_text = mem::replace(&mut self.text, text.to_string());
        let old_tokens = mem::replace(&mut self.tokens, new_tokens);

        let measurement = self.layout.measure(&self.tokens, &self.config.metrics);
        self.size = measurement.size;

        if first_text {
            // Nothing to transition from: place directly at final geometry.
            self.place(&measurement);
            return;
        }

        if self.reduced_motion() {
            // One atomic swap, no motion at all.
            self.choreographer.cancel_all(&mut self.stage);
            self.stage.clear();
            self.place(&measurement);
            return;
        }

        let old_measurement = self.layout.measure(&old_tokens, &self.config.metrics);
        let direction = if self.config.transition == Transition::Roll {
            detect_direction(&old_text, text)
        } else {
            1.0
        };

        self.choreographer.begin_transition(
            &mut self.stage,
            &outcome,
            &old_measurement.geometry(),
            &measurement.geometry(),
            direction,
            &self.config,
        );
    }

    /// The currently displayed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The most recently measured total size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The visual records a painting layer reads from.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The active configuration.
    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    /// Advance all running motions by `delta_ms`.
    pub fn tick(&mut self, delta_ms: f32) {
        let events = self.choreographer.advance(delta_ms, &mut self.stage);
        for event in events {
            trace!(view = %event.view_key, forced = event.forced, "motion completed");
        }
    }

    /// True while a transition is still running.
    pub fn is_in_flight(&self) -> bool {
        self.choreographer.is_in_flight()
    }

    /// Force-complete everything (teardown).
    pub fn cancel_all(&mut self) {
        self.choreographer.cancel_all(&mut self.stage);
    }

    /// Switch identity mode. Re-segments the current text under the new
    /// strategy and rebuilds the stage in place, without a transition.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.config.mode == mode {
            return;
        }
        self.config.mode = mode;
        if self.text.is_empty() {
            return;
        }
        self.tokens = match mode {
            Mode::Replace => segment_by_position(&self.text),
            Mode::Morph => segment(&self.text),
        };
        debug!(?mode, "re-segmented current text");
        self.choreographer.cancel_all(&mut self.stage);
        self.stage.clear();
        let measurement = self.layout.measure(&self.tokens, &self.config.metrics);
        self.size = measurement.size;
        self.place(&measurement);
    }

    /// Change the transition style for subsequent updates.
    pub fn set_transition(&mut self, transition: Transition) {
        self.config.transition = transition;
    }

    /// Replace the style metrics: re-measures the current tokens and snaps
    /// every view to its new frame without animating.
    pub fn set_metrics(&mut self, metrics: TextMetrics) {
        self.config.metrics = metrics;
        if self.tokens.is_empty() {
            return;
        }
        let measurement = self.layout.measure(&self.tokens, &self.config.metrics);
        self.size = measurement.size;
        for frame in &measurement.frames {
            if let Some(view) = self.stage.get_mut(&frame.id) {
                view.frame = frame.frame;
            }
        }
    }

    /// Supply the host platform's reduce-motion setting, consulted when
    /// the config says to follow the system.
    pub fn set_system_reduce_motion(&mut self, reduce: bool) {
        self.system_reduce_motion = reduce;
    }

    fn reduced_motion(&self) -> bool {
        match self.config.reduce_motion {
            ReduceMotion::FollowSystem => self.system_reduce_motion,
            ReduceMotion::Always => true,
            ReduceMotion::Never => false,
        }
    }

    /// Mount every measured token directly at its final geometry.
    fn place(&mut self, measurement: &Measurement) {
        for frame in &measurement.frames {
            let view = self.stage.mount(&frame.id, &frame.value);
            view.frame = frame.frame;
        }
    }
}
