//! Engine configuration: animation mode, transition style, and motion
//! parameters, loadable from a `morph.toml` file with environment-variable
//! overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::layout::TextMetrics;
use crate::motion::SpringTiming;

/// How identities are assigned and value changes animated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Content-aware identity: matched characters morph in place.
    #[default]
    Morph,
    /// Positional identity: a changed value swaps its slot out and in.
    Replace,
}

/// Visual style of enter/exit motion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Shrink and fade.
    #[default]
    Scale,
    /// Roll vertically in the direction of the numeric change.
    Roll,
    /// Slide horizontally.
    Slide,
}

/// Whether to honor a reduced-motion preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReduceMotion {
    /// Follow the host-supplied system setting.
    #[default]
    FollowSystem,
    /// Always swap without animating.
    Always,
    /// Always animate.
    Never,
}

/// Spring and pacing parameters for one motion feel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionStyle {
    pub mass: f32,
    pub stiffness: f32,
    pub damping: f32,
    /// Initial spring velocity, normalized per second.
    pub initial_velocity: f32,
    /// Per-token start delay between newly scheduled tokens.
    pub stagger_ms: f32,
    /// Duration of fade-in/fade-out.
    pub fade_ms: f32,
}

impl Default for MotionStyle {
    fn default() -> Self {
        Self::SNAPPY
    }
}

impl MotionStyle {
    /// Quick, tight motion.
    pub const SNAPPY: Self = Self {
        mass: 1.0,
        stiffness: 350.0,
        damping: 30.0,
        initial_velocity: 0.0,
        stagger_ms: 35.0,
        fade_ms: 150.0,
    };

    /// Softer, slower motion.
    pub const SMOOTH: Self = Self {
        mass: 1.0,
        stiffness: 170.0,
        damping: 26.0,
        initial_velocity: 0.0,
        stagger_ms: 50.0,
        fade_ms: 200.0,
    };

    /// Lightly underdamped, with visible overshoot.
    pub const BOUNCY: Self = Self {
        mass: 1.0,
        stiffness: 300.0,
        damping: 22.0,
        initial_velocity: 0.0,
        stagger_ms: 40.0,
        fade_ms: 180.0,
    };

    /// The spring timing these parameters describe.
    pub fn spring(&self) -> SpringTiming {
        SpringTiming::new(self.mass, self.stiffness, self.damping, self.initial_velocity)
    }
}

/// Error loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level engine configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphConfig {
    pub mode: Mode,
    pub transition: Transition,
    pub reduce_motion: ReduceMotion,
    /// Drift distance for directional transitions.
    pub drift: f32,
    pub style: MotionStyle,
    pub metrics: TextMetrics,
}

impl Default for MorphConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            transition: Transition::default(),
            reduce_motion: ReduceMotion::default(),
            drift: Self::DEFAULT_DRIFT,
            style: MotionStyle::default(),
            metrics: TextMetrics::default(),
        }
    }
}

impl MorphConfig {
    /// Default drift distance.
    pub const DEFAULT_DRIFT: f32 = 10.0;

    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&content)?)
    }

    /// Load `morph.toml` from the current directory, falling back to
    /// defaults when it is absent or malformed.
    pub fn load_or_default() -> Self {
        Self::load_from_file("morph.toml").unwrap_or_default()
    }

    /// Apply environment-variable overrides on top of the loaded values.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("MORPH_MODE") {
            match val.as_str() {
                "morph" => self.mode = Mode::Morph,
                "replace" => self.mode = Mode::Replace,
                _ => {}
            }
        }
        if let Ok(val) = std::env::var("MORPH_TRANSITION") {
            match val.as_str() {
                "scale" => self.transition = Transition::Scale,
                "roll" => self.transition = Transition::Roll,
                "slide" => self.transition = Transition::Slide,
                _ => {}
            }
        }
        if let Ok(val) = std::env::var("MORPH_REDUCE_MOTION") {
            match val.as_str() {
                "follow_system" => self.reduce_motion = ReduceMotion::FollowSystem,
                "always" => self.reduce_motion = ReduceMotion::Always,
                "never" => self.reduce_motion = ReduceMotion::Never,
                _ => {}
            }
        }
        if let Ok(val) = std::env::var("MORPH_DRIFT") {
            if let Ok(drift) = val.parse::<f32>() {
                self.drift = drift;
            }
        }
        if let Ok(val) = std::env::var("MORPH_STAGGER_MS") {
            if let Ok(stagger) = val.parse::<f32>() {
                self.style.stagger_ms = stagger;
            }
        }
        if let Ok(val) = std::env::var("MORPH_FADE_MS") {
            if let Ok(fade) = val.parse::<f32>() {
                self.style.fade_ms = fade;
            }
        }
    }
}
