//! Layout collaborator: measuring token geometry.
//!
//! Real text measurement (fonts, shaping) lives outside this crate. The
//! contract is small: given a token sequence and style metrics, produce a
//! frame per token and a total size, deterministically, in a coordinate
//! space whose origin is stable across calls — frame deltas between two
//! renditions must be meaningful.

use std::collections::HashMap;

use morph_core::Token;
use serde::{Deserialize, Serialize};

use crate::geometry::{Rect, Size};

/// Style metrics the layout measures against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextMetrics {
    /// Default horizontal advance per token.
    pub advance: f32,
    /// Line height, also the token height.
    pub line_height: f32,
    /// Extra spacing between consecutive tokens (not after the last).
    pub letter_spacing: f32,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            advance: 10.0,
            line_height: 18.0,
            letter_spacing: 0.0,
        }
    }
}

/// One measured token.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenFrame {
    pub id: String,
    pub value: String,
    pub frame: Rect,
}

/// Result of measuring a token sequence.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Measurement {
    pub frames: Vec<TokenFrame>,
    pub size: Size,
}

impl Measurement {
    /// The measured frames as a geometry map keyed by token id.
    pub fn geometry(&self) -> HashMap<String, Rect> {
        self.frames
            .iter()
            .map(|f| (f.id.clone(), f.frame))
            .collect()
    }
}

/// The layout-collaborator contract.
pub trait TextLayout {
    fn measure(&self, tokens: &[Token], metrics: &TextMetrics) -> Measurement;
}

/// Deterministic reference layout: every token advances by a fixed amount,
/// with optional per-grapheme overrides for proportional tables.
#[derive(Clone, Debug, Default)]
pub struct FixedAdvanceLayout {
    /// Advance overrides by grapheme value.
    pub overrides: HashMap<String, f32>,
}

impl FixedAdvanceLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, value: &str, advance: f32) -> Self {
        self.overrides.insert(value.to_string(), advance);
        self
    }
}

impl TextLayout for FixedAdvanceLayout {
    fn measure(&self, tokens: &[Token], metrics: &TextMetrics) -> Measurement {
        if tokens.is_empty() {
            return Measurement::default();
        }

        let height = metrics.line_height.ceil();
        let mut frames = Vec::with_capacity(tokens.len());
        let mut x = 0.0f32;

        for (i, token) in tokens.iter().enumerate() {
            let advance = self
                .overrides
                .get(&token.value)
                .copied()
                .unwrap_or(metrics.advance);
            let w = advance.ceil();
            frames.push(TokenFrame {
                id: token.id.clone(),
                value: token.value.clone(),
                frame: Rect::new(x, 0.0, w, height),
            });
            x += w;
            if i < tokens.len() - 1 {
                x += metrics.letter_spacing;
            }
        }

        Measurement {
            frames,
            size: Size { w: x, h: height },
        }
    }
}
