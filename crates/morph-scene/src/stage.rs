//! The visual-token stage: one mutable record per on-screen token.
//!
//! This is the rendering-collaborator surface. Each [`TokenView`] exposes a
//! mutable frame, display value, opacity, and transform; the motion
//! scheduler writes interpolated values into these records every tick, so a
//! view's `frame` is always the currently presented geometry, mid-flight
//! included. A painting layer reads the records; this crate never paints.
//!
//! Views are keyed by token identity. A view on its way out is *retired*:
//! it leaves the identity key (so a successor can claim it) but stays on
//! the stage under a unique instance key until its exit motion removes it.

use std::collections::HashMap;

use crate::geometry::Rect;
use crate::motion::transform::Transform2D;

/// Mutable visual state of one on-screen token instance.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenView {
    /// The token identity this instance displays.
    pub id: String,
    /// Displayed text.
    pub value: String,
    /// Current frame, written through during animation.
    pub frame: Rect,
    /// Current opacity in `[0, 1]`.
    pub opacity: f32,
    /// Current transform about the view center.
    pub transform: Transform2D,
    /// Whether this instance has been retired (animating out, identity
    /// already released).
    pub retired: bool,
}

impl TokenView {
    fn new(id: String, value: String) -> Self {
        Self {
            id,
            value,
            frame: Rect::default(),
            opacity: 1.0,
            transform: Transform2D::IDENTITY,
            retired: false,
        }
    }
}

/// Registry of live token views, keyed by instance key.
///
/// For a mounted view the instance key is the token id itself; retired
/// views get a derived unique key.
#[derive(Debug, Default)]
pub struct Stage {
    views: HashMap<String, TokenView>,
    retire_serial: u64,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a fresh view under a token id, replacing any existing view
    /// with that key.
    pub fn mount(&mut self, id: &str, value: &str) -> &mut TokenView {
        self.views
            .entry(id.to_string())
            .insert_entry(TokenView::new(id.to_string(), value.to_string()))
            .into_mut()
    }

    /// Release a view's identity key and re-register it under a unique
    /// instance key. Returns the new key, or `None` when no view holds the
    /// id.
    pub fn retire(&mut self, id: &str) -> Option<String> {
        let mut view = self.views.remove(id)?;
        view.retired = true;
        self.retire_serial += 1;
        let key = format!("{id}@r{}", self.retire_serial);
        self.views.insert(key.clone(), view);
        Some(key)
    }

    pub fn get(&self, key: &str) -> Option<&TokenView> {
        self.views.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TokenView> {
        self.views.get_mut(key)
    }

    /// Remove a view outright (end of an exit animation).
    pub fn remove(&mut self, key: &str) -> Option<TokenView> {
        self.views.remove(key)
    }

    /// Drop every view.
    pub fn clear(&mut self) {
        self.views.clear();
    }

    /// All views, in no particular order.
    pub fn views(&self) -> impl Iterator<Item = &TokenView> {
        self.views.values()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// The currently presented frame of every non-retired view, by token
    /// id. Retired views are already on their way out and do not
    /// participate in the next transition.
    pub fn capture_frames(&self) -> HashMap<String, Rect> {
        self.views
            .values()
            .filter(|v| !v.retired)
            .map(|v| (v.id.clone(), v.frame))
            .collect()
    }
}
