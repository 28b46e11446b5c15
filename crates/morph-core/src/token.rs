//! Identity-bearing text tokens.
//!
//! A [`Token`] is one visual unit of text (a grapheme cluster) carrying a
//! stable string identity. The identity is the only join key used when two
//! renditions of a text are compared; value and index are free to change
//! while the identity persists.

use serde::{Deserialize, Serialize};

/// One identity-bearing unit of displayed text.
///
/// Tokens are immutable value objects: a fresh `Token` is built whenever the
/// value or index changes, even when the identity is inherited from an older
/// rendition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Opaque stable identity, unique within one rendition.
    pub id: String,
    /// The displayed grapheme cluster.
    pub value: String,
    /// Index within the rendition (0-based, dense).
    pub index: usize,
}

impl Token {
    /// Create a token.
    pub fn new(id: impl Into<String>, value: impl Into<String>, index: usize) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            index,
        }
    }
}

/// A token present in both renditions under one inherited identity.
///
/// `old.value` and `new.value` may differ; that pair is a morph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedPair {
    /// The token as it appeared in the previous rendition.
    pub old: Token,
    /// The token as it appears in the new rendition.
    pub new: Token,
}

/// Reassemble the text a token sequence spells out.
pub fn sequence_text(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.value.as_str()).collect()
}
