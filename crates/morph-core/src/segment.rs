//! Tokenizers: split a string into identity-bearing tokens.
//!
//! Two interchangeable strategies:
//!
//! - [`segment`] keeps content-derived identities stable across renditions:
//!   the first occurrence of a grapheme is its own identity, so a character
//!   that appears exactly once keeps the same id no matter where it moves.
//! - [`segment_by_position`] derives identity from the index alone, so any
//!   same-length rendition maps position-for-position onto the previous one.
//!
//! Both walk grapheme clusters, are deterministic and order-preserving, and
//! return an empty sequence for an empty string.

use std::collections::HashSet;

use unicode_segmentation::UnicodeSegmentation;

use crate::token::Token;

/// The word separator. Tokens holding it never get content-derived ids.
pub const SEPARATOR: &str = " ";

/// Identity-preserving segmentation.
///
/// The first occurrence of a non-separator grapheme uses the grapheme itself
/// as its id. Every later occurrence, and every separator, is disambiguated
/// with its index so ids stay unique within the rendition.
pub fn segment(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for (index, grapheme) in text.graphemes(true).enumerate() {
        let id = if grapheme == SEPARATOR {
            format!("space-{index}")
        } else if seen.contains(grapheme) {
            format!("{grapheme}-{index}")
        } else {
            seen.insert(grapheme);
            grapheme.to_string()
        };
        tokens.push(Token::new(id, grapheme, index));
    }

    tokens
}

/// Positional segmentation: identity is the index, independent of content.
pub fn segment_by_position(text: &str) -> Vec<Token> {
    text.graphemes(true)
        .enumerate()
        .map(|(index, grapheme)| Token::new(format!("p{index}"), grapheme, index))
        .collect()
}
