//! Classifies the tokens of a new rendition against the previous one.
//!
//! Two modes. The identity diff joins purely on token ids and is used for
//! positional updates and for the very first text. The morph diff is
//! content-aware: it aligns the old and new text with [`lcs`](crate::align::lcs)
//! and lets matched characters inherit their old identity, so a single
//! substitution animates as a morph instead of a delete plus insert.
//!
//! Diffing never fails. A token with no counterpart degrades to entering or
//! exiting; that best-effort contract is deliberate.

use std::collections::{HashMap, HashSet};

use unicode_segmentation::UnicodeSegmentation;

use crate::align::lcs;
use crate::segment::SEPARATOR;
use crate::token::{AlignedPair, Token, sequence_text};

/// Classification of a new token sequence against the previous one.
///
/// Every new token appears in exactly one of `persisted` (as the new side)
/// or `entering`; every old token in exactly one of `persisted` (as the old
/// side) or `exiting`.
#[derive(Debug, Clone, Default)]
pub struct DiffOutcome {
    /// Tokens present in both renditions, joined by inherited identity.
    pub persisted: Vec<AlignedPair>,
    /// New tokens with no old counterpart.
    pub entering: Vec<Token>,
    /// Old tokens with no new counterpart.
    pub exiting: Vec<Token>,
    /// Fraction of tokens that entered or exited, in `[0, 1]`.
    pub change_magnitude: f32,
}

/// Identity diff: join old and new tokens on their ids alone.
pub fn diff(old: &[Token], new: &[Token]) -> DiffOutcome {
    let new_ids: HashSet<&str> = new.iter().map(|t| t.id.as_str()).collect();
    let old_lookup: HashMap<&str, &Token> = old.iter().map(|t| (t.id.as_str(), t)).collect();

    let mut persisted = Vec::new();
    let mut entering = Vec::new();

    for token in new {
        match old_lookup.get(token.id.as_str()) {
            Some(old_token) => persisted.push(AlignedPair {
                old: (*old_token).clone(),
                new: token.clone(),
            }),
            None => entering.push(token.clone()),
        }
    }

    let exiting: Vec<Token> = old
        .iter()
        .filter(|t| !new_ids.contains(t.id.as_str()))
        .cloned()
        .collect();

    let change_magnitude = change_magnitude(entering.len(), exiting.len(), old.len(), new.len());

    DiffOutcome {
        persisted,
        entering,
        exiting,
        change_magnitude,
    }
}

/// Content-aware diff against a raw new text.
///
/// Chooses the word-level strategy when either side contains a separator,
/// character-level otherwise. Returns the freshly built new token sequence
/// alongside the classification.
pub fn morph_diff(old_tokens: &[Token], new_text: &str) -> (Vec<Token>, DiffOutcome) {
    let old_text = sequence_text(old_tokens);

    let strategy = if old_text.contains(SEPARATOR) || new_text.contains(SEPARATOR) {
        MorphStrategy::Word
    } else {
        MorphStrategy::Character
    };

    let new_values: Vec<&str> = new_text.graphemes(true).collect();

    let inheritance = match strategy {
        MorphStrategy::Character => character_inheritance(old_tokens, &new_values),
        MorphStrategy::Word => word_inheritance(old_tokens, &old_text, new_text, &new_values),
    };

    assemble(old_tokens, &new_values, &inheritance)
}

/// Morph strategy, picked once per call.
enum MorphStrategy {
    Character,
    Word,
}

/// Which old token each new position inherits from, plus the set of old
/// positions that found a counterpart.
#[derive(Default)]
struct Inheritance {
    new_to_old: HashMap<usize, usize>,
    matched_old: HashSet<usize>,
}

fn character_inheritance(old_tokens: &[Token], new_values: &[&str]) -> Inheritance {
    let old_values: Vec<&str> = old_tokens.iter().map(|t| t.value.as_str()).collect();
    let mut inheritance = Inheritance::default();
    for (old_index, new_index) in lcs(&old_values, new_values) {
        inheritance.new_to_old.insert(new_index, old_index);
        inheritance.matched_old.insert(old_index);
    }
    inheritance
}

fn word_inheritance(
    old_tokens: &[Token],
    old_text: &str,
    new_text: &str,
    new_values: &[&str],
) -> Inheritance {
    let old_words: Vec<&str> = old_text.split(SEPARATOR).collect();
    let new_words: Vec<&str> = new_text.split(SEPARATOR).collect();
    let old_values: Vec<&str> = old_tokens.iter().map(|t| t.value.as_str()).collect();

    let old_starts = word_starts(&old_words);
    let new_starts = word_starts(&new_words);

    let mut inheritance = Inheritance::default();
    let mut prev_old_end = 0;
    let mut prev_new_end = 0;

    for (old_word, new_word) in lcs(&old_words, &new_words) {
        let old_start = old_starts[old_word];
        let new_start = new_starts[new_word];

        // Characters between the previous matched word and this one get a
        // second chance at identity via a character-level pass.
        if prev_old_end < old_start && prev_new_end < new_start {
            match_gap(
                &old_values,
                new_values,
                prev_old_end..old_start,
                prev_new_end..new_start,
                &mut inheritance,
            );
        }

        // LCS-matched words are equal, so offsets align trivially.
        let word_len = old_words[old_word].graphemes(true).count();
        for offset in 0..word_len {
            inheritance
                .new_to_old
                .insert(new_start + offset, old_start + offset);
            inheritance.matched_old.insert(old_start + offset);
        }

        prev_old_end = old_start + word_len;
        prev_new_end = new_start + word_len;
    }

    if prev_old_end < old_tokens.len() && prev_new_end < new_values.len() {
        match_gap(
            &old_values,
            new_values,
            prev_old_end..old_tokens.len(),
            prev_new_end..new_values.len(),
            &mut inheritance,
        );
    }

    inheritance
}

/// Character-level matching over one old/new sub-range.
fn match_gap(
    old_values: &[&str],
    new_values: &[&str],
    old_range: std::ops::Range<usize>,
    new_range: std::ops::Range<usize>,
    inheritance: &mut Inheritance,
) {
    let matches = lcs(&old_values[old_range.clone()], &new_values[new_range.clone()]);
    for (gap_old, gap_new) in matches {
        inheritance
            .new_to_old
            .insert(new_range.start + gap_new, old_range.start + gap_old);
        inheritance.matched_old.insert(old_range.start + gap_old);
    }
}

/// Starting grapheme index of each word, accounting for the separators
/// between them.
fn word_starts(words: &[&str]) -> Vec<usize> {
    let mut starts = Vec::with_capacity(words.len());
    let mut pos = 0;
    for (i, word) in words.iter().enumerate() {
        starts.push(pos);
        pos += word.graphemes(true).count();
        if i < words.len() - 1 {
            pos += 1;
        }
    }
    starts
}

/// Build the new token sequence and the classification from an inheritance
/// map. Unmatched new positions receive synthetic ids from an explicit
/// counter, probing past any tag already claimed by an inherited identity.
fn assemble(
    old_tokens: &[Token],
    new_values: &[&str],
    inheritance: &Inheritance,
) -> (Vec<Token>, DiffOutcome) {
    let inherited_ids: HashSet<&str> = inheritance
        .new_to_old
        .values()
        .map(|&old_index| old_tokens[old_index].id.as_str())
        .collect();

    let mut new_tokens = Vec::with_capacity(new_values.len());
    let mut persisted = Vec::new();
    let mut entering = Vec::new();
    let mut next_id = 0usize;

    for (index, value) in new_values.iter().enumerate() {
        if let Some(&old_index) = inheritance.new_to_old.get(&index) {
            let old_token = &old_tokens[old_index];
            let token = Token::new(old_token.id.clone(), *value, index);
            persisted.push(AlignedPair {
                old: old_token.clone(),
                new: token.clone(),
            });
            new_tokens.push(token);
        } else {
            while inherited_ids.contains(format!("n{next_id}").as_str()) {
                next_id += 1;
            }
            let token = Token::new(format!("n{next_id}"), *value, index);
            next_id += 1;
            entering.push(token.clone());
            new_tokens.push(token);
        }
    }

    let exiting: Vec<Token> = old_tokens
        .iter()
        .filter(|t| !inheritance.matched_old.contains(&t.index))
        .cloned()
        .collect();

    let change_magnitude = change_magnitude(
        entering.len(),
        exiting.len(),
        old_tokens.len(),
        new_tokens.len(),
    );

    let outcome = DiffOutcome {
        persisted,
        entering,
        exiting,
        change_magnitude,
    };

    (new_tokens, outcome)
}

fn change_magnitude(entering: usize, exiting: usize, old_len: usize, new_len: usize) -> f32 {
    let max_len = old_len.max(new_len);
    if max_len == 0 {
        return 0.0;
    }
    (((entering + exiting) as f32) / (max_len as f32)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::{segment, segment_by_position};

    #[test]
    fn test_identity_diff_idempotent() {
        let tokens = segment("hello");
        let outcome = diff(&tokens, &tokens);
        assert_eq!(outcome.persisted.len(), 5);
        assert!(outcome.entering.is_empty());
        assert!(outcome.exiting.is_empty());
        assert_eq!(outcome.change_magnitude, 0.0);
    }

    #[test]
    fn test_identity_diff_full_replacement() {
        let old = segment("abc");
        let new = segment("xyz");
        let outcome = diff(&old, &new);
        assert!(outcome.persisted.is_empty());
        assert_eq!(outcome.entering.len(), 3);
        assert_eq!(outcome.exiting.len(), 3);
        assert_eq!(outcome.change_magnitude, 1.0);
    }

    #[test]
    fn test_identity_diff_empty_both_sides() {
        let outcome = diff(&[], &[]);
        assert_eq!(outcome.change_magnitude, 0.0);
        assert!(outcome.persisted.is_empty());
    }

    #[test]
    fn test_identity_diff_positional_same_length() {
        // "12" -> "13" under positional ids: both slots persist even though
        // the second value changed.
        let old = segment_by_position("12");
        let new = segment_by_position("13");
        let outcome = diff(&old, &new);
        assert_eq!(outcome.persisted.len(), 2);
        assert!(outcome.entering.is_empty());
        assert!(outcome.exiting.is_empty());
        assert_eq!(outcome.persisted[1].old.value, "2");
        assert_eq!(outcome.persisted[1].new.value, "3");
    }

    #[test]
    fn test_identity_diff_positional_unequal_length() {
        let old = segment_by_position("99");
        let new = segment_by_position("100");
        let outcome = diff(&old, &new);
        assert_eq!(outcome.persisted.len(), 2);
        assert_eq!(outcome.entering.len(), 1);
        assert_eq!(outcome.entering[0].id, "p2");
        assert!(outcome.exiting.is_empty());
    }

    #[test]
    fn test_character_morph_cat_to_bat() {
        let old = segment("cat");
        let (new_tokens, outcome) = morph_diff(&old, "bat");

        assert_eq!(sequence_text(&new_tokens), "bat");
        assert_eq!(outcome.persisted.len(), 2);
        assert_eq!(outcome.persisted[0].old.value, "a");
        assert_eq!(outcome.persisted[0].new.index, 1);
        assert_eq!(outcome.persisted[1].old.value, "t");

        assert_eq!(outcome.entering.len(), 1);
        assert_eq!(outcome.entering[0].value, "b");
        assert_eq!(outcome.entering[0].index, 0);

        assert_eq!(outcome.exiting.len(), 1);
        assert_eq!(outcome.exiting[0].value, "c");

        assert!((outcome.change_magnitude - 2.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_morph_inherits_old_id_onto_new_value() {
        // Matched characters keep the old identity even at a new position.
        let old = segment("cat");
        let (new_tokens, _) = morph_diff(&old, "cart");
        let a_old = &old[1];
        let a_new = new_tokens.iter().find(|t| t.value == "a").unwrap();
        assert_eq!(a_new.id, a_old.id);
    }

    #[test]
    fn test_synthetic_ids_skip_inherited_tags() {
        // An old sequence that already carries a synthetic "n0" (from a
        // previous morph) must not mint a colliding "n0".
        let old = vec![
            Token::new("n0", "x", 0),
            Token::new("y", "y", 1),
        ];
        let (new_tokens, outcome) = morph_diff(&old, "xz");
        // 'x' persists under "n0"; 'z' enters and must skip that tag.
        assert_eq!(new_tokens[0].id, "n0");
        assert_eq!(outcome.entering.len(), 1);
        assert_eq!(outcome.entering[0].id, "n1");
    }

    #[test]
    fn test_partition_completeness_morph() {
        let old = segment("sphinx");
        let (new_tokens, outcome) = morph_diff(&old, "spin");

        let persisted_new: HashSet<&str> =
            outcome.persisted.iter().map(|p| p.new.id.as_str()).collect();
        let entering: HashSet<&str> = outcome.entering.iter().map(|t| t.id.as_str()).collect();
        for token in &new_tokens {
            assert!(persisted_new.contains(token.id.as_str()) ^ entering.contains(token.id.as_str()));
        }

        let persisted_old: HashSet<&str> =
            outcome.persisted.iter().map(|p| p.old.id.as_str()).collect();
        let exiting: HashSet<&str> = outcome.exiting.iter().map(|t| t.id.as_str()).collect();
        for token in &old {
            assert!(persisted_old.contains(token.id.as_str()) ^ exiting.contains(token.id.as_str()));
        }
    }

    #[test]
    fn test_word_level_keeps_matched_words_stable() {
        let old = segment("hello brave world");
        let (new_tokens, outcome) = morph_diff(&old, "hello new world");

        // Every character of the two matched words keeps its identity.
        for (offset, value) in "hello".graphemes(true).enumerate() {
            assert_eq!(new_tokens[offset].id, old[offset].id);
            assert_eq!(new_tokens[offset].value, value);
        }
        let old_world_start = "hello brave ".graphemes(true).count();
        let new_world_start = "hello new ".graphemes(true).count();
        for offset in 0.."world".len() {
            assert_eq!(
                new_tokens[new_world_start + offset].id,
                old[old_world_start + offset].id
            );
        }
        assert!(!outcome.persisted.is_empty());
        assert!(outcome.change_magnitude > 0.0);
    }

    #[test]
    fn test_word_level_morphs_characters_inside_gaps() {
        // "brave" -> "grave": the edited word is a gap between two matched
        // words, and its shared characters keep identity via the recursive
        // character pass.
        let old = segment("a brave x");
        let (new_tokens, _) = morph_diff(&old, "a grave x");

        let old_r = old.iter().find(|t| t.value == "r").unwrap();
        let new_r = new_tokens.iter().find(|t| t.value == "r").unwrap();
        assert_eq!(new_r.id, old_r.id);
    }

    #[test]
    fn test_word_level_tail_gap() {
        let old = segment("count 12");
        let (new_tokens, outcome) = morph_diff(&old, "count 13");
        // "count" and the separator-adjacent '1' persist; only '2' -> '3'
        // churns.
        assert_eq!(outcome.entering.len(), 1);
        assert_eq!(outcome.entering[0].value, "3");
        assert_eq!(outcome.exiting.len(), 1);
        assert_eq!(outcome.exiting[0].value, "2");
        assert_eq!(sequence_text(&new_tokens), "count 13");
    }

    #[test]
    fn test_morph_diff_from_empty() {
        let (new_tokens, outcome) = morph_diff(&[], "hi");
        assert_eq!(new_tokens.len(), 2);
        assert_eq!(outcome.entering.len(), 2);
        assert!(outcome.exiting.is_empty());
        assert_eq!(outcome.change_magnitude, 1.0);
    }

    #[test]
    fn test_morph_diff_to_empty() {
        let old = segment("hi");
        let (new_tokens, outcome) = morph_diff(&old, "");
        assert!(new_tokens.is_empty());
        assert_eq!(outcome.exiting.len(), 2);
        assert_eq!(outcome.change_magnitude, 1.0);
    }
}
