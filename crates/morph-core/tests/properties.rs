//! Property-based tests for tokenization, alignment, and diff classification.
//!
//! Uses proptest to verify the partition and alignment invariants the
//! animation layer depends on: every token lands in exactly one class, LCS
//! output is monotone and a valid common subsequence, and synthetic ids
//! never collide with inherited ones.

use std::collections::HashSet;

use morph_core::{diff, lcs, morph_diff, segment, segment_by_position, sequence_text};
use proptest::prelude::*;

/// Short alphanumeric texts with spaces, the engine's typical input.
fn text_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9 ]{0,16}"
}

/// Texts without separators, forcing the character-level strategy.
fn wordless_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{0,12}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Segmentation is dense, ordered, and unique-id.
    #[test]
    fn segmentation_well_formed(text in text_strategy()) {
        for tokens in [segment(&text), segment_by_position(&text)] {
            for (i, token) in tokens.iter().enumerate() {
                prop_assert_eq!(token.index, i);
            }
            let ids: HashSet<&str> = tokens.iter().map(|t| t.id.as_str()).collect();
            prop_assert_eq!(ids.len(), tokens.len());
            prop_assert_eq!(sequence_text(&tokens), text.clone());
        }
    }

    /// LCS pairs are strictly increasing in both coordinates and equal at
    /// every matched index.
    #[test]
    fn lcs_monotone_common_subsequence(a in text_strategy(), b in text_strategy()) {
        let old: Vec<char> = a.chars().collect();
        let new: Vec<char> = b.chars().collect();
        let matches = lcs(&old, &new);
        for (oi, ni) in &matches {
            prop_assert_eq!(old[*oi], new[*ni]);
        }
        for w in matches.windows(2) {
            prop_assert!(w[0].0 < w[1].0);
            prop_assert!(w[0].1 < w[1].1);
        }
    }

    /// Identity diff partitions both sequences completely.
    #[test]
    fn identity_diff_partitions(a in text_strategy(), b in text_strategy()) {
        let old = segment(&a);
        let new = segment(&b);
        let outcome = diff(&old, &new);

        prop_assert_eq!(outcome.persisted.len() + outcome.entering.len(), new.len());
        prop_assert_eq!(outcome.persisted.len() + outcome.exiting.len(), old.len());
        prop_assert!(outcome.change_magnitude >= 0.0);
        prop_assert!(outcome.change_magnitude <= 1.0);
    }

    /// Diffing a sequence against itself persists everything.
    #[test]
    fn identity_diff_idempotent(text in text_strategy()) {
        let tokens = segment(&text);
        let outcome = diff(&tokens, &tokens);
        prop_assert_eq!(outcome.persisted.len(), tokens.len());
        prop_assert!(outcome.entering.is_empty());
        prop_assert!(outcome.exiting.is_empty());
        prop_assert_eq!(outcome.change_magnitude, 0.0);
    }

    /// The morph diff rebuilds the new text exactly and partitions both
    /// sequences, with unique ids in the output.
    #[test]
    fn morph_diff_partitions(a in text_strategy(), b in text_strategy()) {
        let old = segment(&a);
        let (new_tokens, outcome) = morph_diff(&old, &b);

        prop_assert_eq!(sequence_text(&new_tokens), b.clone());
        prop_assert_eq!(outcome.persisted.len() + outcome.entering.len(), new_tokens.len());
        prop_assert_eq!(outcome.persisted.len() + outcome.exiting.len(), old.len());

        let ids: HashSet<&str> = new_tokens.iter().map(|t| t.id.as_str()).collect();
        prop_assert_eq!(ids.len(), new_tokens.len());
    }

    /// Synthetic ids never collide with inherited ids, even across chained
    /// morphs whose inputs already carry synthetic tags.
    #[test]
    fn synthetic_ids_stay_unique(a in wordless_strategy(), b in wordless_strategy(), c in wordless_strategy()) {
        let first = segment(&a);
        let (second, _) = morph_diff(&first, &b);
        let (third, outcome) = morph_diff(&second, &c);

        let inherited: HashSet<&str> = outcome.persisted.iter().map(|p| p.new.id.as_str()).collect();
        for token in &outcome.entering {
            prop_assert!(!inherited.contains(token.id.as_str()));
        }
        let ids: HashSet<&str> = third.iter().map(|t| t.id.as_str()).collect();
        prop_assert_eq!(ids.len(), third.len());
    }

    /// Morphing a text onto itself is a pure persist.
    #[test]
    fn morph_diff_self_is_stable(text in text_strategy()) {
        let old = segment(&text);
        let (new_tokens, outcome) = morph_diff(&old, &text);
        prop_assert_eq!(new_tokens.len(), old.len());
        prop_assert!(outcome.entering.is_empty());
        prop_assert!(outcome.exiting.is_empty());
        prop_assert_eq!(outcome.change_magnitude, 0.0);
    }
}
