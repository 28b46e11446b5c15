//! Generic longest-common-subsequence alignment.
//!
//! Produces the match list the diff engine builds identity inheritance on.
//! The reconstruction tie-break is part of the contract: when several
//! optimal alignments exist, which elements count as inserted vs deleted
//! must be reproducible, because downstream animation choices hang off it.

/// Longest common subsequence of two slices as `(old_index, new_index)`
/// pairs, strictly increasing in both coordinates.
///
/// Classic O(m·n) prefix table. The backward walk steps diagonally on an
/// equal pair; otherwise it retreats the old index only when its
/// contribution strictly exceeds the new side's (`dp[i-1][j] > dp[i][j-1]`),
/// and retreats the new index on ties.
pub fn lcs<T: PartialEq>(old: &[T], new: &[T]) -> Vec<(usize, usize)> {
    let (m, n) = (old.len(), new.len());
    if m == 0 || n == 0 {
        return Vec::new();
    }

    let mut dp = vec![vec![0usize; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            dp[i][j] = if old[i - 1] == new[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut matches = Vec::with_capacity(dp[m][n]);
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        if old[i - 1] == new[j - 1] {
            matches.push((i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] > dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    matches.reverse();
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_empty_inputs() {
        assert!(lcs::<char>(&[], &[]).is_empty());
        assert!(lcs(&chars("abc"), &[]).is_empty());
        assert!(lcs(&[], &chars("abc")).is_empty());
    }

    #[test]
    fn test_identical_sequences_match_everywhere() {
        let s = chars("abc");
        assert_eq!(lcs(&s, &s), vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn test_disjoint_sequences_match_nowhere() {
        assert!(lcs(&chars("abc"), &chars("xyz")).is_empty());
    }

    #[test]
    fn test_single_substitution() {
        // "cat" -> "bat": 'a' and 't' survive.
        assert_eq!(lcs(&chars("cat"), &chars("bat")), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn test_monotonic_in_both_coordinates() {
        let matches = lcs(&chars("abcbdab"), &chars("bdcaba"));
        for w in matches.windows(2) {
            assert!(w[0].0 < w[1].0);
            assert!(w[0].1 < w[1].1);
        }
    }

    #[test]
    fn test_tie_break_is_reproducible() {
        // "ab" vs "ba" has two optimal alignments of length 1. The contract
        // retreats the new index on ties, which lands on matching 'b'.
        assert_eq!(lcs(&chars("ab"), &chars("ba")), vec![(1, 0)]);
        // Symmetric shape with the roles flipped.
        assert_eq!(lcs(&chars("ba"), &chars("ab")), vec![(1, 0)]);
    }

    #[test]
    fn test_works_over_words() {
        let old = vec!["the", "quick", "fox"];
        let new = vec!["the", "slow", "fox"];
        assert_eq!(lcs(&old, &new), vec![(0, 0), (2, 2)]);
    }
}
