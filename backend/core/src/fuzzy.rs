//! Fuzzy string similarity on a 0–100 scale.
//!
//! `ratio` is the normalized indel similarity `2 * LCS / (|a| + |b|)`.
//! `partial_ratio` slides the shorter string across the longer one (including
//! partial overlaps at both ends) and keeps the best window ratio, so a drug
//! name embedded in a longer OCR line still scores high.
//!
//! Both functions are pure: identical inputs always give identical scores.
//! Comparison is by Unicode scalar value and is case-sensitive.

use std::collections::HashMap;

/// Indel similarity of two strings, 0–100. Two empty strings score 100.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    ratio_chars(&a, &b)
}

/// Best-window similarity of the shorter string against the longer one, 0–100.
///
/// Two empty strings score 100; one empty string scores 0.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    if a.len() < b.len() {
        best_alignment(&a, &b)
    } else if a.len() > b.len() {
        best_alignment(&b, &a)
    } else {
        best_alignment(&a, &b).max(best_alignment(&b, &a))
    }
}

fn ratio_chars(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }
    let lcs = lcs_dp(a, b);
    200.0 * lcs as f64 / total as f64
}

/// Max ratio of `needle` against every window of `haystack` of the needle's
/// length, plus the shorter prefix and suffix windows. Requires
/// `needle.len() <= haystack.len()`.
fn best_alignment(needle: &[char], haystack: &[char]) -> f64 {
    let n = needle.len();
    let m = haystack.len();
    let lcs = LcsScorer::new(needle);
    let score = |window: &[char]| 200.0 * lcs.score(window) as f64 / (n + window.len()) as f64;

    let mut best = 0.0_f64;

    // Full-length windows.
    for start in 0..=(m - n) {
        best = best.max(score(&haystack[start..start + n]));
        if best >= 100.0 {
            return 100.0;
        }
    }
    // Prefixes and suffixes shorter than the needle.
    for len in 1..n {
        best = best.max(score(&haystack[..len]));
        best = best.max(score(&haystack[m - len..]));
    }
    best
}

/// LCS length against a fixed pattern.
///
/// Patterns of up to 64 chars use the bit-parallel algorithm (one machine word
/// per text char); longer patterns fall back to the quadratic DP.
enum LcsScorer<'a> {
    BitParallel { masks: HashMap<char, u64>, len: usize },
    Dp(&'a [char]),
}

impl<'a> LcsScorer<'a> {
    fn new(pattern: &'a [char]) -> Self {
        if pattern.len() > 64 {
            return LcsScorer::Dp(pattern);
        }
        let mut masks: HashMap<char, u64> = HashMap::new();
        for (i, &c) in pattern.iter().enumerate() {
            *masks.entry(c).or_insert(0) |= 1u64 << i;
        }
        LcsScorer::BitParallel {
            masks,
            len: pattern.len(),
        }
    }

    fn score(&self, text: &[char]) -> usize {
        match self {
            LcsScorer::BitParallel { masks, len } => {
                let mut s = u64::MAX;
                for c in text {
                    if let Some(&pm) = masks.get(c) {
                        let u = s & pm;
                        s = s.wrapping_add(u) | s.wrapping_sub(u);
                    }
                }
                let used = if *len == 64 { u64::MAX } else { (1u64 << len) - 1 };
                (!s & used).count_ones() as usize
            }
            LcsScorer::Dp(pattern) => lcs_dp(pattern, text),
        }
    }
}

fn lcs_dp(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            cur[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                cur[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(ratio("ibuprofen", "ibuprofen"), 100.0);
        assert_eq!(partial_ratio("ibuprofen", "ibuprofen"), 100.0);
    }

    #[test]
    fn substring_scores_100() {
        assert_eq!(partial_ratio("amox", "amoxicillin"), 100.0);
        assert_eq!(partial_ratio("take ibuprofen daily", "ibuprofen"), 100.0);
    }

    #[test]
    fn misspelled_label_still_matches() {
        let score = partial_ratio("paracetmol 500mg", "paracetamol");
        assert!(score >= 90.0, "score was {score}");
        assert!(score < 100.0);
    }

    #[test]
    fn unrelated_strings_score_low() {
        assert!(partial_ratio("zzzz", "paracetamol") < 70.0);
    }

    #[test]
    fn empty_inputs() {
        assert_eq!(partial_ratio("", ""), 100.0);
        assert_eq!(partial_ratio("", "paracetamol"), 0.0);
        assert_eq!(partial_ratio("paracetamol", ""), 0.0);
        assert_eq!(ratio("", ""), 100.0);
        assert_eq!(ratio("", "abc"), 0.0);
    }

    #[test]
    fn scorer_is_symmetric_and_deterministic() {
        let a = "metformin 850 mg tablets";
        let b = "metformin";
        let first = partial_ratio(a, b);
        assert_eq!(first, partial_ratio(b, a));
        assert_eq!(first, partial_ratio(a, b));
    }

    #[test]
    fn ratio_matches_indel_formula() {
        // LCS("kitten", "sitting") = 4 -> 2*4/13
        let expected = 800.0 / 13.0;
        assert!((ratio("kitten", "sitting") - expected).abs() < 1e-9);
    }

    #[test]
    fn bit_parallel_agrees_with_dp() {
        let cases = [
            ("paracetamol", "paracetmol 500mg"),
            ("abcabcabc", "cbacbacba"),
            ("aaaa", "aaaaaaaa"),
            ("ibuprofen", "ib u pro fen"),
            ("", "xyz"),
        ];
        for (p, t) in cases {
            let p = chars(p);
            let t = chars(t);
            assert_eq!(LcsScorer::new(&p).score(&t), lcs_dp(&p, &t));
        }
    }

    #[test]
    fn long_patterns_use_dp_fallback() {
        let long = "x".repeat(80) + "ibuprofen";
        let hay = "y".repeat(10) + &long + "z";
        assert_eq!(partial_ratio(&long, &hay), 100.0);
    }
}
