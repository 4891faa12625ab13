//! Fuzzy string similarity scorers
//!
//! RapidFuzz-style scorers on a 0-100 scale, built on strsim's normalized
//! Levenshtein. Numeric parity with RapidFuzz is not a goal; the relative
//! ordering of candidates is what matters.

use std::collections::BTreeSet;

use strsim::normalized_levenshtein;

/// Plain edit-distance similarity, 0-100
pub fn ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * 100.0
}

/// Best alignment of the shorter string against a window of the longer one.
///
/// Rewards a short query that appears nearly verbatim inside a long
/// description.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let (shorter, longer) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };

    let short_len = shorter.chars().count();
    let long_chars: Vec<char> = longer.chars().collect();
    if short_len == 0 || short_len == long_chars.len() {
        return ratio(shorter, longer);
    }

    let mut best = 0.0_f64;
    for start in 0..=(long_chars.len() - short_len) {
        let window: String = long_chars[start..start + short_len].iter().collect();
        let score = ratio(shorter, &window);
        if score > best {
            best = score;
            if best >= 100.0 {
                break;
            }
        }
    }
    best
}

/// Similarity after sorting tokens, insensitive to word order
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Token-set similarity, insensitive to word order and duplicate tokens.
///
/// Compares the shared-token core against each side's full token set and
/// takes the best of the three pairings.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let set_a: BTreeSet<&str> = a.split_whitespace().collect();
    let set_b: BTreeSet<&str> = b.split_whitespace().collect();
    if set_a.is_empty() || set_b.is_empty() {
        return ratio(a, b);
    }

    let core = join(set_a.intersection(&set_b));
    let only_a = join(set_a.difference(&set_b));
    let only_b = join(set_b.difference(&set_a));

    let full_a = concat_parts(&core, &only_a);
    let full_b = concat_parts(&core, &only_b);

    ratio(&core, &full_a)
        .max(ratio(&core, &full_b))
        .max(ratio(&full_a, &full_b))
}

/// WRatio-style holistic similarity.
///
/// Blends the plain ratio with token-based scorers, and leans on the partial
/// scorer when the strings differ a lot in length.
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    let base = ratio(a, b);

    let len_a = a.chars().count().max(1) as f64;
    let len_b = b.chars().count().max(1) as f64;
    let len_ratio = len_a.max(len_b) / len_a.min(len_b);

    // Token scorers never fully override the plain ratio
    const TOKEN_SCALE: f64 = 0.95;

    if len_ratio < 1.5 {
        return base
            .max(token_sort_ratio(a, b) * TOKEN_SCALE)
            .max(token_set_ratio(a, b) * TOKEN_SCALE);
    }

    let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
    base.max(partial_ratio(a, b) * partial_scale)
        .max(token_sort_ratio(a, b) * TOKEN_SCALE * partial_scale)
        .max(token_set_ratio(a, b) * TOKEN_SCALE * partial_scale)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

fn join<'a, I: Iterator<Item = &'a &'a str>>(iter: I) -> String {
    iter.copied().collect::<Vec<_>>().join(" ")
}

fn concat_parts(core: &str, rest: &str) -> String {
    match (core.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (_, true) => core.to_string(),
        _ => format!("{} {}", core, rest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_identical() {
        assert_eq!(ratio("grilled chicken", "grilled chicken"), 100.0);
    }

    #[test]
    fn test_ratio_disjoint() {
        assert!(ratio("zzz", "chicken") < 15.0);
    }

    #[test]
    fn test_ratio_empty_both() {
        assert_eq!(ratio("", ""), 100.0);
    }

    #[test]
    fn test_partial_substring() {
        // Short query embedded in a long description scores near 100
        assert!(partial_ratio("salmon", "grilled atlantic salmon with rice") >= 99.0);
    }

    #[test]
    fn test_token_sort_order_insensitive() {
        assert_eq!(token_sort_ratio("chicken grilled", "grilled chicken"), 100.0);
    }

    #[test]
    fn test_token_set_duplicate_insensitive() {
        assert_eq!(
            token_set_ratio("chicken chicken salad", "salad chicken"),
            100.0
        );
    }

    #[test]
    fn test_weighted_ratio_prefers_close_match() {
        let query = "grilled chicken salad";
        let good = weighted_ratio("grilled chicken salad", query);
        let bad = weighted_ratio("chicken tikka masala", query);
        assert!(good > bad, "good={good} bad={bad}");
    }

    #[test]
    fn test_scores_within_scale() {
        for (a, b) in [
            ("grilled chicken", "chicken grilled"),
            ("a", "grilled atlantic salmon"),
            ("", "x"),
        ] {
            for f in [ratio, partial_ratio, token_sort_ratio, token_set_ratio, weighted_ratio] {
                let s = f(a, b);
                assert!((0.0..=100.0).contains(&s), "{a:?} vs {b:?} gave {s}");
            }
        }
    }
}
