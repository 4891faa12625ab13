//! Text normalization for dish matching
//!
//! Canonicalizes free text (case, accents, punctuation, known aliases) into a
//! comparable token form. Total over any input, including empty strings and
//! non-ASCII text.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Common dish-name misspellings and synonyms, applied in order.
///
/// Each pair rewrites whole-word occurrences of the left side to the right
/// side; later entries see text already rewritten by earlier ones.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("chiken", "chicken"),
    ("chikken", "chicken"),
    ("panner", "paneer"),
    ("biriyani", "biryani"),
    ("briyani", "biryani"),
    ("spagetti", "spaghetti"),
    ("omlet", "omelette"),
    ("omelet", "omelette"),
    ("yoghurt", "yogurt"),
    ("cheeze", "cheese"),
    ("burguer", "burger"),
    ("sandwhich", "sandwich"),
    ("maccaroni", "macaroni"),
    ("pizzah", "pizza"),
];

/// Canonicalizes dish text against an ordered alias table
#[derive(Debug, Clone)]
pub struct Normalizer {
    aliases: &'static [(&'static str, &'static str)],
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_ALIASES)
    }
}

impl Normalizer {
    /// Create a normalizer with an explicit alias table
    pub fn new(aliases: &'static [(&'static str, &'static str)]) -> Self {
        Self { aliases }
    }

    /// Canonicalize text: lowercase, strip accents, drop punctuation,
    /// collapse whitespace, then apply the alias table word-by-word.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = text.trim().to_lowercase();

        // NFKD decomposition, drop combining marks, punctuation becomes space
        let cleaned: String = lowered
            .nfkd()
            .filter(|c| !is_combining_mark(*c))
            .map(|c| {
                if is_word_char(c) || c.is_whitespace() {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        let mut result = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

        for (bad, good) in self.aliases {
            result = replace_whole_word(&result, bad, good);
        }

        result
    }

    /// Normalized text split on whitespace; empty for empty/blank input
    pub fn tokens(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

/// Word characters survive punctuation removal and bound alias matches
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Replace whole-word occurrences of `from` with `to`.
///
/// A match counts only when the characters on both sides are absent or
/// non-word, so an alias embedded in a larger word is left alone.
fn replace_whole_word(text: &str, from: &str, to: &str) -> String {
    if from.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while let Some(pos) = text[i..].find(from) {
        let start = i + pos;
        let end = start + from.len();
        let before_ok = text[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !is_word_char(c));
        let after_ok = text[end..]
            .chars()
            .next()
            .map_or(true, |c| !is_word_char(c));

        out.push_str(&text[i..start]);
        if before_ok && after_ok {
            out.push_str(to);
        } else {
            out.push_str(&text[start..end]);
        }
        i = end;
    }
    out.push_str(&text[i..]);
    out
}
