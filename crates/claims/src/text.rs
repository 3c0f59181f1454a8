use std::collections::BTreeSet;
use unicode_segmentation::UnicodeSegmentation;

/// Collapse every whitespace run to one space and trim the ends
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Key used to compare claim texts: lower-cased words, punctuation dropped
#[must_use]
pub fn comparison_key(text: &str) -> String {
    text.unicode_words()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Jaccard similarity of the word sets of two comparison keys
#[must_use]
pub fn token_set_similarity(a: &str, b: &str) -> f64 {
    let left: BTreeSet<&str> = a.split_whitespace().collect();
    let right: BTreeSet<&str> = b.split_whitespace().collect();
    if left.is_empty() && right.is_empty() {
        return 1.0;
    }
    let shared = left.intersection(&right).count();
    let union = left.union(&right).count();
    shared as f64 / union as f64
}

/// A sentence and the byte offset where it starts in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub text: &'a str,
    pub start: usize,
}

impl Sentence<'_> {
    /// Zero-based line offset of the sentence start within `source`
    #[must_use]
    pub fn line_offset(&self, source: &str) -> usize {
        source[..self.start].matches('\n').count()
    }
}

const ABBREVIATIONS: &[&str] = &[
    "al", "e.g", "i.e", "cf", "vs", "fig", "eq", "eqs", "no", "dr", "pp", "vol", "ch", "sec",
    "approx", "resp", "etc", "ref", "refs",
];

/// Split prose into sentences
///
/// Breaks after `.`, `!` or `?` followed by whitespace, and at blank lines. Common
/// abbreviations (`et al.`, `e.g.`, `Fig.`) and single-letter initials do not end a
/// sentence; decimals and DOIs never do because no whitespace follows their dots.
#[must_use]
pub fn sentences(text: &str) -> Vec<Sentence<'_>> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let bytes = text.as_bytes();
    let mut idx = 0usize;

    while idx < bytes.len() {
        let b = bytes[idx];
        let boundary_end = if matches!(b, b'.' | b'!' | b'?') {
            let next = bytes.get(idx + 1).copied();
            let followed_by_space = next.map_or(true, |n| n.is_ascii_whitespace());
            (followed_by_space && !ends_with_abbreviation(&text[start..idx], b))
                .then_some(idx + 1)
        } else if b == b'\n' && is_blank_line_break(bytes, idx) {
            Some(idx)
        } else {
            None
        };

        if let Some(end) = boundary_end {
            push_trimmed(text, start, end, &mut out);
            start = end;
        }
        idx += 1;
    }
    push_trimmed(text, start, text.len(), &mut out);
    out
}

fn is_blank_line_break(bytes: &[u8], newline: usize) -> bool {
    let mut idx = newline + 1;
    while let Some(&b) = bytes.get(idx) {
        match b {
            b'\n' => return true,
            b' ' | b'\t' | b'\r' => idx += 1,
            _ => return false,
        }
    }
    false
}

fn ends_with_abbreviation(before: &str, terminator: u8) -> bool {
    if terminator != b'.' {
        return false;
    }
    let word = before
        .rsplit(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    if word.chars().count() == 1 && word.chars().all(char::is_uppercase) {
        return true;
    }
    let lowered = word.to_lowercase();
    ABBREVIATIONS.contains(&lowered.as_str())
}

fn push_trimmed<'a>(text: &'a str, start: usize, end: usize, out: &mut Vec<Sentence<'a>>) {
    let slice = &text[start..end];
    let trimmed_start = slice.len() - slice.trim_start().len();
    let trimmed = slice.trim();
    if !trimmed.is_empty() {
        out.push(Sentence {
            text: trimmed,
            start: start + trimmed_start,
        });
    }
}
