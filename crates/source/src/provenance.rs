//! Provenance classification for docstring sentences.
//!
//! A sentence becomes a claim when it says where an algorithm comes from
//! ("based on", "adapted from", "implements ... from") or when it cites or names a
//! known algorithm without saying so.

use claimscan_claims::{
    collapse_whitespace, sentences, CitationDetector, CitationMatch, ClaimKind, Confidence,
};
use once_cell::sync::Lazy;
use regex::Regex;

/// Verbs that assert provenance on their own
static STRONG_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:implements?|implementation of|implemented (?:as|after|following|per|from)|based on|adapted from|derived from|inspired by|ported from|taken from|reproduces|as (?:described|proposed|presented|given|defined|introduced|outlined) (?:in|by))\b",
    )
    .expect("valid strong provenance regex")
});

/// Connectors that only count when a source follows them
static WEAK_CONNECTOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:from|per|following|see)\b").expect("valid connector regex"));

/// Connector separating the implemented thing from its source in "implements X from Y"
static SOURCE_CONNECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:from|in|by|after|following|per)\b").expect("valid connector regex")
});

static GENERIC_SOURCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:literature|prior (?:art|work)|previous work|existing work|related work|papers?|publications?|textbooks?|text ?books?|research|studies|surveys?|standard references?|references|folklore|classic(?:al)? (?:results?|approach(?:es)?)|common practice|standard practice|wikipedia|online sources?)\b",
    )
    .expect("valid generic source regex")
});

static ET_AL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][A-Za-z'\-]+\s+et\s+al\b").expect("valid et al regex"));

static POSSESSIVE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][A-Za-z\-]+(?:'s|’s)\s").expect("valid possessive regex"));

static QUOTED_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"["“][^"“”]{4,}["”]"#).expect("valid title regex"));

static CAPITALISED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+\b").expect("valid capitalised word regex"));

static NAMED_ALGORITHM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b((?:[A-Z][A-Za-z\-]+(?:'s|’s)?\s+)+)(?:algorithm|method|filter|transform|heuristic|scheme|estimator|decomposition|iteration|search|sort)\b",
    )
    .expect("valid named algorithm regex")
});

/// Capitalised words that never name a source or an algorithm's author
const NOT_NAMES: &[&str] = &[
    "The", "This", "That", "These", "Those", "A", "An", "Our", "Its", "Each", "Every", "Main",
    "New", "Simple", "Fast", "Basic", "Standard", "Default", "Custom", "Python", "Returns",
    "Uses", "Use", "Note", "See", "For", "With",
];

/// What a provenance phrase points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceClass {
    /// A citation, named author, or titled work
    Specific,
    /// "the literature", "prior work", "a textbook"
    Generic,
    /// Nothing identifiable
    Unnamed,
}

/// One claim-bearing sentence of a docstring
#[derive(Debug, Clone, PartialEq)]
pub struct ProvenanceMatch {
    pub kind: ClaimKind,
    pub confidence: Confidence,
    /// Whitespace-collapsed sentence
    pub text: String,
    /// Zero-based line offset of the sentence within the docstring
    pub line_offset: usize,
    pub citations: Vec<String>,
}

/// Classifies docstring sentences by how they attribute an algorithm
#[derive(Debug, Clone, Copy, Default)]
pub struct ProvenanceMatcher {
    citations: CitationDetector,
}

impl ProvenanceMatcher {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            citations: CitationDetector::new(),
        }
    }

    /// Every claim-bearing sentence of `doc`, in text order
    #[must_use]
    pub fn analyze(&self, doc: &str) -> Vec<ProvenanceMatch> {
        sentences(doc)
            .into_iter()
            .filter_map(|sentence| {
                let (kind, points) = self.classify(sentence.text)?;
                Some(ProvenanceMatch {
                    kind,
                    confidence: Confidence::from_points(points),
                    text: collapse_whitespace(sentence.text),
                    line_offset: sentence.line_offset(doc),
                    citations: self.citations.tokens(sentence.text),
                })
            })
            .collect()
    }

    /// Kind and confidence points for one sentence, or `None` when it makes no claim
    #[must_use]
    pub fn classify(&self, sentence: &str) -> Option<(ClaimKind, u32)> {
        let found = self.citations.detect(sentence);
        let strong = found.iter().any(CitationMatch::is_strong);
        let cited = !found.is_empty();

        if let Some(source) = provenance_source(sentence, cited) {
            let points = if strong {
                90
            } else {
                match source {
                    SourceClass::Specific => 80,
                    SourceClass::Generic => 60,
                    SourceClass::Unnamed => 50,
                }
            };
            return Some((ClaimKind::Implementation, points));
        }

        if strong {
            return Some((ClaimKind::AlgorithmReference, 90));
        }
        if cited {
            return Some((ClaimKind::AlgorithmReference, 80));
        }
        names_algorithm(sentence).then_some((ClaimKind::AlgorithmReference, 50))
    }
}

/// Source class of the provenance phrase in `sentence`, if there is one
///
/// A strong phrase always counts; a weak connector counts only when the text after
/// it names a specific or generic source.
fn provenance_source(sentence: &str, cited: bool) -> Option<SourceClass> {
    if let Some(phrase) = STRONG_PHRASE.find(sentence) {
        let tail = &sentence[phrase.end()..];
        let implements = phrase.as_str().to_ascii_lowercase().starts_with("implement");
        let source = if implements {
            // "implements X from Y": Y is the source, X the algorithm
            SOURCE_CONNECTOR
                .find(tail)
                .map_or(tail, |connector| &tail[connector.end()..])
        } else {
            tail
        };
        let class = classify_source(source, cited, true);
        // "implements Dijkstra's algorithm" names its origin in X
        if class == SourceClass::Unnamed && implements && source.len() != tail.len() {
            return Some(classify_source(tail, cited, true));
        }
        return Some(class);
    }

    WEAK_CONNECTOR
        .find_iter(sentence)
        .map(|connector| classify_source(&sentence[connector.end()..], cited, false))
        .find(|class| *class != SourceClass::Unnamed)
}

/// Classify the text a provenance phrase points at
///
/// Bare capitalised words only count after a strong phrase; after "from" they are
/// far more often identifiers or product names.
#[must_use]
pub fn classify_source(text: &str, cited: bool, allow_capitalised: bool) -> SourceClass {
    let specific = cited
        || ET_AL.is_match(text)
        || POSSESSIVE_NAME.is_match(text)
        || QUOTED_TITLE.is_match(text)
        || (allow_capitalised
            && CAPITALISED
                .find_iter(text)
                .any(|word| !NOT_NAMES.contains(&word.as_str())));
    if specific {
        SourceClass::Specific
    } else if GENERIC_SOURCE.is_match(text) {
        SourceClass::Generic
    } else {
        SourceClass::Unnamed
    }
}

fn names_algorithm(sentence: &str) -> bool {
    NAMED_ALGORITHM.captures_iter(sentence).any(|caps| {
        caps.get(1).is_some_and(|names| {
            names
                .as_str()
                .split_whitespace()
                .map(|word| word.trim_end_matches("'s").trim_end_matches("’s"))
                .any(|word| !NOT_NAMES.contains(&word))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classify(sentence: &str) -> Option<(ClaimKind, u32)> {
        ProvenanceMatcher::new().classify(sentence)
    }

    #[test]
    fn test_provenance_table() {
        use ClaimKind::{AlgorithmReference as Ref, Implementation as Impl};

        assert_eq!(classify("Based on the method in [4]."), Some((Impl, 90)));
        assert_eq!(
            classify("Adapted from Hartley and Zisserman (2004)."),
            Some((Impl, 80))
        );
        assert_eq!(
            classify("Implements the update rule from Kingma et al. without bias correction."),
            Some((Impl, 80))
        );
        assert_eq!(
            classify("adaptive gain scheduling from adaptive control literature"),
            Some((Impl, 60))
        );
        assert_eq!(classify("Implements a damped update."), Some((Impl, 50)));
        assert_eq!(classify("See doi:10.1137/0111030 for details."), Some((Impl, 90)));
        assert_eq!(classify("Step size rule of [12]."), Some((Ref, 90)));
        assert_eq!(classify("Follows arXiv:2101.00001 closely."), Some((Ref, 80)));
        assert_eq!(classify("Runs Dijkstra's algorithm on the grid."), Some((Ref, 50)));
        assert_eq!(classify("A Kalman filter smooths the estimate."), Some((Ref, 50)));
    }

    #[test]
    fn test_weak_connector_needs_a_source() {
        assert_eq!(classify("Load rows from the file."), None);
        assert_eq!(classify("Read settings from Config."), None);
        assert_eq!(classify("Return the value per request."), None);
        assert_eq!(
            classify("Thresholds follow values from prior work."),
            Some((ClaimKind::Implementation, 60))
        );
    }

    #[test]
    fn test_implements_names_origin_in_object() {
        assert_eq!(
            classify("Implements Dijkstra's shortest path search."),
            Some((ClaimKind::Implementation, 80))
        );
    }

    #[test]
    fn test_plain_sentences_make_no_claim() {
        assert_eq!(classify("Return the sum of two numbers."), None);
        assert_eq!(classify("The algorithm terminates."), None);
    }

    #[test]
    fn test_analyze_tracks_line_offsets() {
        let doc = "Solve the system.\n\n    Uses the preconditioner\n    described in [7].\n";
        let found = ProvenanceMatcher::new().analyze(doc);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line_offset, 2);
        assert_eq!(found[0].text, "Uses the preconditioner described in [7].");
        assert_eq!(found[0].citations, vec!["[7]".to_string()]);
        assert_eq!(found[0].kind, ClaimKind::AlgorithmReference);
    }
}
