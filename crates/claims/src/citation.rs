use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shape of a detected citation token
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CitationKind {
    /// `[12]`, `[3, 7]`, `[2-4]`
    Numbered,
    /// `10.1145/3290605`
    Doi,
    /// `(Smith 2020)`, `Smith et al. (2019)`
    AuthorYear,
    /// `arXiv:2101.00001`, `ISBN 9780262033848`
    External,
}

/// A citation token and its byte span in the scanned text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationMatch {
    pub kind: CitationKind,
    pub token: String,
    pub start: usize,
    pub end: usize,
}

impl CitationMatch {
    /// DOI and numbered references pin down a specific work
    #[must_use]
    pub const fn is_strong(&self) -> bool {
        matches!(self.kind, CitationKind::Doi | CitationKind::Numbered)
    }
}

static NUMBERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([1-9]\d{0,2}(?:\s*[,\-–]\s*[1-9]\d{0,2})*)\]").expect("valid numbered regex")
});

static DOI: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)(?:https?://(?:dx\.)?doi\.org/|\bdoi:\s*)?\b(10\.\d{4,9}/[^\s"'<>]+)"#)
        .expect("valid doi regex")
});

const AUTHOR: &str = r"[A-Z][A-Za-z'\-]+(?:\s+(?:et\s+al\.?|(?:and|&)\s+[A-Z][A-Za-z'\-]+))?";

static AUTHOR_YEAR_PAREN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\(({AUTHOR}),?\s+((?:19|20)\d{{2}}[a-z]?)\)"))
        .expect("valid author-year regex")
});

static AUTHOR_YEAR_NARRATIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b({AUTHOR})\s+\(((?:19|20)\d{{2}}[a-z]?)\)"))
        .expect("valid narrative author-year regex")
});

static ARXIV: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\barxiv:\s*(\d{4}\.\d{4,5}(?:v\d+)?)").expect("valid arxiv regex")
});

static ISBN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bISBN(?:-1[03])?:?\s*((?:97[89][\-\s]?)?\d[\d\-\s]{8,15}[\dXx])")
        .expect("valid isbn regex")
});

/// Words that look like capitalised authors but start a sentence or a formal label
const NON_AUTHORS: &[&str] = &[
    "In", "See", "The", "This", "As", "From", "Theorem", "Lemma", "Proposition", "Corollary",
    "Section", "Table", "Figure", "Eq", "Equation", "Version", "Since", "Until", "Before",
    "After",
];

/// Stateless detector for citation tokens in free text
#[derive(Debug, Clone, Copy, Default)]
pub struct CitationDetector;

impl CitationDetector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// All citation tokens in `text`, ordered by position, first occurrence of each token kept
    #[must_use]
    pub fn detect(&self, text: &str) -> Vec<CitationMatch> {
        let mut found = Vec::new();

        for caps in NUMBERED.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if !Self::is_standalone_bracket(text, whole.start(), whole.end()) {
                continue;
            }
            let inner: String = caps[1].split_whitespace().collect();
            found.push(CitationMatch {
                kind: CitationKind::Numbered,
                token: format!("[{inner}]"),
                start: whole.start(),
                end: whole.end(),
            });
        }

        for caps in DOI.captures_iter(text) {
            let (Some(whole), Some(doi)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let trimmed = doi
                .as_str()
                .trim_end_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | ')' | ']' | '}'));
            found.push(CitationMatch {
                kind: CitationKind::Doi,
                token: trimmed.to_string(),
                start: whole.start(),
                end: doi.start() + trimmed.len(),
            });
        }

        for pattern in [&*AUTHOR_YEAR_PAREN, &*AUTHOR_YEAR_NARRATIVE] {
            for caps in pattern.captures_iter(text) {
                let Some(whole) = caps.get(0) else { continue };
                let author = collapse(&caps[1]);
                let lead = author.split_whitespace().next().unwrap_or_default();
                if NON_AUTHORS.contains(&lead) {
                    continue;
                }
                found.push(CitationMatch {
                    kind: CitationKind::AuthorYear,
                    token: format!("{} {}", author.trim_end_matches(','), &caps[2]),
                    start: whole.start(),
                    end: whole.end(),
                });
            }
        }

        for caps in ARXIV.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            found.push(CitationMatch {
                kind: CitationKind::External,
                token: format!("arXiv:{}", &caps[1]),
                start: whole.start(),
                end: whole.end(),
            });
        }

        for caps in ISBN.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let digits: String = caps[1]
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == 'X' || *c == 'x')
                .collect();
            if digits.len() != 10 && digits.len() != 13 {
                continue;
            }
            found.push(CitationMatch {
                kind: CitationKind::External,
                token: format!("ISBN {digits}"),
                start: whole.start(),
                end: whole.end(),
            });
        }

        found.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.kind.cmp(&b.kind)));
        let mut seen = std::collections::HashSet::new();
        found.retain(|m| seen.insert(m.token.clone()));
        found
    }

    /// Tokens only, in order
    #[must_use]
    pub fn tokens(&self, text: &str) -> Vec<String> {
        self.detect(text).into_iter().map(|m| m.token).collect()
    }

    #[must_use]
    pub fn has_citation(&self, text: &str) -> bool {
        !self.detect(text).is_empty()
    }

    /// Reject `xs[1]` indexing and `[1](url)` markdown links
    fn is_standalone_bracket(text: &str, start: usize, end: usize) -> bool {
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        let indexed = before.is_some_and(|c| c.is_alphanumeric() || c == '_' || c == ')' || c == ']');
        let linked = matches!(after, Some('(') | Some('['));
        !indexed && !linked
    }
}

fn collapse(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(CitationKind, String)> {
        CitationDetector::new()
            .detect(text)
            .into_iter()
            .map(|m| (m.kind, m.token))
            .collect()
    }

    #[test]
    fn test_numbered_markers() {
        assert_eq!(
            kinds("as shown in [12] and [3, 7]"),
            vec![
                (CitationKind::Numbered, "[12]".to_string()),
                (CitationKind::Numbered, "[3,7]".to_string()),
            ]
        );
    }

    #[test]
    fn test_indexing_and_links_are_not_citations() {
        assert!(kinds("values[1] + x[2]").is_empty());
        assert!(kinds("see [1](https://example.com)").is_empty());
    }

    #[test]
    fn test_doi_variants() {
        let found = kinds("doi:10.1145/3290605.3300857. Also https://doi.org/10.1000/xyz123).");
        assert_eq!(
            found,
            vec![
                (CitationKind::Doi, "10.1145/3290605.3300857".to_string()),
                (CitationKind::Doi, "10.1000/xyz123".to_string()),
            ]
        );
    }

    #[test]
    fn test_author_year_forms() {
        let found = kinds("Proven (Smith et al., 2019) and extended by Jones and Lee (2021).");
        assert_eq!(
            found,
            vec![
                (CitationKind::AuthorYear, "Smith et al. 2019".to_string()),
                (CitationKind::AuthorYear, "Jones and Lee 2021".to_string()),
            ]
        );
    }

    #[test]
    fn test_sentence_openers_are_not_authors() {
        assert!(kinds("In (2020) nothing happened").is_empty());
        assert!(kinds("Theorem (1999) holds").is_empty());
    }

    #[test]
    fn test_external_identifiers() {
        let found = kinds("preprint arXiv:2101.00001v2, book ISBN 978-0-262-03384-8");
        assert_eq!(
            found,
            vec![
                (CitationKind::External, "arXiv:2101.00001v2".to_string()),
                (CitationKind::External, "ISBN 9780262033848".to_string()),
            ]
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(CitationDetector::new().tokens("[4] then again [4]"), vec!["[4]"]);
    }

    #[test]
    fn test_strength() {
        let found = CitationDetector::new().detect("[2] (Knuth 1997)");
        assert!(found[0].is_strong());
        assert!(!found[1].is_strong());
    }
}
