use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a claim, unique within one extractor run (`prose-00001`, `source-00042`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimId(String);

impl ClaimId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Sequenced id for the `n`-th claim (1-based) of an extractor run
    #[must_use]
    pub fn sequenced(origin: Origin, n: usize) -> Self {
        Self(format!("{}-{n:05}", origin.id_prefix()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of statement a claim makes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClaimKind {
    Theorem,
    Lemma,
    Proposition,
    Corollary,
    /// "implements X from Y" style provenance in a documentation block
    Implementation,
    /// Bare reference to an algorithm or publication
    AlgorithmReference,
    /// Citation-bearing declarative sentence without a formal label
    Informal,
}

impl ClaimKind {
    pub const ALL: [ClaimKind; 7] = [
        Self::Theorem,
        Self::Lemma,
        Self::Proposition,
        Self::Corollary,
        Self::Implementation,
        Self::AlgorithmReference,
        Self::Informal,
    ];

    /// Map a formal header keyword (any case) to its kind
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_lowercase().as_str() {
            "theorem" => Some(Self::Theorem),
            "lemma" => Some(Self::Lemma),
            "proposition" => Some(Self::Proposition),
            "corollary" => Some(Self::Corollary),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Theorem => "Theorem",
            Self::Lemma => "Lemma",
            Self::Proposition => "Proposition",
            Self::Corollary => "Corollary",
            Self::Implementation => "Implementation",
            Self::AlgorithmReference => "AlgorithmReference",
            Self::Informal => "Informal",
        }
    }
}

impl fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which extractor produced a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Origin {
    Prose,
    Source,
}

impl Origin {
    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Prose => "prose",
            Self::Source => "source",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prose => "Prose",
            Self::Source => "Source",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Research triage tier, assigned only by the merger
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::Critical, Self::High, Self::Medium];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Confidence score, always within `[0.0, 1.0]`
///
/// Out-of-range and NaN inputs are clamped on construction and on deserialization,
/// so no code path can produce a record that violates the bound.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    pub const MIN: Confidence = Confidence(0.0);
    pub const MAX: Confidence = Confidence(1.0);

    #[must_use]
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Build from integer hundredths (`80` → `0.8`), saturating at `1.0`
    ///
    /// Scores are accumulated as integers so that sums such as `0.5 + 0.2 + 0.1`
    /// land exactly on the decimal the thresholds compare against.
    #[must_use]
    pub fn from_points(points: u32) -> Self {
        Self::new(f64::from(points.min(100)) / 100.0)
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Where a claim's text begins
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Path relative to the extractor root, `/`-separated
    pub file: String,

    /// Line (1-indexed)
    pub line: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A claim as found in one file, before the run assigns ids
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimDraft {
    pub text: String,
    pub kind: ClaimKind,
    pub location: Location,
    pub scope: String,
    pub confidence: Confidence,
    pub citations: Vec<String>,
}

impl ClaimDraft {
    #[must_use]
    pub fn into_record(self, id: ClaimId, origin: Origin) -> ClaimRecord {
        ClaimRecord {
            id,
            text: self.text,
            kind: self.kind,
            origin,
            location: self.location,
            confidence: self.confidence,
            citations: self.citations,
            scope: self.scope,
            priority: None,
            superseded_by: None,
        }
    }
}

/// One extracted claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub id: ClaimId,

    /// Whitespace-collapsed statement
    pub text: String,

    pub kind: ClaimKind,

    pub origin: Origin,

    #[serde(flatten)]
    pub location: Location,

    pub confidence: Confidence,

    #[serde(default)]
    pub citations: Vec<String>,

    /// Scope path for source claims, section title (or `document`) for prose claims
    pub scope: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_by: Option<ClaimId>,
}

impl ClaimRecord {
    #[must_use]
    pub fn is_superseded(&self) -> bool {
        self.superseded_by.is_some()
    }

    /// Sort key used by the research queue: file, line, then id
    #[must_use]
    pub fn queue_key(&self) -> (&str, usize, &ClaimId) {
        (self.location.file.as_str(), self.location.line, &self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamps() {
        assert_eq!(Confidence::new(1.7).value(), 1.0);
        assert_eq!(Confidence::new(-0.2).value(), 0.0);
        assert_eq!(Confidence::new(f64::NAN).value(), 0.0);
        assert_eq!(Confidence::from_points(110).value(), 1.0);
    }

    #[test]
    fn test_confidence_points_are_exact() {
        assert_eq!(Confidence::from_points(50 + 20 + 10).value(), 0.8);
        assert!(Confidence::from_points(70).value() < 0.8);
        assert!(Confidence::from_points(80).value() >= 0.8);
    }

    #[test]
    fn test_confidence_deserialization_clamps() {
        let parsed: Confidence = serde_json::from_str("3.5").unwrap();
        assert_eq!(parsed.value(), 1.0);
    }

    #[test]
    fn test_sequenced_ids_sort_in_order() {
        let a = ClaimId::sequenced(Origin::Prose, 9);
        let b = ClaimId::sequenced(Origin::Prose, 10);
        assert_eq!(a.as_str(), "prose-00009");
        assert!(a < b);
    }

    #[test]
    fn test_kind_from_keyword() {
        assert_eq!(ClaimKind::from_keyword("THEOREM"), Some(ClaimKind::Theorem));
        assert_eq!(ClaimKind::from_keyword("lemma"), Some(ClaimKind::Lemma));
        assert_eq!(ClaimKind::from_keyword("remark"), None);
    }

    #[test]
    fn test_record_serializes_flat_location() {
        let record = ClaimDraft {
            text: "Sorting is stable".to_string(),
            kind: ClaimKind::Informal,
            location: Location::new("docs/a.md", 4),
            scope: "document".to_string(),
            confidence: Confidence::from_points(70),
            citations: vec!["[3]".to_string()],
        }
        .into_record(ClaimId::new("prose-00001"), Origin::Prose);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["file"], "docs/a.md");
        assert_eq!(value["line"], 4);
        assert_eq!(value["kind"], "Informal");
        assert!(value.get("priority").is_none());
        assert!(value.get("superseded_by").is_none());
    }
}
