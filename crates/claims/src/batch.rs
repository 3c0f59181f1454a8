use crate::error::{ClaimsError, Result};
use crate::types::{ClaimDraft, ClaimId, ClaimRecord, Origin};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Bumped whenever the artifact layout changes incompatibly
pub const CLAIM_BATCH_SCHEMA_VERSION: u32 = 1;

/// A file the extractor gave up on, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Per-run counters, always reported even when files were skipped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub files_processed: usize,
    #[serde(default)]
    pub files_skipped: Vec<SkippedFile>,
    pub claims_extracted: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_processed(&mut self, claims: usize) {
        self.files_processed += 1;
        self.claims_extracted += claims;
    }

    pub fn add_skipped(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.files_skipped.push(SkippedFile {
            path: path.into(),
            reason: reason.into(),
        });
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.files_skipped.len()
    }
}

/// Output artifact of one extractor run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimBatch {
    pub schema_version: u32,
    pub origin: Origin,
    /// Root directory as given to the extractor
    pub root: String,
    pub summary: RunSummary,
    pub claims: Vec<ClaimRecord>,
}

impl ClaimBatch {
    #[must_use]
    pub fn new(
        origin: Origin,
        root: impl Into<String>,
        summary: RunSummary,
        claims: Vec<ClaimRecord>,
    ) -> Self {
        Self {
            schema_version: CLAIM_BATCH_SCHEMA_VERSION,
            origin,
            root: root.into(),
            summary,
            claims,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let batch: Self = serde_json::from_str(raw)?;
        if batch.schema_version != CLAIM_BATCH_SCHEMA_VERSION {
            return Err(ClaimsError::SchemaVersion {
                found: batch.schema_version,
                expected: CLAIM_BATCH_SCHEMA_VERSION,
            });
        }
        Ok(batch)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ClaimsError::io(parent, e))?;
        }
        std::fs::write(path, self.to_json_pretty()?).map_err(|e| ClaimsError::io(path, e))
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| ClaimsError::io(path, e))?;
        Self::from_json(&raw)
    }
}

/// Order drafts by (file, line) and assign sequential ids
///
/// The sort is stable, so claims on the same line keep the order the extractor
/// produced them in. Ids therefore depend only on file contents, never on worker
/// scheduling.
#[must_use]
pub fn sequence_claims(origin: Origin, mut drafts: Vec<ClaimDraft>) -> Vec<ClaimRecord> {
    drafts.sort_by(|a, b| a.location.cmp(&b.location));
    drafts
        .into_iter()
        .enumerate()
        .map(|(idx, draft)| draft.into_record(ClaimId::sequenced(origin, idx + 1), origin))
        .collect()
}
