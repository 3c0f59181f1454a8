use crate::error::{MergeError, Result};
use claimscan_claims::{ClaimId, ClaimKind, ClaimRecord, Origin, Priority};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Retained claim ids per tier, each tier ordered by file, line, id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResearchQueue(BTreeMap<Priority, Vec<ClaimId>>);

impl Default for ResearchQueue {
    fn default() -> Self {
        Self(Priority::ALL.into_iter().map(|p| (p, Vec::new())).collect())
    }
}

impl ResearchQueue {
    /// Build from retained claims; superseded claims are ignored
    pub fn from_claims<'a>(claims: impl IntoIterator<Item = &'a ClaimRecord>) -> Self {
        let mut tiers: BTreeMap<Priority, Vec<&ClaimRecord>> = BTreeMap::new();
        for claim in claims {
            if claim.is_superseded() {
                continue;
            }
            if let Some(priority) = claim.priority {
                tiers.entry(priority).or_default().push(claim);
            }
        }

        let mut queue = Self::default();
        for (priority, mut members) in tiers {
            members.sort_by(|a, b| a.queue_key().cmp(&b.queue_key()));
            queue
                .0
                .insert(priority, members.into_iter().map(|c| c.id.clone()).collect());
        }
        queue
    }

    #[must_use]
    pub fn tier(&self, priority: Priority) -> &[ClaimId] {
        self.0.get(&priority).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids in queue order: Critical first, then High, then Medium
    pub fn iter(&self) -> impl Iterator<Item = (Priority, &ClaimId)> {
        self.0
            .iter()
            .flat_map(|(priority, ids)| ids.iter().map(move |id| (*priority, id)))
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

/// Counts describing a merged inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryMetadata {
    pub total_claims: usize,
    pub retained_claims: usize,
    pub superseded_claims: usize,
    /// Queue entries per tier
    pub by_priority: BTreeMap<Priority, usize>,
    /// All claims, superseded included
    pub by_origin: BTreeMap<Origin, usize>,
    /// All claims, superseded included
    pub by_kind: BTreeMap<ClaimKind, usize>,
}

impl InventoryMetadata {
    pub fn compute(claims: &[ClaimRecord], queue: &ResearchQueue) -> Self {
        let mut by_origin: BTreeMap<Origin, usize> =
            [(Origin::Prose, 0), (Origin::Source, 0)].into_iter().collect();
        let mut by_kind: BTreeMap<ClaimKind, usize> =
            ClaimKind::ALL.into_iter().map(|k| (k, 0)).collect();
        for claim in claims {
            *by_origin.entry(claim.origin).or_default() += 1;
            *by_kind.entry(claim.kind).or_default() += 1;
        }
        let superseded_claims = claims.iter().filter(|c| c.is_superseded()).count();

        Self {
            total_claims: claims.len(),
            retained_claims: claims.len() - superseded_claims,
            superseded_claims,
            by_priority: Priority::ALL
                .into_iter()
                .map(|p| (p, queue.tier(p).len()))
                .collect(),
            by_origin,
            by_kind,
        }
    }
}

/// Merged, deduplicated and prioritised claims
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    pub metadata: InventoryMetadata,
    pub research_queue: ResearchQueue,
    /// Every input claim, superseded ones included, in merge order
    pub claims: Vec<ClaimRecord>,
    /// Duplicate id → representative id
    pub superseded_by: BTreeMap<ClaimId, ClaimId>,
}

impl Inventory {
    #[must_use]
    pub fn claim(&self, id: &ClaimId) -> Option<&ClaimRecord> {
        self.claims.iter().find(|c| &c.id == id)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| MergeError::io(parent, e))?;
    }
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    std::fs::write(path, json).map_err(|e| MergeError::io(path, e))
}
