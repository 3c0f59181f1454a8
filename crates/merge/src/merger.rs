use crate::config::MergeConfig;
use crate::dedup::representatives;
use crate::error::{MergeError, Result};
use crate::inventory::{Inventory, InventoryMetadata, ResearchQueue};
use crate::priority::assign_priority;
use claimscan_claims::{ClaimBatch, ClaimId, ClaimRecord, Origin};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Read an extractor artifact, checking it came from the expected extractor
pub fn load_batch(path: &Path, expected: Origin) -> Result<ClaimBatch> {
    let artifact = expected.id_prefix();
    let raw = std::fs::read_to_string(path).map_err(|source| MergeError::MissingInput {
        artifact,
        path: path.to_path_buf(),
        source,
    })?;
    let batch =
        ClaimBatch::from_json(&raw).map_err(|e| MergeError::malformed(artifact, path, e))?;
    if batch.origin != expected {
        return Err(MergeError::malformed(
            artifact,
            path,
            format!("expected {expected} claims, found {}", batch.origin),
        ));
    }
    log::debug!(
        "Loaded {} {artifact} claims from {}",
        batch.claims.len(),
        path.display()
    );
    Ok(batch)
}

/// Combines prose and source claims into one prioritised inventory
#[derive(Debug, Clone, Default)]
pub struct ClaimMerger {
    config: MergeConfig,
}

impl ClaimMerger {
    pub fn new(config: MergeConfig) -> Result<Self> {
        config.validate().map_err(MergeError::invalid_config)?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Deduplicate, prioritise and queue `left` followed by `right`
    ///
    /// Never fails: every input claim appears in the output, superseded ones
    /// pointing at their group's representative.
    #[must_use]
    pub fn merge(&self, left: Vec<ClaimRecord>, right: Vec<ClaimRecord>) -> Inventory {
        let mut claims: Vec<ClaimRecord> = left.into_iter().chain(right).collect();
        rekey_duplicate_ids(&mut claims);

        let reps = representatives(&claims, &self.config);
        let mut superseded_by = BTreeMap::new();
        let rep_ids: Vec<ClaimId> = reps.iter().map(|&rep| claims[rep].id.clone()).collect();
        for (idx, claim) in claims.iter_mut().enumerate() {
            claim.priority = Some(assign_priority(claim));
            if reps[idx] == idx {
                claim.superseded_by = None;
            } else {
                claim.superseded_by = Some(rep_ids[idx].clone());
                superseded_by.insert(claim.id.clone(), rep_ids[idx].clone());
            }
        }

        let research_queue = ResearchQueue::from_claims(&claims);
        let metadata = InventoryMetadata::compute(&claims, &research_queue);
        log::info!(
            "Merged {} claims: {} retained, {} superseded",
            metadata.total_claims,
            metadata.retained_claims,
            metadata.superseded_claims
        );

        Inventory {
            metadata,
            research_queue,
            claims,
            superseded_by,
        }
    }

    /// Merge two extractor artifacts
    pub fn merge_batches(&self, prose: ClaimBatch, source: ClaimBatch) -> Inventory {
        self.merge(prose.claims, source.claims)
    }
}

/// Give later occurrences of a repeated id a `~n` suffix unused anywhere else
fn rekey_duplicate_ids(claims: &mut [ClaimRecord]) {
    let mut taken: HashSet<ClaimId> = claims.iter().map(|c| c.id.clone()).collect();
    let mut seen: HashSet<ClaimId> = HashSet::new();

    for claim in claims.iter_mut() {
        if seen.insert(claim.id.clone()) {
            continue;
        }
        let original = claim.id.clone();
        let fresh = (1..)
            .map(|n| ClaimId::new(format!("{original}~{n}")))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_else(|| original.clone());
        log::debug!("Re-keyed duplicate claim id {original} to {fresh}");
        taken.insert(fresh.clone());
        seen.insert(fresh.clone());
        claim.id = fresh;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimscan_claims::{ClaimKind, Confidence, Location, Priority};
    use pretty_assertions::assert_eq;

    fn claim(id: &str, origin: Origin, kind: ClaimKind, file: &str, line: usize, text: &str, points: u32) -> ClaimRecord {
        ClaimRecord {
            id: ClaimId::new(id),
            text: text.to_string(),
            kind,
            origin,
            location: Location::new(file, line),
            confidence: Confidence::from_points(points),
            citations: Vec::new(),
            scope: "document".to_string(),
            priority: None,
            superseded_by: None,
        }
    }

    #[test]
    fn test_rekey_avoids_existing_ids() {
        let mut claims = vec![
            claim("a", Origin::Prose, ClaimKind::Informal, "f", 1, "one", 50),
            claim("a~1", Origin::Prose, ClaimKind::Informal, "f", 2, "two", 50),
            claim("a", Origin::Source, ClaimKind::Informal, "g", 1, "three", 50),
        ];
        rekey_duplicate_ids(&mut claims);
        let ids: Vec<_> = claims.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a~1", "a~2"]);
    }

    #[test]
    fn test_cross_origin_duplicate_keeps_higher_confidence() {
        let prose = vec![claim(
            "prose-00001",
            Origin::Prose,
            ClaimKind::Informal,
            "docs/a.md",
            4,
            "Smith's method converges quadratically (Smith 2020).",
            70,
        )];
        let source = vec![claim(
            "source-00001",
            Origin::Source,
            ClaimKind::AlgorithmReference,
            "src/solver.py",
            12,
            "Smith's method converges quadratically (Smith 2020)",
            80,
        )];

        let inventory = ClaimMerger::default().merge(prose, source);
        assert_eq!(
            inventory.superseded_by.get(&ClaimId::new("prose-00001")),
            Some(&ClaimId::new("source-00001"))
        );
        assert_eq!(
            inventory.research_queue.tier(Priority::Medium),
            &[ClaimId::new("source-00001")]
        );
        assert_eq!(inventory.metadata.superseded_claims, 1);
        assert_eq!(inventory.metadata.by_origin[&Origin::Prose], 1);
        // Superseded claims still carry a tier
        assert!(inventory.claims.iter().all(|c| c.priority.is_some()));
    }

    #[test]
    fn test_queue_tiers_and_order() {
        let prose = vec![
            claim("prose-00002", Origin::Prose, ClaimKind::Theorem, "b.md", 1, "Every bounded sequence has a limit point.", 70),
            claim("prose-00001", Origin::Prose, ClaimKind::Lemma, "a.md", 9, "The operator is compact.", 60),
        ];
        let source = vec![
            claim("source-00001", Origin::Source, ClaimKind::Implementation, "s.py", 3, "Adapted from prior work.", 60),
            claim("source-00002", Origin::Source, ClaimKind::AlgorithmReference, "s.py", 20, "Runs the Kalman filter.", 50),
            claim("source-00003", Origin::Source, ClaimKind::Implementation, "r.py", 1, "Based on [1].", 90),
        ];
        let inventory = ClaimMerger::default().merge(prose, source);

        let ids = |p| {
            inventory
                .research_queue
                .tier(p)
                .iter()
                .map(ClaimId::as_str)
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(Priority::Critical), vec!["prose-00001", "prose-00002"]);
        assert_eq!(ids(Priority::High), vec!["source-00001", "source-00002"]);
        assert_eq!(ids(Priority::Medium), vec!["source-00003"]);
        assert_eq!(inventory.metadata.by_priority[&Priority::High], 2);
        assert_eq!(inventory.metadata.retained_claims, 5);
    }
}
