use claimscan_claims::{
    sequence_claims, ClaimBatch, ClaimDraft, ClaimKind, Confidence, Location, Origin, Priority,
    RunSummary,
};
use claimscan_merge::{load_batch, ClaimMerger, Inventory, MergeError};
use std::collections::HashSet;
use tempfile::TempDir;

fn draft(file: &str, line: usize, kind: ClaimKind, text: &str, points: u32) -> ClaimDraft {
    ClaimDraft {
        text: text.to_string(),
        kind,
        location: Location::new(file, line),
        scope: "document".to_string(),
        confidence: Confidence::from_points(points),
        citations: Vec::new(),
    }
}

fn prose_batch() -> ClaimBatch {
    let drafts = vec![
        draft("docs/a.md", 3, ClaimKind::Theorem, "Theorem 1 The scheme is stable [3].", 90),
        draft("docs/a.md", 9, ClaimKind::Lemma, "Lemma Errors decay geometrically.", 60),
        draft(
            "docs/b.md",
            1,
            ClaimKind::Informal,
            "The bound holds for every admissible step size (Lee 2019).",
            70,
        ),
        draft("docs/b.md", 5, ClaimKind::Proposition, "Proposition 2 Limits are unique.", 70),
    ];
    let mut summary = RunSummary::new();
    summary.add_processed(drafts.len());
    ClaimBatch::new(
        Origin::Prose,
        "docs".to_string(),
        summary,
        sequence_claims(Origin::Prose, drafts),
    )
}

#[test]
fn self_merge_keeps_half_with_no_orphans() {
    let batch = prose_batch();
    let inventory = ClaimMerger::default().merge(batch.claims.clone(), batch.claims.clone());

    assert_eq!(inventory.metadata.total_claims, 8);
    assert_eq!(inventory.research_queue.len(), 4);
    assert_eq!(inventory.metadata.superseded_claims, 4);

    let ids: HashSet<_> = inventory.claims.iter().map(|c| c.id.clone()).collect();
    assert_eq!(ids.len(), 8, "ids must be unique after merge");

    for (duplicate, representative) in &inventory.superseded_by {
        assert!(ids.contains(duplicate));
        let rep = inventory.claim(representative).expect("representative exists");
        assert!(!rep.is_superseded(), "{representative} is itself superseded");
    }

    // Originals are retained, copies point back at them
    let queued: Vec<_> = inventory.research_queue.iter().map(|(_, id)| id.as_str()).collect();
    assert!(queued.iter().all(|id| !id.contains('~')));
    assert_eq!(
        inventory.research_queue.tier(Priority::Critical)[0].as_str(),
        "prose-00002"
    );
}

#[test]
fn merged_inventory_round_trips_through_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("out/claim_inventory.json");
    let inventory = ClaimMerger::default().merge(prose_batch().claims, Vec::new());
    inventory.write_to(&path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"research_queue\""));
    assert!(raw.contains("\"Critical\""));
    assert_eq!(Inventory::read_from(&path).unwrap(), inventory);
}

#[test]
fn load_batch_names_missing_artifact() {
    let temp = TempDir::new().unwrap();
    let err = load_batch(&temp.path().join("source_claims.json"), Origin::Source).unwrap_err();
    assert!(matches!(
        err,
        MergeError::MissingInput {
            artifact: "source",
            ..
        }
    ));
    assert!(err.to_string().contains("missing source claims artifact"));
}

#[test]
fn load_batch_rejects_malformed_and_mismatched_artifacts() {
    let temp = TempDir::new().unwrap();

    let garbage = temp.path().join("prose_claims.json");
    std::fs::write(&garbage, "{\"claims\": 3}").unwrap();
    assert!(matches!(
        load_batch(&garbage, Origin::Prose),
        Err(MergeError::MalformedInput {
            artifact: "prose",
            ..
        })
    ));

    let prose = temp.path().join("actually_prose.json");
    prose_batch().write_to(&prose).unwrap();
    assert!(load_batch(&prose, Origin::Prose).is_ok());
    let err = load_batch(&prose, Origin::Source).unwrap_err();
    assert!(err.to_string().contains("expected Source claims, found Prose"));
}
