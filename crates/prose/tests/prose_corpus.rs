use claimscan_claims::{ClaimKind, Origin};
use claimscan_prose::{ProseClaimExtractor, ProseConfig};
use std::fs;
use tempfile::TempDir;

fn write(root: &std::path::Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn corpus() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(
        root,
        "docs/analysis.md",
        b"# Convergence\n\n**Theorem 1.2** The scheme is stable [3].\n\n## Rates\n\nLemma. Errors decay geometrically.\n",
    );
    write(
        root,
        "docs/appendix/notes.markdown",
        b"Plain notes. The bound holds for every admissible step size (Lee 2019).\n",
    );
    write(root, "docs/broken.md", &[0x66, 0x6f, 0xff, 0xfe, 0x0a]);
    write(root, "docs/readme.txt", b"Theorem 9. Not a markdown file.\n");
    temp
}

#[tokio::test]
async fn extracts_sorted_batch_and_skips_unreadable_document() {
    let temp = corpus();
    let extractor = ProseClaimExtractor::new(ProseConfig::default()).unwrap();
    let batch = extractor.extract_root(temp.path(), None).await.unwrap();

    assert_eq!(batch.origin, Origin::Prose);
    assert_eq!(batch.summary.files_processed, 2);
    assert_eq!(batch.summary.files_skipped.len(), 1);
    assert_eq!(batch.summary.files_skipped[0].path, "docs/broken.md");
    assert!(batch.summary.files_skipped[0].reason.contains("UTF-8"));

    let listing: Vec<_> = batch
        .claims
        .iter()
        .map(|c| (c.id.as_str(), c.location.file.as_str(), c.location.line, c.kind))
        .collect();
    assert_eq!(
        listing,
        vec![
            ("prose-00001", "docs/analysis.md", 3, ClaimKind::Theorem),
            ("prose-00002", "docs/analysis.md", 7, ClaimKind::Lemma),
            ("prose-00003", "docs/appendix/notes.markdown", 1, ClaimKind::Informal),
        ]
    );
    assert_eq!(batch.claims[1].scope, "Rates");
    assert_eq!(batch.summary.claims_extracted, 3);
    assert!(batch
        .claims
        .iter()
        .all(|c| (0.0..=1.0).contains(&c.confidence.value())));
}

#[tokio::test]
async fn repeated_runs_are_byte_identical() {
    let temp = corpus();
    let extractor = ProseClaimExtractor::new(ProseConfig::default()).unwrap();
    let first = extractor.extract_root(temp.path(), None).await.unwrap();
    let second = extractor.extract_root(temp.path(), None).await.unwrap();
    assert_eq!(
        first.to_json_pretty().unwrap(),
        second.to_json_pretty().unwrap()
    );
}

#[tokio::test]
async fn missing_root_is_an_error() {
    let temp = TempDir::new().unwrap();
    let extractor = ProseClaimExtractor::new(ProseConfig::default()).unwrap();
    let result = extractor
        .extract_root(&temp.path().join("nope"), None)
        .await;
    assert!(result.is_err());
}
