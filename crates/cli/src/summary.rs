use claimscan_claims::{ClaimBatch, Priority};
use claimscan_merge::Inventory;

/// Per-extractor run summary on stderr
pub fn print_batch(batch: &ClaimBatch) {
    let summary = &batch.summary;
    eprintln!(
        "{}: {} files processed, {} skipped, {} claims",
        batch.origin.id_prefix(),
        summary.files_processed,
        summary.skipped_count(),
        summary.claims_extracted
    );
    for skipped in &summary.files_skipped {
        eprintln!("  skipped {}: {}", skipped.path, skipped.reason);
    }
}

/// Queue counts on stderr
pub fn print_inventory(inventory: &Inventory) {
    let meta = &inventory.metadata;
    let tiers: Vec<String> = Priority::ALL
        .iter()
        .map(|p| format!("{p} {}", inventory.research_queue.tier(*p).len()))
        .collect();
    eprintln!(
        "merge: {} claims, {} retained, {} superseded; queue {}",
        meta.total_claims,
        meta.retained_claims,
        meta.superseded_claims,
        tiers.join(", ")
    );
}
