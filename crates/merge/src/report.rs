use crate::inventory::Inventory;
use claimscan_claims::{ClaimKind, Origin, Priority};
use std::collections::HashMap;

const MAX_CLAIM_CHARS: usize = 100;

/// Markdown summary of an inventory: counts tables and the queue per tier
#[must_use]
pub fn render_report(inventory: &Inventory) -> String {
    let meta = &inventory.metadata;
    let mut md = String::new();
    md.push_str("# Claim inventory report\n\n");
    md.push_str(&format!("- Claims: `{}`\n", meta.total_claims));
    md.push_str(&format!("- Retained: `{}`\n", meta.retained_claims));
    md.push_str(&format!("- Superseded: `{}`\n\n", meta.superseded_claims));

    md.push_str("## Counts\n\n");
    md.push_str("| tier | queued |\n");
    md.push_str("|---|---:|\n");
    for priority in Priority::ALL {
        md.push_str(&format!(
            "| {} | {} |\n",
            priority,
            meta.by_priority.get(&priority).copied().unwrap_or(0)
        ));
    }
    md.push('\n');

    md.push_str("| origin | claims |\n");
    md.push_str("|---|---:|\n");
    for origin in [Origin::Prose, Origin::Source] {
        md.push_str(&format!(
            "| {} | {} |\n",
            origin,
            meta.by_origin.get(&origin).copied().unwrap_or(0)
        ));
    }
    md.push('\n');

    md.push_str("| kind | claims |\n");
    md.push_str("|---|---:|\n");
    for kind in ClaimKind::ALL {
        let count = meta.by_kind.get(&kind).copied().unwrap_or(0);
        if count > 0 {
            md.push_str(&format!("| {kind} | {count} |\n"));
        }
    }
    md.push('\n');

    let by_id: HashMap<_, _> = inventory.claims.iter().map(|c| (&c.id, c)).collect();
    for priority in Priority::ALL {
        let ids = inventory.research_queue.tier(priority);
        md.push_str(&format!("## {priority} ({})\n\n", ids.len()));
        if ids.is_empty() {
            md.push_str("_none_\n\n");
            continue;
        }
        md.push_str("| id | kind | location | confidence | claim |\n");
        md.push_str("|---|---|---|---:|---|\n");
        for id in ids {
            let Some(claim) = by_id.get(id) else { continue };
            md.push_str(&format!(
                "| `{}` | {} | `{}` | `{}` | {} |\n",
                claim.id,
                claim.kind,
                claim.location,
                claim.confidence,
                escape_cell(&truncate_one_line(&claim.text, MAX_CLAIM_CHARS)),
            ));
        }
        md.push('\n');
    }

    md
}

fn truncate_one_line(text: &str, max_chars: usize) -> String {
    let s = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if s.chars().count() <= max_chars {
        return s;
    }
    let truncated: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{truncated}…")
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
