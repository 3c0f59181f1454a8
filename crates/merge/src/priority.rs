use claimscan_claims::{ClaimKind, ClaimRecord, Origin, Priority};

const FORMAL_RESULT_FLOOR: f64 = 0.8;
const SOURCE_FLOOR: f64 = 0.7;

/// Research tier for a claim; first matching rule wins
///
/// 1. Theorem, Lemma or Corollary below 0.8 → Critical
/// 2. Source claim below 0.7 → High
/// 3. Confidence at least 0.8 → Medium
/// 4. Proposition or Informal → Medium
/// 5. Anything else → Medium
#[must_use]
pub fn assign_priority(claim: &ClaimRecord) -> Priority {
    let confidence = claim.confidence.value();
    let formal_result = matches!(
        claim.kind,
        ClaimKind::Theorem | ClaimKind::Lemma | ClaimKind::Corollary
    );

    if formal_result && confidence < FORMAL_RESULT_FLOOR {
        Priority::Critical
    } else if claim.origin == Origin::Source && confidence < SOURCE_FLOOR {
        Priority::High
    } else {
        // Rules 3-5 share a tier
        Priority::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimscan_claims::{ClaimId, Confidence, Location};

    fn claim(kind: ClaimKind, origin: Origin, points: u32) -> ClaimRecord {
        ClaimRecord {
            id: ClaimId::new("x"),
            text: "t".to_string(),
            kind,
            origin,
            location: Location::new("f", 1),
            confidence: Confidence::from_points(points),
            citations: Vec::new(),
            scope: "module".to_string(),
            priority: None,
            superseded_by: None,
        }
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            assign_priority(&claim(ClaimKind::Lemma, Origin::Prose, 70)),
            Priority::Critical
        );
        // Rule 1 beats rule 2 for a low-confidence theorem found in source
        assert_eq!(
            assign_priority(&claim(ClaimKind::Theorem, Origin::Source, 50)),
            Priority::Critical
        );
        assert_eq!(
            assign_priority(&claim(ClaimKind::Corollary, Origin::Prose, 80)),
            Priority::Medium
        );
        assert_eq!(
            assign_priority(&claim(ClaimKind::Implementation, Origin::Source, 60)),
            Priority::High
        );
        assert_eq!(
            assign_priority(&claim(ClaimKind::Implementation, Origin::Source, 70)),
            Priority::Medium
        );
        assert_eq!(
            assign_priority(&claim(ClaimKind::Proposition, Origin::Prose, 50)),
            Priority::Medium
        );
    }

    #[test]
    fn test_every_combination_gets_a_tier() {
        for kind in ClaimKind::ALL {
            for origin in [Origin::Prose, Origin::Source] {
                for points in (0..=100).step_by(10) {
                    let priority = assign_priority(&claim(kind, origin, points));
                    assert!(Priority::ALL.contains(&priority));
                }
            }
        }
    }
}
