use crate::config::MergeConfig;
use claimscan_claims::{comparison_key, token_set_similarity, ClaimRecord};
use std::collections::{BTreeMap, HashMap};

/// Disjoint sets over claim positions
#[derive(Debug, Clone)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
            rank: vec![0; len],
        }
    }

    pub(crate) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        // Path compression
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] = self.rank[ra].saturating_add(1);
            }
        }
    }
}

/// Representative position for every claim position
///
/// Two claims are duplicates when their comparison keys are identical, or when
/// they sit in the same file within `line_window` lines and their token-set
/// similarity reaches `similarity_threshold`. Duplicate groups are transitive.
/// The representative of a group is its highest-confidence member, the earliest
/// position winning ties.
pub(crate) fn representatives(claims: &[ClaimRecord], config: &MergeConfig) -> Vec<usize> {
    let keys: Vec<String> = claims.iter().map(|c| comparison_key(&c.text)).collect();
    let mut sets = DisjointSet::new(claims.len());

    let mut first_with_key: HashMap<&str, usize> = HashMap::new();
    for (idx, key) in keys.iter().enumerate() {
        if key.is_empty() {
            continue;
        }
        match first_with_key.get(key.as_str()) {
            Some(&first) => sets.union(first, idx),
            None => {
                first_with_key.insert(key.as_str(), idx);
            }
        }
    }

    let mut by_file: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (idx, claim) in claims.iter().enumerate() {
        if !keys[idx].is_empty() {
            by_file.entry(claim.location.file.as_str()).or_default().push(idx);
        }
    }
    for positions in by_file.values_mut() {
        positions.sort_by_key(|&idx| (claims[idx].location.line, idx));
        for (offset, &a) in positions.iter().enumerate() {
            let line_a = claims[a].location.line;
            for &b in &positions[offset + 1..] {
                if claims[b].location.line - line_a > config.line_window {
                    break;
                }
                if token_set_similarity(&keys[a], &keys[b]) >= config.similarity_threshold {
                    sets.union(a, b);
                }
            }
        }
    }

    let mut best: HashMap<usize, usize> = HashMap::new();
    for idx in 0..claims.len() {
        let root = sets.find(idx);
        let current = best.entry(root).or_insert(idx);
        if claims[idx].confidence.value() > claims[*current].confidence.value() {
            *current = idx;
        }
    }
    (0..claims.len())
        .map(|idx| {
            let root = sets.find(idx);
            best.get(&root).copied().unwrap_or(idx)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimscan_claims::{ClaimId, ClaimKind, Confidence, Location, Origin};

    fn claim(id: &str, file: &str, line: usize, text: &str, confidence: f64) -> ClaimRecord {
        ClaimRecord {
            id: ClaimId::new(id),
            text: text.to_string(),
            kind: ClaimKind::Informal,
            origin: Origin::Prose,
            location: Location::new(file, line),
            confidence: Confidence::new(confidence),
            citations: Vec::new(),
            scope: "document".to_string(),
            priority: None,
            superseded_by: None,
        }
    }

    #[test]
    fn test_disjoint_set_is_transitive() {
        let mut sets = DisjointSet::new(5);
        sets.union(0, 1);
        sets.union(3, 4);
        sets.union(1, 4);
        assert_eq!(sets.find(0), sets.find(3));
        assert_ne!(sets.find(0), sets.find(2));
    }

    #[test]
    fn test_near_duplicates_need_same_file_and_window() {
        let base = "the estimator converges at a linear rate for every admissible step size";
        let near = "The estimator converges at a linear rate for every admissible step size!";
        let claims = vec![
            claim("a", "x.md", 10, base, 0.7),
            claim("b", "x.md", 12, &format!("{near} indeed"), 0.9),
            claim("c", "x.md", 30, &format!("{base} indeed"), 0.7),
            claim("d", "y.md", 11, &format!("{base} indeed"), 0.7),
        ];
        let reps = representatives(&claims, &MergeConfig::default());
        // a~b by window, b~c and b~d by identical keys
        assert_eq!(reps, vec![1, 1, 1, 1]);
    }

    #[test]
    fn test_ties_keep_earliest() {
        let claims = vec![
            claim("a", "x.md", 1, "Same words here.", 0.8),
            claim("b", "z.md", 9, "same words here", 0.8),
            claim("c", "z.md", 40, "Unrelated statement entirely.", 0.8),
        ];
        assert_eq!(representatives(&claims, &MergeConfig::default()), vec![0, 0, 2]);
    }

    #[test]
    fn test_dissimilar_neighbours_stay_apart() {
        let claims = vec![
            claim("a", "x.md", 1, "The bound is tight.", 0.8),
            claim("b", "x.md", 2, "The estimator is unbiased.", 0.8),
        ];
        assert_eq!(representatives(&claims, &MergeConfig::default()), vec![0, 1]);
    }
}
