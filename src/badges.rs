//! Achievement badge derivation. Badges unlock purely from per-tag evidence
//! counts; the engine derives the set, presentation lives elsewhere.

use serde::{Deserialize, Serialize};

use crate::graph::SkillGraph;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeRule {
    pub id: String,
    pub tag: String,
    pub min_evidence: u64,
}

impl BadgeRule {
    pub fn new(id: &str, tag: &str, min_evidence: u64) -> Self {
        Self {
            id: id.to_string(),
            tag: tag.to_string(),
            min_evidence,
        }
    }
}

/// Badge ids unlocked by the graph's evidence counts, sorted for stable
/// output.
pub fn unlocked(graph: &SkillGraph, rules: &[BadgeRule]) -> Vec<String> {
    let mut ids: Vec<String> = rules
        .iter()
        .filter(|rule| {
            graph
                .node(&rule.tag)
                .map(|n| n.evidence_count >= rule.min_evidence)
                .unwrap_or(false)
        })
        .map(|rule| rule.id.clone())
        .collect();
    ids.sort();
    ids
}
