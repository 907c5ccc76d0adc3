//! Per-learner skill graph: decaying per-tag scores plus the static relation
//! edges shared by every learner.
//!
//! Mutation goes through `apply_batch` only. A batch decays the whole graph to
//! the batch time, adds the direct contributions, then propagates a single hop
//! of fractional credit along the edge set. Propagated credit is derived from
//! the direct contributions of this batch and is never re-propagated, so a
//! cycle in the edge set cannot amplify itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::ScoringConfig;

/// How one tag relates to another. Prerequisite edges point from the
/// foundational tag to the tag that builds on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Prerequisite,
    Related,
}

/// Static inter-tag edge, loaded from configuration. Not learner-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillEdge {
    pub from: String,
    pub to: String,
    pub relation: Relation,
    #[serde(default = "default_edge_weight")]
    pub weight: f64,
}

fn default_edge_weight() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillNode {
    pub tag: String,
    pub score: f64,
    pub last_updated: DateTime<Utc>,
    pub evidence_count: u64,
}

impl SkillNode {
    fn new(tag: String, as_of: DateTime<Utc>) -> Self {
        Self {
            tag,
            score: 0.0,
            last_updated: as_of,
            evidence_count: 0,
        }
    }
}

/// Exponential decay of `score` from `last_updated` to `as_of`, with the
/// given half-life. Time running backwards (out-of-order batches) leaves the
/// score untouched rather than inflating it.
pub fn decayed(score: f64, last_updated: DateTime<Utc>, as_of: DateTime<Utc>, half_life_days: f64) -> f64 {
    let dt_days = (as_of - last_updated).num_milliseconds() as f64 / 86_400_000.0;
    if dt_days <= 0.0 || half_life_days <= 0.0 {
        return score;
    }
    let lambda = std::f64::consts::LN_2 / half_life_days;
    score * (-lambda * dt_days).exp()
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillGraph {
    nodes: BTreeMap<String, SkillNode>,
    #[serde(skip)]
    edges: Arc<Vec<SkillEdge>>,
}

impl SkillGraph {
    pub fn new(edges: Arc<Vec<SkillEdge>>) -> Self {
        Self {
            nodes: BTreeMap::new(),
            edges,
        }
    }

    pub fn node(&self, tag: &str) -> Option<&SkillNode> {
        self.nodes.get(tag)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SkillNode> {
        self.nodes.values()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edges(&self) -> &[SkillEdge] {
        &self.edges
    }

    /// Stored score decayed to `as_of`. Zero for tags never evidenced.
    pub fn current_score(&self, tag: &str, as_of: DateTime<Utc>, half_life_days: f64) -> f64 {
        self.nodes
            .get(tag)
            .map(|n| decayed(n.score, n.last_updated, as_of, half_life_days))
            .unwrap_or(0.0)
    }

    /// Score normalized against the mastery ceiling, saturating at 1.
    pub fn normalized_score(&self, tag: &str, as_of: DateTime<Utc>, tuning: &ScoringConfig) -> f64 {
        let raw = self.current_score(tag, as_of, tuning.half_life_days);
        (raw / tuning.mastery_ceiling).min(1.0)
    }

    /// Apply one contribution batch at `as_of`. Infallible and atomic under
    /// the caller's per-learner lock, which is what makes the whole-snapshot
    /// decay safe against double application on retry.
    pub fn apply_batch(&mut self, contributions: &[(String, f64)], as_of: DateTime<Utc>, tuning: &ScoringConfig) {
        // 1. Decay the whole snapshot to the batch time. The stamp only ever
        //    advances: a batch stamped in the past must not rewind it, or the
        //    fresher evidence would later be decayed over time that never
        //    elapsed after it.
        for node in self.nodes.values_mut() {
            node.score = decayed(node.score, node.last_updated, as_of, tuning.half_life_days);
            node.last_updated = node.last_updated.max(as_of);
        }

        // 2. Direct contributions. Each entry counts as one piece of evidence.
        for (tag, contribution) in contributions {
            let node = self
                .nodes
                .entry(tag.clone())
                .or_insert_with(|| SkillNode::new(tag.clone(), as_of));
            node.score += contribution.max(0.0);
            node.evidence_count += 1;
            node.last_updated = node.last_updated.max(as_of);
        }

        // 3. Single-hop propagation, sourced from the direct contributions
        //    only. Related edges carry credit forward; prerequisite edges
        //    carry it backward (evidence on an advanced tag keeps its
        //    foundations from decaying to zero). No evidence_count bump.
        let edges = Arc::clone(&self.edges);
        for (tag, contribution) in contributions {
            for edge in edges.iter() {
                let credit = tuning.propagation_factor * contribution * edge.weight;
                if credit <= 0.0 {
                    continue;
                }
                if edge.relation == Relation::Related && edge.from == *tag {
                    self.credit(&edge.to, credit, as_of);
                } else if edge.relation == Relation::Prerequisite && edge.to == *tag {
                    self.credit(&edge.from, credit, as_of);
                }
            }
        }
    }

    fn credit(&mut self, tag: &str, amount: f64, as_of: DateTime<Utc>) {
        let node = self
            .nodes
            .entry(tag.to_string())
            .or_insert_with(|| SkillNode::new(tag.to_string(), as_of));
        node.score += amount;
        node.last_updated = node.last_updated.max(as_of);
    }

    /// Compact profile for the skill-DNA visual: every evidenced tag with its
    /// normalized score, strongest first, ties broken by tag name.
    pub fn dna(&self, as_of: DateTime<Utc>, tuning: &ScoringConfig) -> Vec<(String, f64)> {
        let mut strands: Vec<(String, f64)> = self
            .nodes
            .keys()
            .map(|tag| (tag.clone(), self.normalized_score(tag, as_of, tuning)))
            .collect();
        strands.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        strands
    }
}
