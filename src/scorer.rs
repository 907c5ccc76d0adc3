//! Readiness scoring over a skill graph: per-category breakdown, overall
//! score, and prerequisite-driven gap surfacing. Deterministic given the same
//! graph state, configuration, and `as_of` time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::Config;
use crate::graph::{Relation, SkillGraph};

/// Whether the optional narrative made it into the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeStatus {
    /// Narrative was not requested.
    Disabled,
    /// Narrative text is present.
    Ready,
    /// The narrative collaborator failed; the numeric report is still valid.
    Unavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadinessReport {
    /// Weighted average of category scores, 0..=100.
    pub overall_score: f64,
    /// Per-category scores, 0..=100, one entry per weighted category.
    pub category_scores: BTreeMap<String, f64>,
    /// Tags whose prerequisites are well-evidenced but whose own score is
    /// weak, most pressing first.
    pub gaps: Vec<String>,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    pub narrative_status: NarrativeStatus,
}

/// Compute the readiness report for a graph at `as_of`.
pub fn score(
    graph: &SkillGraph,
    category_weights: &BTreeMap<String, f64>,
    config: &Config,
    as_of: DateTime<Utc>,
) -> ReadinessReport {
    let tuning = &config.scoring;

    let mut category_scores = BTreeMap::new();
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for (category, weight) in category_weights {
        if *weight <= 0.0 {
            continue;
        }
        let members = config.categories.get(category);
        let category_score = match members {
            Some(tags) if !tags.is_empty() => {
                let sum: f64 = tags
                    .iter()
                    .map(|tag| graph.normalized_score(tag, as_of, tuning))
                    .sum();
                100.0 * sum / tags.len() as f64
            }
            // A weighted category the config knows nothing about scores zero
            // rather than erroring; the weight still dilutes the overall.
            _ => 0.0,
        };
        category_scores.insert(category.clone(), category_score);
        weighted_sum += weight * category_score;
        weight_total += weight;
    }

    let overall_score = if weight_total > 0.0 {
        (weighted_sum / weight_total).clamp(0.0, 100.0)
    } else {
        0.0
    };

    ReadinessReport {
        overall_score,
        category_scores,
        gaps: gaps(graph, config, as_of),
        generated_at: as_of,
        narrative: None,
        narrative_status: NarrativeStatus::Disabled,
    }
}

/// Surface "should-know-but-doesn't" tags: the learner's evidenced tags point
/// at them through prerequisite edges, yet their own score is below the gap
/// threshold. Strongest prerequisite support first, then weakest own score,
/// then tag name for a stable order.
fn gaps(graph: &SkillGraph, config: &Config, as_of: DateTime<Utc>) -> Vec<String> {
    let tuning = &config.scoring;

    // Max prerequisite strength per dependent tag, counting only
    // well-evidenced prerequisites.
    let mut support: BTreeMap<&str, f64> = BTreeMap::new();
    for edge in graph.edges() {
        if edge.relation != Relation::Prerequisite {
            continue;
        }
        let strength = graph.normalized_score(&edge.from, as_of, tuning);
        if strength < tuning.prerequisite_threshold {
            continue;
        }
        let entry = support.entry(edge.to.as_str()).or_insert(0.0);
        if strength > *entry {
            *entry = strength;
        }
    }

    let mut candidates: Vec<(String, f64, f64)> = support
        .into_iter()
        .filter_map(|(tag, strength)| {
            let own = graph.normalized_score(tag, as_of, tuning);
            if own < tuning.gap_threshold {
                Some((tag.to_string(), strength, own))
            } else {
                None
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.2.partial_cmp(&b.2).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.0.cmp(&b.0))
    });

    candidates.into_iter().map(|(tag, _, _)| tag).collect()
}
