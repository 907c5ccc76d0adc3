//! Prompt construction for the narrative synthesizer.

use crate::config::Config;
use crate::graph::SkillGraph;
use crate::scorer::ReadinessReport;

/// Build the structured summary sent to the text-generation collaborator.
/// Only derived numbers go in, never raw records or learner identifiers.
pub fn narrative_prompt(report: &ReadinessReport, graph: &SkillGraph, config: &Config) -> String {
    let categories = report
        .category_scores
        .iter()
        .map(|(name, score)| format!("- {}: {:.0}/100", name, score))
        .collect::<Vec<_>>()
        .join("\n");

    let dna = graph.dna(report.generated_at, &config.scoring);
    let strengths = dna
        .iter()
        .take(8)
        .map(|(tag, level)| format!("- {} (mastery {:.2})", tag, level))
        .collect::<Vec<_>>()
        .join("\n");

    let gaps = if report.gaps.is_empty() {
        "- none detected".to_string()
    } else {
        report
            .gaps
            .iter()
            .take(5)
            .map(|tag| format!("- {}", tag))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"You are writing feedback for a software engineering candidate based on their interview-readiness report.

Overall interview-readiness score: {:.0}/100

Category breakdown:
{}

Strongest skills (normalized mastery, 1.0 = ceiling):
{}

Detected gaps (prerequisites known, skill itself weak — most pressing first):
{}

Write exactly two short paragraphs of plain text, no markdown, no lists:
1. Strengths: what this candidate can rely on in interviews, grounded in the skills above.
2. Gaps: what to practice next and why, referencing the detected gaps.

Be concrete and encouraging. Do not invent skills that are not listed. Do not mention scores verbatim more than once.
"#,
        report.overall_score, categories, strengths, gaps
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::scorer::NarrativeStatus;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn sample_report() -> ReadinessReport {
        ReadinessReport {
            overall_score: 62.0,
            category_scores: BTreeMap::from([
                ("algorithms".to_string(), 70.0),
                ("data-structures".to_string(), 54.0),
            ]),
            gaps: vec!["graphs".to_string()],
            generated_at: Utc::now(),
            narrative: None,
            narrative_status: NarrativeStatus::Disabled,
        }
    }

    #[test]
    fn test_prompt_includes_scores_and_gaps() {
        let config = Config::default();
        let mut graph = SkillGraph::new(Arc::new(vec![]));
        graph.apply_batch(
            &[("dynamic-programming".to_string(), 6.0)],
            Utc::now(),
            &ScoringConfig::default(),
        );

        let prompt = narrative_prompt(&sample_report(), &graph, &config);
        assert!(prompt.contains("62/100"));
        assert!(prompt.contains("algorithms: 70/100"));
        assert!(prompt.contains("- graphs"));
        assert!(prompt.contains("dynamic-programming"));
        assert!(prompt.contains("interview-readiness"));
    }

    #[test]
    fn test_prompt_handles_no_gaps() {
        let config = Config::default();
        let graph = SkillGraph::new(Arc::new(vec![]));
        let mut report = sample_report();
        report.gaps.clear();

        let prompt = narrative_prompt(&report, &graph, &config);
        assert!(prompt.contains("none detected"));
    }
}
