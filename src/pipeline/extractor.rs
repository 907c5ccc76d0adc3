//! Maps normalized signals to per-tag contributions using the configured
//! weight table.

use tracing::debug;

use crate::config::WeightRule;
use crate::error::EngineError;
use crate::signal::{ActivitySignal, Difficulty};

/// Look up the contribution for a signal and fan it out to every tag the
/// signal carries. Each tag receives the full contribution; it is never split
/// across tags.
///
/// Lookup order: exact `(source, kind, difficulty)` rule first, then the
/// difficulty-less `(source, kind)` rule. `Difficulty::Unknown` never matches
/// a difficulty-specific rule, so unknown-difficulty signals only ever use the
/// fallback. No rule at all is `UnknownActivityKind`.
pub fn extract(
    signal: &ActivitySignal,
    weights: &[WeightRule],
) -> Result<Vec<(String, f64)>, EngineError> {
    let contribution = lookup(signal, weights).ok_or(EngineError::UnknownActivityKind {
        platform: signal.source,
        kind: signal.kind,
    })?;

    if signal.tags.is_empty() {
        debug!(
            "{} {} {} carries no tags, nothing to credit",
            signal.source, signal.kind, signal.raw_ref
        );
        return Ok(Vec::new());
    }

    Ok(signal
        .tags
        .iter()
        .map(|tag| (tag.clone(), contribution))
        .collect())
}

fn lookup(signal: &ActivitySignal, weights: &[WeightRule]) -> Option<f64> {
    if signal.difficulty != Difficulty::Unknown {
        let exact = weights.iter().find(|r| {
            r.source == signal.source
                && r.kind == signal.kind
                && r.difficulty == Some(signal.difficulty)
        });
        if let Some(rule) = exact {
            return Some(rule.contribution);
        }
    }

    weights
        .iter()
        .find(|r| r.source == signal.source && r.kind == signal.kind && r.difficulty.is_none())
        .map(|r| r.contribution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{ActivityKind, Source};
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn signal(source: Source, kind: ActivityKind, difficulty: Difficulty, tags: &[&str]) -> ActivitySignal {
        ActivitySignal {
            source,
            kind,
            tags: tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
            difficulty,
            timestamp: Utc::now(),
            raw_ref: "test".to_string(),
        }
    }

    fn table() -> Vec<WeightRule> {
        vec![
            WeightRule {
                source: Source::Leetcode,
                kind: ActivityKind::ProblemSolved,
                difficulty: Some(Difficulty::Medium),
                contribution: 3.0,
            },
            WeightRule {
                source: Source::Leetcode,
                kind: ActivityKind::ProblemSolved,
                difficulty: None,
                contribution: 2.0,
            },
            WeightRule {
                source: Source::Github,
                kind: ActivityKind::Commit,
                difficulty: None,
                contribution: 0.5,
            },
        ]
    }

    #[test]
    fn test_exact_difficulty_rule_wins() {
        let s = signal(Source::Leetcode, ActivityKind::ProblemSolved, Difficulty::Medium, &["dp"]);
        let out = extract(&s, &table()).unwrap();
        assert_eq!(out, vec![("dp".to_string(), 3.0)]);
    }

    #[test]
    fn test_unknown_difficulty_uses_fallback_rule() {
        let s = signal(Source::Leetcode, ActivityKind::ProblemSolved, Difficulty::Unknown, &["dp"]);
        let out = extract(&s, &table()).unwrap();
        assert_eq!(out, vec![("dp".to_string(), 2.0)]);
    }

    #[test]
    fn test_unlisted_difficulty_uses_fallback_rule() {
        // Hard has no specific rule, falls through to the difficulty-less one.
        let s = signal(Source::Leetcode, ActivityKind::ProblemSolved, Difficulty::Hard, &["dp"]);
        let out = extract(&s, &table()).unwrap();
        assert_eq!(out, vec![("dp".to_string(), 2.0)]);
    }

    #[test]
    fn test_every_tag_gets_full_contribution() {
        let s = signal(
            Source::Leetcode,
            ActivityKind::ProblemSolved,
            Difficulty::Medium,
            &["arrays", "two-pointers"],
        );
        let out = extract(&s, &table()).unwrap();
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|(_, c)| *c == 3.0));
    }

    #[test]
    fn test_missing_rule_is_unknown_activity_kind() {
        let s = signal(Source::Github, ActivityKind::PullRequest, Difficulty::Unknown, &["rust"]);
        let err = extract(&s, &table()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnknownActivityKind { platform: Source::Github, kind: ActivityKind::PullRequest }
        ));
    }

    #[test]
    fn test_tagless_signal_yields_nothing() {
        let s = signal(Source::Github, ActivityKind::Commit, Difficulty::Unknown, &[]);
        let out = extract(&s, &table()).unwrap();
        assert!(out.is_empty());
    }
}
