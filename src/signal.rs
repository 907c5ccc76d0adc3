//! Core activity types shared across the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Platform a raw record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Github,
    Leetcode,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Github => "github",
            Source::Leetcode => "leetcode",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized kind of learner activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    Commit,
    PullRequest,
    CodeReview,
    ProblemSolved,
    ProblemAttempted,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Commit => "commit",
            ActivityKind::PullRequest => "pull_request",
            ActivityKind::CodeReview => "code_review",
            ActivityKind::ProblemSolved => "problem_solved",
            ActivityKind::ProblemAttempted => "problem_attempted",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty bucket for problem-style activity.
///
/// `Unknown` is the documented default when the upstream API omits difficulty;
/// difficulty-specific weight rules never match it (the extractor falls back
/// to the difficulty-less rule for the same source/kind).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Unknown,
}

impl Difficulty {
    /// Parse the upstream difficulty field. LeetCode reports either a label
    /// ("Easy"/"Medium"/"Hard") or a numeric level (1..=3) depending on the
    /// endpoint; anything else maps to `Unknown`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("easy") | Some("1") => Difficulty::Easy,
            Some("medium") | Some("2") => Difficulty::Medium,
            Some("hard") | Some("3") => Difficulty::Hard,
            _ => Difficulty::Unknown,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// One normalized unit of learner activity. Immutable once created;
/// `(source, raw_ref)` identifies it for idempotent re-ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivitySignal {
    pub source: Source,
    pub kind: ActivityKind,
    pub tags: BTreeSet<String>,
    pub difficulty: Difficulty,
    pub timestamp: DateTime<Utc>,
    pub raw_ref: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parse_labels() {
        assert_eq!(Difficulty::parse(Some("Easy")), Difficulty::Easy);
        assert_eq!(Difficulty::parse(Some("medium")), Difficulty::Medium);
        assert_eq!(Difficulty::parse(Some("HARD")), Difficulty::Hard);
    }

    #[test]
    fn test_difficulty_parse_numeric_levels() {
        assert_eq!(Difficulty::parse(Some("1")), Difficulty::Easy);
        assert_eq!(Difficulty::parse(Some("2")), Difficulty::Medium);
        assert_eq!(Difficulty::parse(Some("3")), Difficulty::Hard);
    }

    #[test]
    fn test_difficulty_parse_missing_or_garbage() {
        assert_eq!(Difficulty::parse(None), Difficulty::Unknown);
        assert_eq!(Difficulty::parse(Some("")), Difficulty::Unknown);
        assert_eq!(Difficulty::parse(Some("extreme")), Difficulty::Unknown);
    }

    #[test]
    fn test_source_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Source::Github).unwrap(), "\"github\"");
        let s: Source = serde_json::from_str("\"leetcode\"").unwrap();
        assert_eq!(s, Source::Leetcode);
    }

    #[test]
    fn test_activity_kind_serde_snake_case() {
        assert_eq!(
            serde_json::to_string(&ActivityKind::ProblemSolved).unwrap(),
            "\"problem_solved\""
        );
    }
}
