//! Converts heterogeneous source records into the common `ActivitySignal`
//! shape. Tolerates partial upstream payloads where a documented default
//! exists; rejects records that cannot be identified or classified at all.

use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeSet;
use tracing::warn;

use crate::error::EngineError;
use crate::signal::{ActivityKind, ActivitySignal, Difficulty, Source};
use crate::sources::github::GithubEvent;
use crate::sources::leetcode::LeetcodeSubmission;
use crate::sources::RawRecord;

/// Normalize one raw record. `as_of` is the batch time, used as the fallback
/// timestamp when the upstream record omits its own.
pub fn normalize(record: &RawRecord, as_of: DateTime<Utc>) -> Result<ActivitySignal, EngineError> {
    match record {
        RawRecord::Github(event) => normalize_github(event, as_of),
        RawRecord::Leetcode(submission) => normalize_leetcode(submission, as_of),
    }
}

fn normalize_github(event: &GithubEvent, as_of: DateTime<Utc>) -> Result<ActivitySignal, EngineError> {
    let raw_ref = event.id.clone().ok_or_else(|| EngineError::UnsupportedFormat {
        platform: Source::Github,
        reason: "missing event id".to_string(),
    })?;

    let event_type = event.event_type.as_deref().ok_or_else(|| {
        EngineError::UnsupportedFormat {
            platform: Source::Github,
            reason: format!("event {} has no type", raw_ref),
        }
    })?;

    let kind = match event_type {
        "PushEvent" => ActivityKind::Commit,
        "PullRequestEvent" => ActivityKind::PullRequest,
        "PullRequestReviewEvent" | "PullRequestReviewCommentEvent" => ActivityKind::CodeReview,
        other => {
            return Err(EngineError::UnsupportedFormat {
                platform: Source::Github,
                reason: format!("unrecognized event type '{}'", other),
            })
        }
    };

    let timestamp = match event.created_at.as_deref() {
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(dt) => dt.with_timezone(&Utc),
            Err(_) => {
                warn!("github event {}: unparsable created_at '{}', using batch time", raw_ref, raw);
                as_of
            }
        },
        None => {
            warn!("github event {}: missing created_at, using batch time", raw_ref);
            as_of
        }
    };

    let tags: BTreeSet<String> = event
        .languages
        .iter()
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .collect();

    Ok(ActivitySignal {
        source: Source::Github,
        kind,
        tags,
        difficulty: Difficulty::Unknown,
        timestamp,
        raw_ref,
    })
}

fn normalize_leetcode(
    submission: &LeetcodeSubmission,
    as_of: DateTime<Utc>,
) -> Result<ActivitySignal, EngineError> {
    let raw_ref = submission.display_ref();
    if raw_ref == "<no id>" {
        return Err(EngineError::UnsupportedFormat {
            platform: Source::Leetcode,
            reason: "submission has no id, slug, or timestamp".to_string(),
        });
    }

    // The accepted-submissions endpoint omits statusDisplay entirely, so a
    // missing status defaults to solved. Any explicit non-accepted status
    // normalizes to an attempt.
    let kind = match submission.status_display.as_deref() {
        None | Some("Accepted") => ActivityKind::ProblemSolved,
        Some(_) => ActivityKind::ProblemAttempted,
    };

    let timestamp = match submission.timestamp.as_deref() {
        Some(raw) => match raw.parse::<i64>().ok().and_then(|s| Utc.timestamp_opt(s, 0).single()) {
            Some(dt) => dt,
            None => {
                warn!("leetcode submission {}: unparsable timestamp '{}', using batch time", raw_ref, raw);
                as_of
            }
        },
        None => {
            warn!("leetcode submission {}: missing timestamp, using batch time", raw_ref);
            as_of
        }
    };

    let tags: BTreeSet<String> = submission
        .topic_tags
        .iter()
        .map(|t| t.slug.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    Ok(ActivitySignal {
        source: Source::Leetcode,
        kind,
        tags,
        difficulty: Difficulty::parse(submission.difficulty.as_deref()),
        timestamp,
        raw_ref,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    fn github_record(json: &str) -> RawRecord {
        RawRecord::Github(serde_json::from_str(json).unwrap())
    }

    fn leetcode_record(json: &str) -> RawRecord {
        RawRecord::Leetcode(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_push_event_becomes_commit() {
        let record = github_record(
            r#"{"id": "1", "type": "PushEvent", "created_at": "2024-02-20T10:00:00Z",
                "languages": ["Rust", "Python"]}"#,
        );
        let signal = normalize(&record, batch_time()).unwrap();
        assert_eq!(signal.source, Source::Github);
        assert_eq!(signal.kind, ActivityKind::Commit);
        assert!(signal.tags.contains("rust"));
        assert!(signal.tags.contains("python"));
        assert_eq!(signal.raw_ref, "1");
    }

    #[test]
    fn test_unrecognized_event_type_is_unsupported() {
        let record = github_record(r#"{"id": "2", "type": "WatchEvent"}"#);
        let err = normalize(&record, batch_time()).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat { platform: Source::Github, .. }));
        assert!(err.to_string().contains("WatchEvent"));
    }

    #[test]
    fn test_missing_event_id_is_unsupported() {
        let record = github_record(r#"{"type": "PushEvent"}"#);
        assert!(matches!(
            normalize(&record, batch_time()),
            Err(EngineError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_missing_created_at_falls_back_to_batch_time() {
        let record = github_record(r#"{"id": "3", "type": "PushEvent"}"#);
        let signal = normalize(&record, batch_time()).unwrap();
        assert_eq!(signal.timestamp, batch_time());
    }

    #[test]
    fn test_accepted_submission_becomes_problem_solved() {
        let record = leetcode_record(
            r#"{"id": "9", "titleSlug": "climbing-stairs", "statusDisplay": "Accepted",
                "difficulty": "Medium", "topicTags": [{"slug": "dynamic-programming"}],
                "timestamp": "1709294400"}"#,
        );
        let signal = normalize(&record, batch_time()).unwrap();
        assert_eq!(signal.kind, ActivityKind::ProblemSolved);
        assert_eq!(signal.difficulty, Difficulty::Medium);
        assert!(signal.tags.contains("dynamic-programming"));
        assert_eq!(signal.timestamp, Utc.timestamp_opt(1_709_294_400, 0).unwrap());
    }

    #[test]
    fn test_rejected_submission_becomes_attempt() {
        let record = leetcode_record(
            r#"{"id": "10", "titleSlug": "two-sum", "statusDisplay": "Wrong Answer"}"#,
        );
        let signal = normalize(&record, batch_time()).unwrap();
        assert_eq!(signal.kind, ActivityKind::ProblemAttempted);
    }

    #[test]
    fn test_missing_status_defaults_to_solved() {
        let record = leetcode_record(r#"{"id": "11", "titleSlug": "two-sum"}"#);
        let signal = normalize(&record, batch_time()).unwrap();
        assert_eq!(signal.kind, ActivityKind::ProblemSolved);
    }

    #[test]
    fn test_missing_difficulty_defaults_to_unknown() {
        let record = leetcode_record(r#"{"id": "12", "titleSlug": "two-sum"}"#);
        let signal = normalize(&record, batch_time()).unwrap();
        assert_eq!(signal.difficulty, Difficulty::Unknown);
    }

    #[test]
    fn test_unidentifiable_submission_is_unsupported() {
        let record = leetcode_record("{}");
        assert!(matches!(
            normalize(&record, batch_time()),
            Err(EngineError::UnsupportedFormat { platform: Source::Leetcode, .. })
        ));
    }

    #[test]
    fn test_tags_are_lowercased_and_deduplicated() {
        let record = github_record(
            r#"{"id": "4", "type": "PushEvent", "languages": ["Rust", "rust", " RUST "]}"#,
        );
        let signal = normalize(&record, batch_time()).unwrap();
        assert_eq!(signal.tags.len(), 1);
    }
}
