//! CLI subcommand drivers. Input files are already-fetched activity
//! snapshots in the platforms' native JSON shapes; the engine never fetches
//! anything itself.

pub mod config_check;
pub mod graph;
pub mod report;

use anyhow::{Context, Result};
use std::fs;

use crate::sources::github::GithubEvent;
use crate::sources::leetcode::LeetcodeSubmission;
use crate::sources::RawRecord;

/// Read the optional snapshot files into one mixed batch.
pub(crate) fn load_records(github: Option<&str>, leetcode: Option<&str>) -> Result<Vec<RawRecord>> {
    let mut records = Vec::new();

    if let Some(path) = github {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read GitHub snapshot {}", path))?;
        let events: Vec<GithubEvent> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse GitHub snapshot {}", path))?;
        records.extend(events.into_iter().map(RawRecord::Github));
    }

    if let Some(path) = leetcode {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read LeetCode snapshot {}", path))?;
        let submissions: Vec<LeetcodeSubmission> = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse LeetCode snapshot {}", path))?;
        records.extend(submissions.into_iter().map(RawRecord::Leetcode));
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_records_mixed_batch() {
        let mut github = tempfile::NamedTempFile::new().unwrap();
        write!(
            github,
            r#"[{{"id": "1", "type": "PushEvent", "languages": ["Rust"]}}]"#
        )
        .unwrap();

        let mut leetcode = tempfile::NamedTempFile::new().unwrap();
        write!(
            leetcode,
            r#"[{{"id": "2", "titleSlug": "two-sum", "statusDisplay": "Accepted"}}]"#
        )
        .unwrap();

        let records = load_records(
            Some(github.path().to_str().unwrap()),
            Some(leetcode.path().to_str().unwrap()),
        )
        .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_load_records_missing_file_errors() {
        let result = load_records(Some("/nonexistent/events.json"), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_records_nothing_given() {
        let records = load_records(None, None).unwrap();
        assert!(records.is_empty());
    }
}
