//! Native record shapes returned by the activity fetchers.
//!
//! The engine never fetches anything itself; collaborators hand it
//! already-fetched snapshots in the platforms' own JSON shapes, and the
//! normalizer turns them into `ActivitySignal`s.

pub mod github;
pub mod leetcode;

use serde::{Deserialize, Serialize};

use crate::signal::Source;

/// A raw record from one of the supported platforms, tagged by source so a
/// mixed batch can be ingested in one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum RawRecord {
    Github(github::GithubEvent),
    Leetcode(leetcode::LeetcodeSubmission),
}

impl RawRecord {
    pub fn source(&self) -> Source {
        match self {
            RawRecord::Github(_) => Source::Github,
            RawRecord::Leetcode(_) => Source::Leetcode,
        }
    }

    /// Best-effort identifier for skip reporting. Falls back to a placeholder
    /// when the upstream record carries no usable id at all.
    pub fn display_ref(&self) -> String {
        match self {
            RawRecord::Github(e) => e.id.clone().unwrap_or_else(|| "<no id>".to_string()),
            RawRecord::Leetcode(s) => s.display_ref(),
        }
    }
}
