//! GitHub event shape as returned by the events API, plus the language list
//! the fetcher attaches from the repository metadata.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubEvent {
    /// Event id from the events API. Required for deduplication.
    pub id: Option<String>,

    /// Event type string, e.g. "PushEvent", "PullRequestEvent".
    #[serde(rename = "type")]
    pub event_type: Option<String>,

    #[serde(default)]
    pub repo: Option<GithubRepo>,

    /// ISO-8601 creation time, e.g. "2024-03-01T12:00:00Z".
    pub created_at: Option<String>,

    /// Repository languages, attached by the fetcher (not part of the raw
    /// events payload). Become skill tags after lowercasing.
    #[serde(default)]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubRepo {
    pub name: String,
}
