//! LeetCode submission shape as returned by the GraphQL recent-submissions
//! query, enriched by the fetcher with the question's topic tags and
//! difficulty.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeetcodeSubmission {
    /// Submission id. Some endpoints omit it; `display_ref` then synthesizes
    /// one from the slug and timestamp.
    pub id: Option<String>,

    pub title_slug: Option<String>,

    /// "Accepted", "Wrong Answer", "Time Limit Exceeded", ...
    pub status_display: Option<String>,

    /// "Easy" / "Medium" / "Hard", attached by the fetcher from the question
    /// metadata. Missing on some endpoints.
    pub difficulty: Option<String>,

    /// Topic tags for the question, e.g. "dynamic-programming".
    #[serde(default)]
    pub topic_tags: Vec<TopicTag>,

    /// Unix epoch seconds, as a string (that is how the GraphQL API ships it).
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicTag {
    pub slug: String,
}

impl LeetcodeSubmission {
    pub fn display_ref(&self) -> String {
        if let Some(ref id) = self.id {
            return id.clone();
        }
        match (&self.title_slug, &self.timestamp) {
            (Some(slug), Some(ts)) => format!("{}@{}", slug, ts),
            (Some(slug), None) => slug.clone(),
            _ => "<no id>".to_string(),
        }
    }
}
