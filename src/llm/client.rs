use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

pub struct MockLlmClient;

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        // Canned commentary for dry runs; shaped like the real synthesizer
        // output so downstream rendering can be exercised offline.
        if prompt.contains("interview-readiness") {
            Ok("Strengths: steady dynamic-programming practice with consistent \
                recent activity, and solid array fundamentals backed by a broad \
                evidence base.\n\nGaps: graph traversal is under-practiced \
                relative to its prerequisites; a short focused block of \
                breadth-first-search problems would close the widest gap."
                .to_string())
        } else {
            Ok("mock response".to_string())
        }
    }
}
