//! Narrative synthesis: sends the derived report summary to the
//! text-generation collaborator and returns plain-text commentary.
//!
//! This is the only operation in the engine that suspends on external I/O. It
//! runs under a hard timeout and every failure collapses into
//! `NarrativeUnavailable`; the numeric report is computed before this step and
//! is never invalidated by it.

use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::EngineError;
use crate::graph::SkillGraph;
use crate::llm::client::LlmClient;
use crate::llm::prompts;
use crate::scorer::ReadinessReport;

pub async fn synthesize(
    client: &dyn LlmClient,
    report: &ReadinessReport,
    graph: &SkillGraph,
    config: &Config,
) -> Result<String, EngineError> {
    let prompt = prompts::narrative_prompt(report, graph, config);
    let deadline = Duration::from_secs(config.llm.timeout_secs);

    debug!("Requesting narrative (timeout {:?})", deadline);

    let completion = tokio::time::timeout(deadline, client.complete(&prompt)).await;

    match completion {
        Err(_) => Err(EngineError::NarrativeUnavailable(format!(
            "timed out after {}s",
            config.llm.timeout_secs
        ))),
        Ok(Err(e)) => Err(EngineError::NarrativeUnavailable(e.to_string())),
        Ok(Ok(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Err(EngineError::NarrativeUnavailable(
                    "empty response from model".to_string(),
                ))
            } else {
                Ok(trimmed.to_string())
            }
        }
    }
}
