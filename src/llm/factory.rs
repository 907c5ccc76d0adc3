use anyhow::{bail, Result};

use super::client::LlmClient;
use super::client::MockLlmClient;
use super::client_impl::{AnthropicClient, OpenAIClient};
use crate::config::Config;

/// Default base URL for the openai-compatible provider; the platform's
/// narrative collaborator runs on Groq.
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Create an LLM client based on configuration
pub fn create_client(config: &Config, dry_run: bool) -> Result<Box<dyn LlmClient>> {
    if dry_run {
        return Ok(Box::new(MockLlmClient::new()));
    }

    let api_key = config.get_api_key()?;
    let max_tokens = config.llm.get_max_tokens();
    let timeout_secs = config.llm.timeout_secs;

    match config.llm.provider.as_str() {
        "anthropic" => Ok(Box::new(AnthropicClient::new(
            api_key,
            config.llm.model.clone(),
            max_tokens,
            timeout_secs,
        )?)),

        "openai-compatible" => {
            let base_url = config
                .llm
                .base_url
                .clone()
                .unwrap_or_else(|| GROQ_BASE_URL.to_string());

            Ok(Box::new(OpenAIClient::with_base_url(
                api_key,
                config.llm.model.clone(),
                base_url,
                max_tokens,
                timeout_secs,
            )?))
        }

        unknown => bail!("Unknown LLM provider: {}", unknown),
    }
}
