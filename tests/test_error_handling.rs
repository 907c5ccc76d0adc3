// Failure-path tests: bad configuration, bad provider setup, degraded
// narrative. The numeric pipeline must stay usable through all of them.
use chrono::{TimeZone, Utc};
use skillgraph::config::Config;
use skillgraph::engine::Engine;
use skillgraph::error::EngineError;
use skillgraph::llm::factory;
use skillgraph::sources::RawRecord;
use std::env;

#[test]
fn test_engine_rejects_empty_weight_table() {
    let mut config = Config::default();
    config.weights.clear();
    let err = Engine::new(config).unwrap_err();
    assert!(matches!(err, EngineError::InvalidConfiguration(_)));
    assert!(err.to_string().contains("weight table"));
}

#[test]
fn test_engine_rejects_self_edge() {
    let mut config = Config::default();
    config.edges[0].to = config.edges[0].from.clone();
    assert!(Engine::new(config).is_err());
}

#[test]
fn test_engine_rejects_unknown_provider() {
    let mut config = Config::default();
    config.llm.provider = "carrier-pigeon".to_string();
    let err = Engine::new(config).unwrap_err();
    assert!(err.to_string().contains("carrier-pigeon"));
}

#[test]
fn test_toml_with_bad_scoring_is_rejected_at_engine_construction() {
    let config: Config = toml::from_str(
        r#"
        [scoring]
        propagation_factor = 2.0
        "#,
    )
    .unwrap();
    assert!(Engine::new(config).is_err());
}

#[test]
fn test_missing_anthropic_key_fails_client_creation() {
    let mut config = Config::default();
    config.llm.provider = "anthropic".to_string();
    config.llm.api_key_env = Some("SKILLGRAPH_TEST_NONEXISTENT_KEY_12345".to_string());
    let result = factory::create_client(&config, false);
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("API key not found"));
    }
}

#[test]
fn test_missing_groq_key_is_tolerated() {
    // openai-compatible endpoints may be local and keyless.
    let mut config = Config::default();
    config.llm.api_key_env = Some("SKILLGRAPH_TEST_NONEXISTENT_KEY_67890".to_string());
    assert!(factory::create_client(&config, false).is_ok());
}

#[test]
fn test_factory_rejects_unknown_provider() {
    let mut config = Config::default();
    config.llm.provider = "mystery".to_string();
    config.llm.api_key_env = Some("SKILLGRAPH_TEST_ERR_DUMMY".to_string());
    env::set_var("SKILLGRAPH_TEST_ERR_DUMMY", "k");
    let result = factory::create_client(&config, false);
    env::remove_var("SKILLGRAPH_TEST_ERR_DUMMY");
    assert!(result.is_err());
}

#[tokio::test]
async fn test_unknown_activity_kind_skips_record_only() {
    // A weight table that knows nothing about GitHub pushes.
    let mut config = Config::default();
    config
        .weights
        .retain(|r| !matches!(r.source, skillgraph::signal::Source::Github));
    let engine = Engine::new(config).unwrap();

    let push: RawRecord = serde_json::from_str(
        r#"{"source": "github", "id": "1", "type": "PushEvent",
            "languages": ["Rust"], "created_at": "2024-01-01T00:00:00Z"}"#,
    )
    .unwrap();
    let solve: RawRecord = serde_json::from_str(
        r#"{"source": "leetcode", "id": "2", "titleSlug": "two-sum",
            "statusDisplay": "Accepted", "difficulty": "Easy",
            "topicTags": [{"slug": "arrays"}]}"#,
    )
    .unwrap();

    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let result = engine.ingest("alice", &[push.clone(), solve], t0).await;
    assert_eq!(result.accepted, 1);
    assert_eq!(result.skipped.len(), 1);
    assert!(result.skipped[0].reason.contains("no weight rule"));

    // The rejected record was not marked seen; fixing the weight table makes
    // it ingestable on the next pass.
    let engine = Engine::new(Config::default()).unwrap();
    let result = engine.ingest("alice", &[push], t0).await;
    assert_eq!(result.accepted, 1);
}

#[tokio::test]
async fn test_narrative_timeout_degrades_softly() {
    use async_trait::async_trait;
    use skillgraph::llm::client::LlmClient;
    use skillgraph::scorer::NarrativeStatus;

    struct StallingClient;

    #[async_trait]
    impl LlmClient for StallingClient {
        async fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            tokio::time::sleep(std::time::Duration::from_secs(120)).await;
            Ok("never".to_string())
        }
    }

    let mut config = Config::default();
    config.llm.timeout_secs = 0;
    let engine = Engine::new(config).unwrap();

    let solve: RawRecord = serde_json::from_str(
        r#"{"source": "leetcode", "id": "1", "titleSlug": "two-sum",
            "statusDisplay": "Accepted", "difficulty": "Easy",
            "topicTags": [{"slug": "arrays"}]}"#,
    )
    .unwrap();
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    engine.ingest("alice", &[solve], t0).await;

    let weights = engine.config().default_category_weights();
    let report = engine
        .get_report_with_narrative("alice", &weights, t0, &StallingClient)
        .await;

    assert_eq!(report.narrative_status, NarrativeStatus::Unavailable);
    assert!(report.narrative.is_none());
    assert!(report.overall_score > 0.0);
}
