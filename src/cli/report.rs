use anyhow::{Context, Result};
use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::engine::Engine;
use crate::llm::factory;

/// Ingest the given snapshots and print the readiness report as JSON.
pub async fn run(
    learner: String,
    github: Option<String>,
    leetcode: Option<String>,
    config_path: Option<String>,
    narrative: bool,
    dry_run: bool,
) -> Result<()> {
    let config = Config::load_with_path(config_path)?;
    let engine = Engine::new(config).context("invalid configuration")?;

    let records = super::load_records(github.as_deref(), leetcode.as_deref())?;
    let as_of = Utc::now();

    if !records.is_empty() {
        let result = engine.ingest(&learner, &records, as_of).await;
        info!(
            "Ingested {} record(s) for {} ({} skipped)",
            result.accepted,
            learner,
            result.skipped.len()
        );
        for skipped in &result.skipped {
            eprintln!("  skipped {}: {}", skipped.raw_ref, skipped.reason);
        }
    }

    let weights = engine.config().default_category_weights();
    let report = if narrative {
        let client = factory::create_client(engine.config(), dry_run)?;
        engine
            .get_report_with_narrative(&learner, &weights, as_of, client.as_ref())
            .await
    } else {
        engine.get_report(&learner, &weights, as_of).await
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
