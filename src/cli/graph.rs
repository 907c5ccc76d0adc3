use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::engine::Engine;
use crate::graph::SkillGraph;

#[derive(Serialize)]
struct GraphDump {
    learner: String,
    graph: SkillGraph,
    dna: Vec<(String, f64)>,
    badges: Vec<String>,
}

/// Ingest the given snapshots and print the learner's graph, skill DNA, and
/// unlocked badges as JSON.
pub async fn run(
    learner: String,
    github: Option<String>,
    leetcode: Option<String>,
    config_path: Option<String>,
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
    }

    let graph = engine.get_graph_snapshot(&learner).await;
    let dna = graph.dna(as_of, &engine.config().scoring);
    let badges = engine.get_unlocked_badges(&learner).await;

    let dump = GraphDump {
        learner,
        graph,
        dna,
        badges,
    };
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}
