//! Engine facade: the boundary the presentation layer and fetchers talk to.
//!
//! Batch ingestion runs the pure pipeline stages (normalize, extract) first,
//! then applies the surviving contributions to the learner's graph in one
//! locked step. Graph mutation is serialized per learner through a dedicated
//! async mutex; batches for different learners never contend beyond the
//! registry lookup.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::badges;
use crate::config::Config;
use crate::error::EngineError;
use crate::graph::{SkillEdge, SkillGraph};
use crate::llm::client::LlmClient;
use crate::narrative;
use crate::pipeline::{extractor, normalizer};
use crate::scorer::{self, NarrativeStatus, ReadinessReport};
use crate::signal::Source;
use crate::sources::RawRecord;

/// Per-signal outcome accounting for one ingestion call.
#[derive(Debug, Clone, Serialize)]
pub struct IngestResult {
    pub accepted: usize,
    pub skipped: Vec<SkippedRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkippedRecord {
    pub raw_ref: String,
    pub reason: String,
}

#[derive(Debug)]
struct LearnerState {
    graph: SkillGraph,
    seen: HashSet<(Source, String)>,
}

#[derive(Debug)]
pub struct Engine {
    config: Arc<Config>,
    edges: Arc<Vec<SkillEdge>>,
    learners: Mutex<HashMap<String, Arc<AsyncMutex<LearnerState>>>>,
}

impl Engine {
    /// Validates the configuration before serving anything; a bad weight
    /// table or edge set is fatal here, not at request time.
    pub fn new(config: Config) -> Result<Self, EngineError> {
        config.validate()?;
        let edges = Arc::new(config.edges.clone());
        Ok(Self {
            config: Arc::new(config),
            edges,
            learners: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn learner_entry(&self, learner_id: &str) -> Arc<AsyncMutex<LearnerState>> {
        let mut learners = self
            .learners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        learners
            .entry(learner_id.to_string())
            .or_insert_with(|| {
                debug!("Creating graph for learner {}", learner_id);
                Arc::new(AsyncMutex::new(LearnerState {
                    graph: SkillGraph::new(Arc::clone(&self.edges)),
                    seen: HashSet::new(),
                }))
            })
            .clone()
    }

    fn existing_learner(&self, learner_id: &str) -> Option<Arc<AsyncMutex<LearnerState>>> {
        let learners = self
            .learners
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        learners.get(learner_id).cloned()
    }

    /// Ingest one batch of raw records for a learner. Per-record failures are
    /// recovered locally and reported in the result; one bad record never
    /// blocks the rest of the batch. Re-ingesting an already-seen record is a
    /// recorded no-op.
    pub async fn ingest(
        &self,
        learner_id: &str,
        records: &[RawRecord],
        as_of: DateTime<Utc>,
    ) -> IngestResult {
        // Pure stages first, outside any lock.
        let mut skipped = Vec::new();
        let mut normalized = Vec::new();
        for record in records {
            match normalizer::normalize(record, as_of) {
                Ok(signal) => normalized.push(signal),
                Err(e) => {
                    warn!("Skipping record {}: {}", record.display_ref(), e);
                    skipped.push(SkippedRecord {
                        raw_ref: record.display_ref(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        // Dedup and apply under the learner's exclusive-update lock.
        let state = self.learner_entry(learner_id);
        let mut state = state.lock().await;

        let mut accepted = 0usize;
        let mut batch: Vec<(String, f64)> = Vec::new();
        for signal in normalized {
            let identity = (signal.source, signal.raw_ref.clone());
            if state.seen.contains(&identity) {
                debug!("Duplicate record {} from {}, no-op", signal.raw_ref, signal.source);
                skipped.push(SkippedRecord {
                    raw_ref: signal.raw_ref.clone(),
                    reason: "duplicate".to_string(),
                });
                continue;
            }

            match extractor::extract(&signal, &self.config.weights) {
                Ok(contributions) => {
                    batch.extend(contributions);
                    state.seen.insert(identity);
                    accepted += 1;
                }
                Err(e) => {
                    // Not marked seen: a later weight-table fix makes the
                    // record ingestable again.
                    warn!("Skipping signal {}: {}", signal.raw_ref, e);
                    skipped.push(SkippedRecord {
                        raw_ref: signal.raw_ref,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !batch.is_empty() {
            state.graph.apply_batch(&batch, as_of, &self.config.scoring);
        }

        info!(
            "Ingested batch for {}: accepted={} skipped={}",
            learner_id,
            accepted,
            skipped.len()
        );
        IngestResult { accepted, skipped }
    }

    /// Numeric readiness report. Never touches the narrative collaborator.
    pub async fn get_report(
        &self,
        learner_id: &str,
        category_weights: &BTreeMap<String, f64>,
        as_of: DateTime<Utc>,
    ) -> ReadinessReport {
        let snapshot = self.get_graph_snapshot(learner_id).await;
        scorer::score(&snapshot, category_weights, &self.config, as_of)
    }

    /// Numeric report plus best-effort narrative. A narrative failure is
    /// soft: the report comes back with `narrative_status: unavailable`.
    pub async fn get_report_with_narrative(
        &self,
        learner_id: &str,
        category_weights: &BTreeMap<String, f64>,
        as_of: DateTime<Utc>,
        client: &dyn LlmClient,
    ) -> ReadinessReport {
        let snapshot = self.get_graph_snapshot(learner_id).await;
        let mut report = scorer::score(&snapshot, category_weights, &self.config, as_of);

        if !self.config.llm.enable_narrative {
            return report;
        }

        match narrative::synthesize(client, &report, &snapshot, &self.config).await {
            Ok(text) => {
                report.narrative = Some(text);
                report.narrative_status = NarrativeStatus::Ready;
            }
            Err(e) => {
                warn!("Narrative degraded for {}: {}", learner_id, e);
                report.narrative_status = NarrativeStatus::Unavailable;
            }
        }
        report
    }

    /// Read-only graph clone for visualization and badge consumers. An
    /// unknown learner gets an empty graph, not an error.
    pub async fn get_graph_snapshot(&self, learner_id: &str) -> SkillGraph {
        match self.existing_learner(learner_id) {
            Some(state) => state.lock().await.graph.clone(),
            None => SkillGraph::new(Arc::clone(&self.edges)),
        }
    }

    /// Badge ids the learner has unlocked under the configured rules.
    pub async fn get_unlocked_badges(&self, learner_id: &str) -> Vec<String> {
        let snapshot = self.get_graph_snapshot(learner_id).await;
        badges::unlocked(&snapshot, &self.config.badges)
    }
}
