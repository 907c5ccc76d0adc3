use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::badges::BadgeRule;
use crate::error::EngineError;
use crate::graph::{Relation, SkillEdge};
use crate::signal::{ActivityKind, Difficulty, Source};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,

    /// Contribution per (source, kind, difficulty). Rules without a
    /// difficulty act as the fallback for their (source, kind).
    #[serde(default = "default_weight_table")]
    pub weights: Vec<WeightRule>,

    /// Static inter-tag relations, shared read-only across all learners.
    #[serde(default = "default_edge_set")]
    pub edges: Vec<SkillEdge>,

    /// Category name -> member tags, for the readiness breakdown.
    #[serde(default = "default_categories")]
    pub categories: BTreeMap<String, Vec<String>>,

    /// Badge unlock rules over per-tag evidence counts.
    #[serde(default = "default_badges")]
    pub badges: Vec<BadgeRule>,
}

/// One row of the contribution weight table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightRule {
    pub source: Source,
    pub kind: ActivityKind,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    pub contribution: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>, // For OpenAI-compatible APIs (Groq, Ollama)

    /// Optional: Override max_tokens for narrative requests.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Hard deadline for one narrative call. The numeric report never waits
    /// longer than this on the model.
    #[serde(default = "default_narrative_timeout")]
    pub timeout_secs: u64,

    /// Narrative synthesis is an optional enrichment; disabling it leaves the
    /// numeric report untouched.
    #[serde(default = "default_true")]
    pub enable_narrative: bool,
}

impl LlmConfig {
    /// Get max_tokens value, using provider-specific default if not specified
    pub fn get_max_tokens(&self) -> u32 {
        if let Some(tokens) = self.max_tokens {
            return tokens;
        }
        match self.provider.as_str() {
            "anthropic" => 4096,
            "openai-compatible" => 2048, // groq, ollama and similar
            _ => 1024,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai-compatible".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key_env: Some("GROQ_API_KEY".to_string()),
            base_url: None,
            max_tokens: None,
            timeout_secs: default_narrative_timeout(),
            enable_narrative: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Score half-life in days; decay rate is ln 2 / half_life_days.
    #[serde(default = "default_half_life_days")]
    pub half_life_days: f64,

    /// Fraction of a direct contribution credited one hop along related and
    /// reverse-prerequisite edges.
    #[serde(default = "default_propagation_factor")]
    pub propagation_factor: f64,

    /// Score treated as full mastery; normalization saturates here.
    #[serde(default = "default_mastery_ceiling")]
    pub mastery_ceiling: f64,

    /// A tag below this normalized score is a gap candidate.
    #[serde(default = "default_gap_threshold")]
    pub gap_threshold: f64,

    /// A prerequisite at or above this normalized score counts as
    /// well-evidenced when surfacing gaps.
    #[serde(default = "default_prerequisite_threshold")]
    pub prerequisite_threshold: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            half_life_days: default_half_life_days(),
            propagation_factor: default_propagation_factor(),
            mastery_ceiling: default_mastery_ceiling(),
            gap_threshold: default_gap_threshold(),
            prerequisite_threshold: default_prerequisite_threshold(),
        }
    }
}

fn default_half_life_days() -> f64 {
    90.0
}

fn default_propagation_factor() -> f64 {
    0.25
}

fn default_mastery_ceiling() -> f64 {
    10.0
}

fn default_gap_threshold() -> f64 {
    0.3
}

fn default_prerequisite_threshold() -> f64 {
    0.6
}

fn default_narrative_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn rule(source: Source, kind: ActivityKind, difficulty: Option<Difficulty>, contribution: f64) -> WeightRule {
    WeightRule {
        source,
        kind,
        difficulty,
        contribution,
    }
}

fn default_weight_table() -> Vec<WeightRule> {
    use ActivityKind::*;
    use Source::*;
    vec![
        rule(Leetcode, ProblemSolved, Some(Difficulty::Easy), 1.0),
        rule(Leetcode, ProblemSolved, Some(Difficulty::Medium), 3.0),
        rule(Leetcode, ProblemSolved, Some(Difficulty::Hard), 5.0),
        rule(Leetcode, ProblemSolved, None, 2.0),
        rule(Leetcode, ProblemAttempted, None, 0.25),
        rule(Github, Commit, None, 0.5),
        rule(Github, PullRequest, None, 2.0),
        rule(Github, CodeReview, None, 1.0),
    ]
}

fn edge(from: &str, to: &str, relation: Relation, weight: f64) -> SkillEdge {
    SkillEdge {
        from: from.to_string(),
        to: to.to_string(),
        relation,
        weight,
    }
}

fn default_edge_set() -> Vec<SkillEdge> {
    use Relation::*;
    vec![
        edge("arrays", "two-pointers", Prerequisite, 1.0),
        edge("arrays", "sliding-window", Prerequisite, 1.0),
        edge("arrays", "dynamic-programming", Prerequisite, 0.8),
        edge("recursion", "dynamic-programming", Prerequisite, 1.0),
        edge("recursion", "backtracking", Prerequisite, 1.0),
        edge("trees", "graphs", Prerequisite, 0.8),
        edge("trees", "binary-search-tree", Prerequisite, 1.0),
        edge("sorting", "binary-search", Prerequisite, 0.8),
        edge("two-pointers", "sliding-window", Related, 1.0),
        edge("dynamic-programming", "greedy", Related, 0.6),
        edge("graphs", "breadth-first-search", Related, 1.0),
        edge("graphs", "depth-first-search", Related, 1.0),
    ]
}

fn default_categories() -> BTreeMap<String, Vec<String>> {
    let mut categories = BTreeMap::new();
    categories.insert(
        "algorithms".to_string(),
        vec![
            "dynamic-programming".to_string(),
            "greedy".to_string(),
            "backtracking".to_string(),
            "recursion".to_string(),
            "sorting".to_string(),
        ],
    );
    categories.insert(
        "data-structures".to_string(),
        vec![
            "arrays".to_string(),
            "hash-table".to_string(),
            "trees".to_string(),
            "graphs".to_string(),
            "binary-search-tree".to_string(),
        ],
    );
    categories.insert(
        "techniques".to_string(),
        vec![
            "two-pointers".to_string(),
            "sliding-window".to_string(),
            "binary-search".to_string(),
            "breadth-first-search".to_string(),
            "depth-first-search".to_string(),
        ],
    );
    categories.insert(
        "engineering".to_string(),
        vec![
            "rust".to_string(),
            "python".to_string(),
            "javascript".to_string(),
            "typescript".to_string(),
            "go".to_string(),
        ],
    );
    categories
}

fn default_badges() -> Vec<BadgeRule> {
    vec![
        BadgeRule::new("dp-initiate", "dynamic-programming", 5),
        BadgeRule::new("dp-grandmaster", "dynamic-programming", 50),
        BadgeRule::new("array-apprentice", "arrays", 10),
        BadgeRule::new("graph-explorer", "graphs", 10),
        BadgeRule::new("shipper", "rust", 25),
    ]
}

impl Config {
    /// Load config from repo root or user config directory
    #[allow(dead_code)]
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    /// Load configuration from a specific path, or use default search paths
    pub fn load_with_path(path: Option<String>) -> Result<Self> {
        // If explicit path provided, use it
        if let Some(config_path) = path {
            debug!("Loading config from explicit path: {}", config_path);
            return Self::load_from_path(&config_path);
        }

        // Try repo root first (per-deployment config)
        if let Ok(config) = Self::load_from_path("skillgraph.toml") {
            debug!("Loaded config from ./skillgraph.toml");
            return Ok(config);
        }

        // Try user config directory
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("skillgraph").join("config.toml");
            if let Ok(config) = Self::load_from_path(&config_path) {
                debug!("Loaded config from {:?}", config_path);
                return Ok(config);
            }
        }

        // Return defaults
        debug!("Using default config");
        Ok(Self::default())
    }

    fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get API key from environment variable specified in config
    pub fn get_api_key(&self) -> Result<String> {
        match &self.llm.api_key_env {
            Some(env_var) => {
                // Special case: "none" means no API key needed (e.g., local Ollama)
                if env_var.to_lowercase() == "none" {
                    return Ok(String::new());
                }

                // openai-compatible: try env var but don't error if missing
                // (local models don't need keys, gateways like Groq do)
                if self.llm.provider == "openai-compatible" {
                    return Ok(env::var(env_var).unwrap_or_default());
                }

                env::var(env_var).map_err(|_| {
                    anyhow::anyhow!("API key not found in environment variable: {}", env_var)
                })
            }
            None => Ok(String::new()), // No API key needed
        }
    }

    /// Equal weight for every configured category; the default weighting when
    /// the caller does not supply its own.
    pub fn default_category_weights(&self) -> BTreeMap<String, f64> {
        self.categories.keys().map(|c| (c.clone(), 1.0)).collect()
    }

    /// Startup validation. A config that fails here must never serve a
    /// request.
    pub fn validate(&self) -> Result<(), EngineError> {
        let fail = |reason: String| Err(EngineError::InvalidConfiguration(reason));

        match self.llm.provider.as_str() {
            "anthropic" | "openai-compatible" => {}
            other => return fail(format!("unknown llm provider '{}'", other)),
        }

        if self.weights.is_empty() {
            return fail("weight table is empty".to_string());
        }
        for rule in &self.weights {
            if !rule.contribution.is_finite() || rule.contribution < 0.0 {
                return fail(format!(
                    "weight rule ({}, {}) has invalid contribution {}",
                    rule.source, rule.kind, rule.contribution
                ));
            }
        }

        for edge in &self.edges {
            if edge.from.is_empty() || edge.to.is_empty() {
                return fail("edge with empty tag".to_string());
            }
            if edge.from == edge.to {
                return fail(format!("self-edge on tag '{}'", edge.from));
            }
            if !edge.weight.is_finite() || edge.weight <= 0.0 {
                return fail(format!(
                    "edge {} -> {} has invalid weight {}",
                    edge.from, edge.to, edge.weight
                ));
            }
        }

        let s = &self.scoring;
        if !s.half_life_days.is_finite() || s.half_life_days <= 0.0 {
            return fail(format!("half_life_days must be positive, got {}", s.half_life_days));
        }
        if !(0.0..=1.0).contains(&s.propagation_factor) {
            return fail(format!(
                "propagation_factor must be in [0, 1], got {}",
                s.propagation_factor
            ));
        }
        if !s.mastery_ceiling.is_finite() || s.mastery_ceiling <= 0.0 {
            return fail(format!("mastery_ceiling must be positive, got {}", s.mastery_ceiling));
        }
        if !(0.0..1.0).contains(&s.gap_threshold) {
            return fail(format!("gap_threshold must be in [0, 1), got {}", s.gap_threshold));
        }
        if !(0.0..1.0).contains(&s.prerequisite_threshold) {
            return fail(format!(
                "prerequisite_threshold must be in [0, 1), got {}",
                s.prerequisite_threshold
            ));
        }

        for (category, tags) in &self.categories {
            if tags.is_empty() {
                return fail(format!("category '{}' has no member tags", category));
            }
            if tags.iter().any(|t| t.is_empty()) {
                return fail(format!("category '{}' contains an empty tag", category));
            }
        }

        let mut badge_ids = std::collections::HashSet::new();
        for badge in &self.badges {
            if badge.id.is_empty() || badge.tag.is_empty() {
                return fail("badge rule with empty id or tag".to_string());
            }
            if !badge_ids.insert(badge.id.as_str()) {
                return fail(format!("duplicate badge id '{}'", badge.id));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            scoring: ScoringConfig::default(),
            weights: default_weight_table(),
            edges: default_edge_set(),
            categories: default_categories(),
            badges: default_badges(),
        }
    }
}
