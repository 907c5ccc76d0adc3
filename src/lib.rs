//! skillgraph - Skill-profile aggregation and interview-readiness scoring
//!
//! Ingests a learner's coding-platform activity (GitHub events, LeetCode
//! submissions), derives a decaying per-tag skill graph with prerequisite and
//! related-tag propagation, and scores interview readiness with an optional
//! LLM-written narrative (Groq-compatible or Anthropic providers).

pub mod badges;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod llm;
pub mod narrative;
pub mod pipeline;
pub mod scorer;
pub mod signal;
pub mod sources;
pub mod util;
