//! Signal pipeline: raw records are normalized into `ActivitySignal`s, then
//! extracted into weighted per-tag contributions. Both stages are pure;
//! normalization and extraction of independent signals can run in any order.

pub mod extractor;
pub mod normalizer;
