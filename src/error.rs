//! Engine error taxonomy.
//!
//! Per-record errors (`UnsupportedFormat`, `UnknownActivityKind`) are recovered
//! locally during ingestion and surface in `IngestResult::skipped`.
//! `NarrativeUnavailable` is a soft failure: the numeric report stays valid.
//! `InvalidConfiguration` is fatal at startup.

use thiserror::Error;

use crate::signal::{ActivityKind, Source};

#[derive(Debug, Error)]
pub enum EngineError {
    // The field is `platform`, not `source`: thiserror reserves `source` for
    // the error cause.
    #[error("unsupported {platform} record: {reason}")]
    UnsupportedFormat { platform: Source, reason: String },

    #[error("no weight rule for {platform} activity kind '{kind}'")]
    UnknownActivityKind { platform: Source, kind: ActivityKind },

    #[error("narrative unavailable: {0}")]
    NarrativeUnavailable(String),

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
