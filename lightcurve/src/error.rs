//! Error types for the light-curve pipeline.

use polars::prelude::PolarsError;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type for pipeline operations.
///
/// Every variant carries enough context (source id, stage, row) to diagnose
/// the failure without re-running the pipeline. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Malformed input in '{source_id}': {reason}")]
    MalformedInput { source_id: String, reason: String },

    #[error("Observation at row {row} (MJD {date}) matches no season range")]
    UnclassifiableObservation { row: usize, date: f64 },

    #[error("Empty stream: {stage} requires at least one row")]
    EmptyStream { stage: &'static str },

    #[error("External source '{origin}' unavailable: {reason}")]
    ExternalSourceUnavailable { origin: String, reason: String },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Table error: {0}")]
    Polars(#[from] PolarsError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    pub(crate) fn malformed(source_id: impl Into<String>, reason: impl Into<String>) -> Self {
        PipelineError::MalformedInput {
            source_id: source_id.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unavailable(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        PipelineError::ExternalSourceUnavailable {
            origin: origin.into(),
            reason: reason.into(),
        }
    }
}
