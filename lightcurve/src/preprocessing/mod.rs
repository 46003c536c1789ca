//! Per-source orchestration: validation, the light-curve stages, and batch
//! processing across sources.

pub mod batch;
pub mod pipeline;
pub mod validator;

pub use batch::{light_curve_path, process_batch, report_path, BatchSummary, SourceOutcome};
pub use pipeline::{process_catalog, LightCurvePipeline, PipelineOutput, PipelineReport};
pub use validator::{CatalogValidator, ValidationResult, ValidationStats};
